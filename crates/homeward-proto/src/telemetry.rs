use time::OffsetDateTime;

/// Geographic point in degrees. Range checking is left to the caller:
/// values are kept exactly as parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn in_range(&self) -> bool {
        self.lat.abs() <= 90.0 && self.lon.abs() <= 180.0
    }
}

#[derive(Debug, Clone)]
pub struct PositionSample {
    pub ts_epoch_s: i64,
    pub point: GeoPoint,
    /// None when the source reports the course as unknown.
    pub course_deg: Option<f64>,
}

impl PositionSample {
    /// None when the timestamp is outside the representable range.
    pub fn time(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.ts_epoch_s).ok()
    }
}

/// One reply from the position source.
#[derive(Debug, Clone)]
pub enum PositionReport {
    NoFix,
    Fix(PositionSample),
}

impl PositionReport {
    pub fn sample(&self) -> Option<&PositionSample> {
        match self {
            PositionReport::Fix(s) => Some(s),
            PositionReport::NoFix => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationMetrics {
    pub has_fix: bool,
    pub distance_km: Option<f64>,
    /// 0..360
    pub bearing_deg: Option<f64>,
    /// bearing minus course, signed and not wrapped. Negative steers left.
    pub turn_deg: Option<f64>,
}

impl NavigationMetrics {
    pub fn no_fix() -> Self {
        Self { has_fix: false, distance_km: None, bearing_deg: None, turn_deg: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_time() {
        let s = PositionSample { ts_epoch_s: 1_118_327_700, point: GeoPoint::new(1.0, 2.0), course_deg: None };
        let t = s.time().unwrap();
        assert_eq!(t.year(), 2005);
        assert_eq!(t.hour(), 14);
    }

    #[test]
    fn test_no_fix_has_no_numbers() {
        let m = NavigationMetrics::no_fix();
        assert!(!m.has_fix);
        assert!(m.distance_km.is_none() && m.bearing_deg.is_none() && m.turn_deg.is_none());
    }

    #[test]
    fn test_in_range() {
        assert!(GeoPoint::new(-90.0, 180.0).in_range());
        assert!(!GeoPoint::new(91.0, 0.0).in_range());
    }
}
