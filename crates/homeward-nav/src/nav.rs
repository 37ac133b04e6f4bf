use homeward_proto::{NavigationMetrics, PositionReport};
use crate::geo::{self, SphericalPoint};

pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

#[derive(Debug, Clone)]
pub struct NavigationState {
    track_course: bool,
}

impl NavigationState {
    pub fn new(track_course: bool) -> Self {
        Self { track_course }
    }

    pub fn update(&self, report: &PositionReport, target: &SphericalPoint) -> NavigationMetrics {
        let Some(sample) = report.sample() else {
            return NavigationMetrics::no_fix();
        };

        let distance_km = geo::distance_km(target, &sample.point);
        let bearing_deg = geo::bearing_deg(target, &sample.point);
        let turn_deg = match sample.course_deg {
            Some(course) if self.track_course => Some(bearing_deg - course),
            _ => None,
        };

        NavigationMetrics {
            has_fix: true,
            distance_km: Some(distance_km),
            bearing_deg: Some(bearing_deg),
            turn_deg,
        }
    }
}

/// 16-point compass name; each sector is 22.5 degrees wide and centered on its point.
pub fn compass_point(deg: f64) -> &'static str {
    let idx = ((deg + 11.25) / 22.5).floor() as i64;
    COMPASS_POINTS[idx.rem_euclid(16) as usize]
}

/// "NNE" -> "north north east"
pub fn compass_words(point: &str) -> String {
    point
        .chars()
        .filter_map(|c| match c {
            'N' => Some("north"),
            'E' => Some("east"),
            'S' => Some("south"),
            'W' => Some("west"),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Analog clock hour (1..=12) for a relative angle; 12 is straight ahead.
pub fn clock_hour(deg: f64) -> u8 {
    let h = ((deg + 15.0) / 30.0).floor() as i64;
    match h.rem_euclid(12) {
        0 => 12,
        n => n as u8,
    }
}

/// Spoken summary for a fix, `None` without one.
pub fn announcement(m: &NavigationMetrics) -> Option<String> {
    let (distance, bearing) = (m.distance_km?, m.bearing_deg?);
    let mut phrase = format!("{} kilometers {}", spoken_distance(distance), compass_words(compass_point(bearing)));
    if let Some(turn) = m.turn_deg {
        phrase.push_str(&format!(", turn to {} o'clock", clock_hour(turn)));
    }
    Some(phrase)
}

fn spoken_distance(km: f64) -> String {
    if km < 10.0 { format!("{:.1}", km) } else { format!("{:.0}", km) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeward_proto::{GeoPoint, PositionSample};

    fn fix(lat: f64, lon: f64, course: Option<f64>) -> PositionReport {
        PositionReport::Fix(PositionSample { ts_epoch_s: 0, point: GeoPoint::new(lat, lon), course_deg: course })
    }

    fn target() -> SphericalPoint {
        geo::to_spherical(&GeoPoint::new(51.0, 4.05))
    }

    #[test]
    fn test_no_fix() {
        let m = NavigationState::new(true).update(&PositionReport::NoFix, &target());
        assert_eq!(m, NavigationMetrics::no_fix());
    }

    #[test]
    fn test_fix_without_course() {
        let m = NavigationState::new(true).update(&fix(50.0, 4.0, None), &target());
        assert!(m.has_fix);
        assert!(m.distance_km.unwrap() > 100.0);
        assert!((0.0..360.0).contains(&m.bearing_deg.unwrap()));
        assert_eq!(m.turn_deg, None);
    }

    #[test]
    fn test_turn_needs_course_tracking() {
        let m = NavigationState::new(false).update(&fix(50.0, 4.0, Some(90.0)), &target());
        assert_eq!(m.turn_deg, None);

        let m = NavigationState::new(true).update(&fix(50.0, 4.0, Some(90.0)), &target());
        let turn = m.turn_deg.unwrap();
        assert_eq!(turn, m.bearing_deg.unwrap() - 90.0);
        // heading east with the target to the north: steer left, not wrapped
        assert!(turn < 0.0);
    }

    #[test]
    fn test_compass_points() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(180.0), "S");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(270.0), "W");
        assert_eq!(compass_point(22.5), "NNE");
        assert_eq!(compass_point(11.0), "N");
        assert_eq!(compass_point(11.5), "NNE");
        assert_eq!(compass_point(-11.0), "N");
        assert_eq!(compass_point(-12.0), "NNW");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(337.5), "NNW");
    }

    #[test]
    fn test_compass_is_cyclic() {
        for i in -1440..1440 {
            let d = i as f64 * 0.5 + 0.1;
            assert_eq!(compass_point(d), compass_point(d + 360.0), "d={}", d);
        }
    }

    #[test]
    fn test_compass_words() {
        assert_eq!(compass_words("N"), "north");
        assert_eq!(compass_words("NNE"), "north north east");
        assert_eq!(compass_words("WSW"), "west south west");
    }

    #[test]
    fn test_clock_hour() {
        assert_eq!(clock_hour(0.0), 12);
        assert_eq!(clock_hour(30.0), 1);
        assert_eq!(clock_hour(90.0), 3);
        assert_eq!(clock_hour(-90.0), 9);
        assert_eq!(clock_hour(-30.0), 11);
        assert_eq!(clock_hour(180.0), 6);
        assert_eq!(clock_hour(-180.0), 6);
        assert_eq!(clock_hour(700.0), clock_hour(-20.0));
    }

    #[test]
    fn test_clock_hour_range() {
        for i in -2000..2000 {
            let h = clock_hour(i as f64 * 0.77);
            assert!((1..=12).contains(&h));
        }
        for d in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300, -1e300] {
            assert!((1..=12).contains(&clock_hour(d)));
        }
    }

    #[test]
    fn test_announcement() {
        let m = NavigationMetrics { has_fix: true, distance_km: Some(111.37), bearing_deg: Some(1.8), turn_deg: None };
        assert_eq!(announcement(&m).unwrap(), "111 kilometers north");

        let m = NavigationMetrics { has_fix: true, distance_km: Some(2.345), bearing_deg: Some(45.0), turn_deg: Some(-88.0) };
        assert_eq!(announcement(&m).unwrap(), "2.3 kilometers north east, turn to 9 o'clock");

        assert!(announcement(&NavigationMetrics::no_fix()).is_none());
    }
}
