//! Free-form destination text to a [`GeoPoint`].
//!
//! Recognizers are tried in the order of [`CASCADE`]; the first one that
//! accepts the trimmed text wins. Nothing tries to pick the "best" match, so
//! reordering the table changes behaviour.

use homeward_proto::GeoPoint;
use tracing::debug;

pub type Recognizer = fn(&str) -> Option<GeoPoint>;

pub const CASCADE: &[(&str, Recognizer)] = &[
    ("degrees-minutes", degrees_minutes),
    ("space-pair", space_pair),
    ("colon-pair", colon_pair),
    ("n-e-prefix", north_east_prefix),
    ("n-e-suffix", north_east_suffix),
    ("e-n-prefix", east_north_prefix),
    ("e-n-suffix", east_north_suffix),
    ("url-q", url_q),
    ("url-ll", url_ll),
];

/// `None` means "not coordinates"; callers fall back to a name lookup.
pub fn resolve(text: &str) -> Option<GeoPoint> {
    classify(text).map(|(_, p)| p)
}

/// Like [`resolve`], also naming the recognizer that matched.
pub fn classify(text: &str) -> Option<(&'static str, GeoPoint)> {
    let text = text.trim();
    for (name, recognize) in CASCADE {
        if let Some(p) = recognize(text) {
            debug!("resolve: '{}' matched {} -> {}, {}", text, name, p.lat, p.lon);
            return Some((*name, p));
        }
    }
    debug!("resolve: '{}' is not a coordinate", text);
    None
}

/// `N52 25.551 E009 25.574`; S negates latitude, W negates longitude.
pub fn degrees_minutes(text: &str) -> Option<GeoPoint> {
    let mut s = Scan::new(text);
    let ns = s.letter(&['N', 'S'])?;
    s.ws();
    let lat_deg = s.uint()?;
    s.ws1()?;
    let lat_min = s.unsigned_decimal()?;
    s.sep();
    let ew = s.letter(&['E', 'W'])?;
    s.ws();
    let lon_deg = s.uint()?;
    s.ws1()?;
    let lon_min = s.unsigned_decimal()?;
    s.end()?;

    let mut lat = lat_deg + lat_min / 60.0;
    let mut lon = lon_deg + lon_min / 60.0;
    if ns == 'S' { lat = -lat; }
    if ew == 'W' { lon = -lon; }
    Some(GeoPoint::new(lat, lon))
}

/// `51.0 4.05`
pub fn space_pair(text: &str) -> Option<GeoPoint> {
    let mut s = Scan::new(text);
    let lat = s.decimal()?;
    s.ws1()?;
    let lon = s.decimal()?;
    s.end()?;
    Some(GeoPoint::new(lat, lon))
}

/// `51.0:4.05`, `51.0 : 4.05`
pub fn colon_pair(text: &str) -> Option<GeoPoint> {
    let mut s = Scan::new(text);
    let lat = s.decimal()?;
    s.ws();
    s.tag(":")?;
    s.ws();
    let lon = s.decimal()?;
    s.end()?;
    Some(GeoPoint::new(lat, lon))
}

/// `N51.0 E4.05`
pub fn north_east_prefix(text: &str) -> Option<GeoPoint> {
    let (lat, lon) = prefixed_pair(text, 'N', 'E')?;
    Some(GeoPoint::new(lat, lon))
}

/// `51.0N 4.05E`
pub fn north_east_suffix(text: &str) -> Option<GeoPoint> {
    let (lat, lon) = suffixed_pair(text, 'N', 'E')?;
    Some(GeoPoint::new(lat, lon))
}

/// `E4.05 N51.0`
pub fn east_north_prefix(text: &str) -> Option<GeoPoint> {
    let (lon, lat) = prefixed_pair(text, 'E', 'N')?;
    Some(GeoPoint::new(lat, lon))
}

/// `4.05E 51.0N`
pub fn east_north_suffix(text: &str) -> Option<GeoPoint> {
    let (lon, lat) = suffixed_pair(text, 'E', 'N')?;
    Some(GeoPoint::new(lat, lon))
}

/// `http://maps.google.com/maps?foo=bar&q=51.0,4.05`
pub fn url_q(text: &str) -> Option<GeoPoint> {
    url_param_pair(text, &["q"])
}

/// Same URL shape with `ll=` or `sll=`.
pub fn url_ll(text: &str) -> Option<GeoPoint> {
    url_param_pair(text, &["ll", "sll"])
}

fn prefixed_pair(text: &str, first: char, second: char) -> Option<(f64, f64)> {
    let mut s = Scan::new(text);
    s.letter(&[first])?;
    s.ws();
    let a = s.decimal()?;
    s.sep();
    s.letter(&[second])?;
    s.ws();
    let b = s.decimal()?;
    s.end()?;
    Some((a, b))
}

fn suffixed_pair(text: &str, first: char, second: char) -> Option<(f64, f64)> {
    let mut s = Scan::new(text);
    let a = s.decimal()?;
    s.ws();
    s.letter(&[first])?;
    s.sep();
    let b = s.decimal()?;
    s.ws();
    s.letter(&[second])?;
    s.end()?;
    Some((a, b))
}

fn url_param_pair(text: &str, keys: &[&str]) -> Option<GeoPoint> {
    let (_, query) = text.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    let value = query
        .split('&')
        .filter_map(|kv| kv.split_once('='))
        .find(|(k, _)| keys.contains(k))
        .map(|(_, v)| v)?;

    let mut s = Scan::new(value);
    let lat = s.decimal()?;
    if s.tag(",").is_none() {
        s.tag_ci("%2C")?;
    }
    let lon = s.decimal()?;
    // trailing label text like `+(Home)` is allowed
    Some(GeoPoint::new(lat, lon))
}

/// Cursor over the remaining input; every method either consumes and returns
/// `Some`, or leaves the cursor usable for a failed match.
struct Scan<'a> {
    rest: &'a str,
}

impl<'a> Scan<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }

    fn ws(&mut self) -> usize {
        let trimmed = self.rest.trim_start();
        let n = self.rest.len() - trimmed.len();
        self.rest = trimmed;
        n
    }

    fn ws1(&mut self) -> Option<()> {
        (self.ws() > 0).then_some(())
    }

    /// Whitespace with at most one comma in it.
    fn sep(&mut self) {
        self.ws();
        if self.tag(",").is_some() {
            self.ws();
        }
    }

    fn tag(&mut self, t: &str) -> Option<()> {
        self.rest = self.rest.strip_prefix(t)?;
        Some(())
    }

    fn tag_ci(&mut self, t: &str) -> Option<()> {
        let head = self.rest.get(..t.len())?;
        if !head.eq_ignore_ascii_case(t) { return None; }
        self.rest = &self.rest[t.len()..];
        Some(())
    }

    /// One of `set`, case-insensitive; returned upper-cased.
    fn letter(&mut self, set: &[char]) -> Option<char> {
        let c = self.rest.chars().next()?.to_ascii_uppercase();
        if !set.contains(&c) { return None; }
        self.rest = &self.rest[1..];
        Some(c)
    }

    fn uint(&mut self) -> Option<f64> {
        let n = self.rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        self.take_number(n)
    }

    fn unsigned_decimal(&mut self) -> Option<f64> {
        let n = number_len(self.rest.as_bytes(), false);
        self.take_number(n)
    }

    fn decimal(&mut self) -> Option<f64> {
        let n = number_len(self.rest.as_bytes(), true);
        self.take_number(n)
    }

    fn take_number(&mut self, n: usize) -> Option<f64> {
        if n == 0 { return None; }
        let v = self.rest[..n].parse().ok()?;
        self.rest = &self.rest[n..];
        Some(v)
    }

    fn end(&self) -> Option<()> {
        self.rest.is_empty().then_some(())
    }
}

/// Length of a leading `[+-]?digits[.digits]` or `[+-]?.digits`, 0 if none.
fn number_len(b: &[u8], signed: bool) -> usize {
    let mut i = 0;
    if signed && matches!(b.first(), Some(b'-') | Some(b'+')) { i += 1; }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() { i += 1; }
    let int_digits = i - int_start;
    if b.get(i) == Some(&b'.') {
        let mut j = i + 1;
        while j < b.len() && b[j].is_ascii_digit() { j += 1; }
        let frac_digits = j - (i + 1);
        if int_digits + frac_digits > 0 { return j; }
    }
    if int_digits == 0 { 0 } else { i }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(p: GeoPoint, lat: f64, lon: f64) -> bool {
        (p.lat - lat).abs() < 1e-5 && (p.lon - lon).abs() < 1e-5
    }

    fn check(text: &str, format: &str, lat: f64, lon: f64) {
        let (name, p) = classify(text).unwrap_or_else(|| panic!("'{}' not parsed", text));
        assert_eq!(name, format, "'{}'", text);
        assert!(close(p, lat, lon), "'{}' -> {:?}", text, p);
    }

    #[test]
    fn test_degrees_minutes() {
        check("N52 25.551 E009 25.574", "degrees-minutes", 52.42585, 9.426233);
        check("n52 25.551 e009 25.574", "degrees-minutes", 52.42585, 9.426233);
        check("  N 52 25.551, E 9 25.574 ", "degrees-minutes", 52.42585, 9.426233);
    }

    // each hemisphere letter only changes the sign of its own axis
    #[test]
    fn test_degrees_minutes_hemispheres() {
        check("S33 52.000 E151 12.000", "degrees-minutes", -33.866667, 151.2);
        check("N40 42.768 W074 00.360", "degrees-minutes", 40.7128, -74.006);
        check("S12 30.0 W077 1.5", "degrees-minutes", -12.5, -77.025);
    }

    #[test]
    fn test_pairs() {
        check("51.0 4.05", "space-pair", 51.0, 4.05);
        check("-33.8688   151.2093", "space-pair", -33.8688, 151.2093);
        check("51 4", "space-pair", 51.0, 4.0);
        check("51.0:4.05", "colon-pair", 51.0, 4.05);
        check("51.0 : -4.05", "colon-pair", 51.0, -4.05);
    }

    #[test]
    fn test_lettered_pairs() {
        check("N51.0 E4.05", "n-e-prefix", 51.0, 4.05);
        check("n 51.0 e -4.05", "n-e-prefix", 51.0, -4.05);
        check("51.0N 4.05E", "n-e-suffix", 51.0, 4.05);
        check("-33.5n, 151.0e", "n-e-suffix", -33.5, 151.0);
        check("E4.05 N51.0", "e-n-prefix", 51.0, 4.05);
        check("4.05E 51.0N", "e-n-suffix", 51.0, 4.05);
    }

    #[test]
    fn test_reversed_forms_swap_axes() {
        let p = resolve("E9.5 N52.25").unwrap();
        assert!(close(p, 52.25, 9.5));
        let p = resolve("9.5E 52.25N").unwrap();
        assert!(close(p, 52.25, 9.5));
    }

    #[test]
    fn test_urls() {
        check("http://maps.google.com/maps?foo=bar&q=51.0,4.05", "url-q", 51.0, 4.05);
        check("https://maps.google.com/?q=-1.5%2c36.8", "url-q", -1.5, 36.8);
        check("http://maps.google.com/maps?q=51.0,4.05+(Home)&z=15", "url-q", 51.0, 4.05);
        check("http://maps.google.com/maps?ll=51.0,4.05&z=12", "url-ll", 51.0, 4.05);
        check("http://maps.google.com/maps?hl=en&sll=51.0,4.05", "url-ll", 51.0, 4.05);
    }

    #[test]
    fn test_first_recognizer_wins() {
        // `ll` comes first in the query but `q` sits higher in the cascade.
        check("http://maps.google.com/maps?ll=50.0,3.0&q=51.0,4.05", "url-q", 51.0, 4.05);
        // a q parameter that is not a coordinate leaves ll to match
        check("http://maps.google.com/maps?q=Brussels&ll=50.85,4.35", "url-ll", 50.85, 4.35);
        // both url recognizers accept this with their own key, cascade order decides
        assert!(url_q("http://x/?sll=1.0,2.0&q=3.0,4.0").is_some());
        assert!(url_ll("http://x/?sll=1.0,2.0&q=3.0,4.0").is_some());
        check("http://x/?sll=1.0,2.0&q=3.0,4.0", "url-q", 3.0, 4.0);
    }

    #[test]
    fn test_cascade_order() {
        let names: Vec<&str> = CASCADE.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            ["degrees-minutes", "space-pair", "colon-pair", "n-e-prefix", "n-e-suffix", "e-n-prefix", "e-n-suffix", "url-q", "url-ll"]
        );
    }

    #[test]
    fn test_not_parseable() {
        for t in ["", "home", "Brussels Central", "51.0", "51.0 4.05 3", "51.0;4.05", "N52 E", "http://maps.google.com/maps?q=home", "1.2.3 4"] {
            assert!(resolve(t).is_none(), "'{}' should not parse", t);
        }
    }

    #[test]
    fn test_number_len() {
        assert_eq!(number_len(b"12.5x", true), 4);
        assert_eq!(number_len(b"-.5", true), 3);
        assert_eq!(number_len(b"-.5", false), 0);
        assert_eq!(number_len(b"7.", true), 2);
        assert_eq!(number_len(b".", true), 0);
        assert_eq!(number_len(b"-", true), 0);
    }
}
