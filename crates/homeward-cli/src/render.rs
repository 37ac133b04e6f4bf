//! Terminal display: large glyph digits for distance and compass point.

use homeward_nav::nav::{clock_hour, compass_point};
use homeward_nav::CycleReport;
use homeward_proto::GeoPoint;
use time::macros::format_description;
use time::OffsetDateTime;

pub const HEIGHT: usize = 5;

type Glyph = [&'static str; HEIGHT];

const CLEAR: &str = "\x1b[2J\x1b[H";

fn glyph(c: char) -> Glyph {
    match c.to_ascii_uppercase() {
        '0' => [" ## ", "#  #", "#  #", "#  #", " ## "],
        '1' => ["  # ", " ## ", "  # ", "  # ", " ###"],
        '2' => [" ## ", "#  #", "  # ", " #  ", "####"],
        '3' => ["### ", "   #", " ## ", "   #", "### "],
        '4' => ["#  #", "#  #", "####", "   #", "   #"],
        '5' => ["####", "#   ", "### ", "   #", "### "],
        '6' => [" ## ", "#   ", "### ", "#  #", " ## "],
        '7' => ["####", "   #", "  # ", " #  ", " #  "],
        '8' => [" ## ", "#  #", " ## ", "#  #", " ## "],
        '9' => [" ## ", "#  #", " ###", "   #", " ## "],
        '.' => ["  ", "  ", "  ", "  ", "# "],
        '-' => ["    ", "    ", "####", "    ", "    "],
        '+' => ["   ", " # ", "###", " # ", "   "],
        ' ' => ["  ", "  ", "  ", "  ", "  "],
        'N' => ["#  #", "## #", "# ##", "#  #", "#  #"],
        'E' => ["####", "#   ", "### ", "#   ", "####"],
        'S' => [" ###", "#   ", " ## ", "   #", "### "],
        'W' => ["#   #", "#   #", "# # #", "## ##", "#   #"],
        'K' => ["#  #", "# # ", "##  ", "# # ", "#  #"],
        'M' => ["#   #", "## ##", "# # #", "#   #", "#   #"],
        'O' => [" ## ", "#  #", "#  #", "#  #", " ## "],
        'F' => ["####", "#   ", "### ", "#   ", "#   "],
        'I' => ["###", " # ", " # ", " # ", "###"],
        'X' => ["#   #", " # # ", "  #  ", " # # ", "#   #"],
        _ => [" ## ", "#  #", "  # ", "    ", "  # "],
    }
}

/// Text as HEIGHT rows of glyphs separated by one blank column.
pub fn banner(text: &str) -> Vec<String> {
    let glyphs: Vec<Glyph> = text.chars().map(glyph).collect();
    (0..HEIGHT)
        .map(|row| glyphs.iter().map(|g| g[row]).collect::<Vec<_>>().join(" "))
        .collect()
}

pub fn distance_text(km: f64) -> String {
    if km < 10.0 { format!("{:.2}KM", km) } else { format!("{:.1}KM", km) }
}

fn clock_text(t: &OffsetDateTime) -> String {
    let fmt = format_description!("[hour]:[minute]:[second]");
    t.format(fmt).unwrap_or_else(|_| "--:--:--".to_string())
}

/// One full screen for a cycle, starting with a clear-screen sequence.
pub fn frame(report: &CycleReport, target: &GeoPoint) -> String {
    let mut out = String::from(CLEAR);
    out.push_str(&format!("target {:.5}, {:.5}\n\n", target.lat, target.lon));

    let m = &report.metrics;
    let (Some(km), Some(bearing)) = (m.distance_km, m.bearing_deg) else {
        for row in banner("NO FIX") { out.push_str(&row); out.push('\n'); }
        out.push_str(&format!("\nwaiting for a fix (cycle {})\n", report.cycle));
        return out;
    };

    for row in banner(&distance_text(km)) { out.push_str(&row); out.push('\n'); }
    out.push('\n');
    for row in banner(compass_point(bearing)) { out.push_str(&row); out.push('\n'); }
    out.push('\n');

    out.push_str(&format!("bearing {:.1} deg", bearing));
    if let Some(turn) = m.turn_deg {
        out.push_str(&format!("   turn {:+.1} deg ({} o'clock)", turn, clock_hour(turn)));
    }
    out.push('\n');

    if let (Some(t), Some(p)) = (report.fix_time, report.position) {
        out.push_str(&format!("fix {} UTC at {:.5}, {:.5}", clock_text(&t), p.lat, p.lon));
    }
    out.push_str(&format!("   cycle {}\n", report.cycle));
    out
}
