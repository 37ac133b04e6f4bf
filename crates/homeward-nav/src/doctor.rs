use anyhow::Result;
use homeward_proto::GeoPoint;

use crate::tracking::TrackerConfig;

pub fn check_tracker_config(cfg: &TrackerConfig) -> Result<()> {
    anyhow::ensure!(!cfg.host.trim().is_empty(), "gpsd.host is empty");
    anyhow::ensure!(cfg.port != 0, "gpsd.port must be non-zero");
    anyhow::ensure!(!cfg.interval.is_zero(), "gpsd.interval_s must be > 0");
    if let Some(t) = cfg.read_timeout {
        anyhow::ensure!(!t.is_zero(), "gpsd.read_timeout_s must be > 0 when set");
    }
    anyhow::ensure!(cfg.announce_every >= 1, "speech.every_n must be >= 1");
    Ok(())
}

/// Out-of-range targets are accepted; this only reports them.
pub fn target_warning(p: &GeoPoint) -> Option<String> {
    (!p.in_range()).then(|| format!("target {}, {} is outside lat -90..90 / lon -180..180", p.lat, p.lon))
}
