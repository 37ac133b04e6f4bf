use std::future::Future;
use std::time::Duration;

use homeward_proto::{GeoPoint, NavigationMetrics};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::FatalError;
use crate::geo::{self, SphericalPoint};
use crate::gpsd::{self, GpsdClient};
use crate::nav::{self, NavigationState};

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub host: String,
    pub port: u16,
    pub interval: Duration,
    /// None blocks on the reply line forever.
    pub read_timeout: Option<Duration>,
    pub track_course: bool,
    pub speak: bool,
    pub announce_every: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            host: gpsd::DEFAULT_HOST.to_string(),
            port: gpsd::DEFAULT_PORT,
            interval: Duration::from_secs(5),
            read_timeout: None,
            track_course: false,
            speak: false,
            announce_every: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Connected,
    Terminated,
}

/// Everything the display needs for one cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u64,
    pub fix_time: Option<OffsetDateTime>,
    pub position: Option<GeoPoint>,
    pub metrics: NavigationMetrics,
}

pub trait MetricsSink {
    fn render(&mut self, report: &CycleReport);

    fn announce(&mut self, _phrase: &str) {}
}

pub struct TrackingLoop {
    cfg: TrackerConfig,
    target: SphericalPoint,
    nav: NavigationState,
    state: LoopState,
    cycle: u64,
}

impl TrackingLoop {
    /// The target is fixed for the loop's lifetime.
    pub fn new(cfg: &TrackerConfig, target: GeoPoint) -> Self {
        Self {
            cfg: cfg.clone(),
            target: geo::to_spherical(&target),
            nav: NavigationState::new(cfg.track_course),
            state: LoopState::Connected,
            cycle: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    /// Expects a connected client. Polls until `shutdown` resolves or the
    /// connection fails. Shutdown closes
    /// the connection; on failure it is dropped and the error returned.
    pub async fn run<S, F>(&mut self, mut client: GpsdClient, sink: &mut S, shutdown: F) -> Result<(), FatalError>
    where
        S: MetricsSink,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        while self.state == LoopState::Connected {
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                res = self.step(&mut client, sink) => Some(res),
            };
            match outcome {
                Some(Ok(())) => {}
                Some(Err(e)) => {
                    self.state = LoopState::Terminated;
                    return Err(e);
                }
                None => {
                    self.state = LoopState::Terminated;
                    info!("tracking: shutdown after {} cycles", self.cycle);
                }
            }
        }
        client.close().await
    }

    async fn step<S: MetricsSink>(&mut self, client: &mut GpsdClient, sink: &mut S) -> Result<(), FatalError> {
        let report = client.poll().await?;
        let metrics = self.nav.update(&report, &self.target);
        debug!("tracking: cycle={} {:?}", self.cycle, metrics);

        let out = CycleReport {
            cycle: self.cycle,
            fix_time: report.sample().and_then(|s| s.time()),
            position: report.sample().map(|s| s.point),
            metrics,
        };
        sink.render(&out);
        if self.announce_due() {
            if let Some(phrase) = nav::announcement(&out.metrics) {
                sink.announce(&phrase);
            }
        }

        self.cycle += 1;
        tokio::time::sleep(self.cfg.interval).await;
        Ok(())
    }

    fn announce_due(&self) -> bool {
        self.cfg.speak && self.cycle % u64::from(self.cfg.announce_every.max(1)) == 0
    }
}

/// Connects to the configured source and tracks `target` until shutdown.
pub async fn track<S, F>(cfg: &TrackerConfig, target: GeoPoint, sink: &mut S, shutdown: F) -> Result<(), FatalError>
where
    S: MetricsSink,
    F: Future<Output = ()>,
{
    let client = GpsdClient::connect(&cfg.host, cfg.port, cfg.read_timeout).await?;
    TrackingLoop::new(cfg, target).run(client, sink, shutdown).await
}
