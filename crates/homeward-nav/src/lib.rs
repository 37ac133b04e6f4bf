pub mod doctor;
pub mod error;
pub mod geo;
pub mod gpsd;
pub mod nav;
pub mod places;
pub mod resolve;
pub mod tracking;

pub use error::FatalError;
pub use tracking::{CycleReport, LoopState, MetricsSink, TrackerConfig, TrackingLoop};
