pub mod telemetry;

pub use telemetry::{GeoPoint, NavigationMetrics, PositionReport, PositionSample};
