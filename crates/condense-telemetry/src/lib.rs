mod subscriber;

pub use subscriber::{init_subscriber, TelemetryConfig};
