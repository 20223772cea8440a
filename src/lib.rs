pub mod config;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod stats;
pub mod telemetry;

use config::Config;
use telemetry::TelemetrySource;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Telemetry file reader, optionally caching by modification time.
    pub telemetry: TelemetrySource,
}

impl AppState {
    pub fn new(telemetry: TelemetrySource) -> Self {
        Self { telemetry }
    }

    pub fn from_config(config: &Config) -> Self {
        let telemetry = if config.cache_telemetry {
            TelemetrySource::cached(&config.data_path)
        } else {
            TelemetrySource::new(&config.data_path)
        };
        Self::new(telemetry)
    }
}
