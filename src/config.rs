use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Runtime configuration. Every flag can also be set through its
/// environment variable, which is how container deployments use it.
#[derive(Debug, Clone, Parser)]
#[command(name = "region-latency")]
#[command(about = "Per-region latency / uptime statistics over a telemetry file")]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "LATENCY_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Path of the JSON telemetry file (re-read on every request)
    #[arg(long, env = "LATENCY_DATA_PATH", default_value = "data/telemetry.json")]
    pub data_path: PathBuf,

    /// Reuse parsed telemetry while the file's modification time is unchanged
    #[arg(long, env = "LATENCY_CACHE_TELEMETRY")]
    pub cache_telemetry: bool,

    /// Default log filter; `RUST_LOG` takes precedence when set
    #[arg(long, env = "LATENCY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
