use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    #[serde(default = "default_sink_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
}

fn default_sink_url() -> String {
    std::env::var("SINK_URL").unwrap_or_else(|_| "http://localhost:9000".to_string())
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_sink_url(),
            http_timeout_ms: default_http_timeout_ms(),
        }
    }
}

impl SinkConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_positions_per_round")]
    pub positions_per_round: u32,
    #[serde(default = "default_record_delay_ms")]
    pub record_delay_ms: u64,
    #[serde(default = "default_round_delay_ms")]
    pub round_delay_ms: u64,
    #[serde(default = "default_recovery_delay_ms")]
    pub recovery_delay_ms: u64,
    #[serde(default = "default_startup_stagger_ms")]
    pub startup_stagger_ms: u64,
}

fn default_positions_per_round() -> u32 {
    3
}

fn default_record_delay_ms() -> u64 {
    500
}

fn default_round_delay_ms() -> u64 {
    2_000
}

fn default_recovery_delay_ms() -> u64 {
    5_000
}

fn default_startup_stagger_ms() -> u64 {
    200
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            positions_per_round: default_positions_per_round(),
            record_delay_ms: default_record_delay_ms(),
            round_delay_ms: default_round_delay_ms(),
            recovery_delay_ms: default_recovery_delay_ms(),
            startup_stagger_ms: default_startup_stagger_ms(),
        }
    }
}

impl SimulationConfig {
    pub fn record_delay(&self) -> Duration {
        Duration::from_millis(self.record_delay_ms)
    }

    pub fn round_delay(&self) -> Duration {
        Duration::from_millis(self.round_delay_ms)
    }

    pub fn recovery_delay(&self) -> Duration {
        Duration::from_millis(self.recovery_delay_ms)
    }

    pub fn startup_stagger(&self) -> Duration {
        Duration::from_millis(self.startup_stagger_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_symbols() -> Vec<String> {
    vec![
        "EURUSD".to_string(),
        "XAUUSD".to_string(),
        "GBPUSD".to_string(),
    ]
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Environment always wins over the config file for the sink address
        if let Ok(sink_url) = std::env::var("SINK_URL") {
            builder = builder.set_override("sink.base_url", sink_url)?;
        }

        let s = builder.build()?;
        s.try_deserialize()
    }
}
