//! Logging configuration from the environment and command-line flags.
//!
//! `PCF_LOG` (falling back to `RUST_LOG`) holds either a level name or raw
//! filter directives; `PCF_LOG_FORMAT` selects the output format.
//! `--log-level` and `--log-format` override both.

use clap::ValueEnum;
use tracing_subscriber::filter::LevelFilter;

pub const ENV_LOG_LEVEL: &str = "PCF_LOG";
pub const ENV_LOG_FORMAT: &str = "PCF_LOG_FORMAT";

/// Where and how log records are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

/// Most verbose level that is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Raw `RUST_LOG`-style directives; they replace `level` when present.
    pub directives: Option<String>,
}

impl LogConfig {
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_vars(|name| std::env::var(name).ok(), cli_level, cli_format)
    }

    /// Same as [`LogConfig::from_env`] with an arbitrary variable lookup.
    pub fn from_vars(
        var: impl Fn(&str) -> Option<String>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        if let Some(val) = var(ENV_LOG_LEVEL).or_else(|| var("RUST_LOG")) {
            let val = val.trim();
            match LogLevel::from_str(val, true) {
                Ok(level) => config.level = level,
                Err(_) if !val.is_empty() => config.directives = Some(val.to_string()),
                Err(_) => {}
            }
        }
        if let Some(format) = var(ENV_LOG_FORMAT).and_then(|v| LogFormat::from_str(v.trim(), true).ok()) {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config.level = level;
            config.directives = None;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }
        config
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}
