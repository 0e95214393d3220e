use chrono::{DateTime, Local};
use colored::*;
use log::{Level, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::ForgeConfig;
use crate::error::{ForgeError, Result};

static FORGE_LOGGER: Lazy<ForgeLogger> = Lazy::new(ForgeLogger::new);

pub fn init() -> Result<()> {
    init_with_config(LoggerConfig::default())
}

/// Installs the logger once per process. Later calls only swap the config.
pub fn init_with_config(config: LoggerConfig) -> Result<()> {
    let level = config.min_level;
    FORGE_LOGGER.update_config(config)?;

    if log::set_logger(&*FORGE_LOGGER).is_err() {
        log::debug!("Logger already installed, configuration updated");
    }
    log::set_max_level(level.to_level_filter());
    Ok(())
}

/// Identifier attached to every record of this process.
pub fn session_id() -> &'static str {
    &FORGE_LOGGER.session_id
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }

    pub fn from_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    pub target: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub session_id: String,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_target: bool,
    pub show_file_location: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    pub log_file_path: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_target: false,
            show_file_location: false,
            timestamp_format: "%H:%M:%S%.3f".to_string(),
            output_json: false,
            log_file_path: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn with_file_output(mut self, path: impl Into<String>) -> Self {
        self.log_file_path = Some(path.into());
        self
    }

    pub fn production() -> Self {
        Self {
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_target: true,
            show_file_location: true,
            ..Default::default()
        }
    }
}

pub struct ForgeLogger {
    config: Mutex<LoggerConfig>,
    log_file: Mutex<Option<File>>,
    session_id: String,
}

impl ForgeLogger {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
            log_file: Mutex::new(None),
            session_id: Uuid::new_v4().simple().to_string()[..8].to_string(),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) -> Result<()> {
        let file = match &new_config.log_file_path {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };

        let mut config = self
            .config
            .lock()
            .map_err(|_| ForgeError::Config("logger config lock poisoned".into()))?;
        *config = new_config;

        if let Ok(mut log_file) = self.log_file.lock() {
            *log_file = file;
        }
        Ok(())
    }

    fn entry(&self, record: &Record) -> LogEntry {
        LogEntry {
            timestamp: Local::now(),
            level: LogLevel::from_level(record.level()),
            message: record.args().to_string(),
            target: record.target().to_string(),
            file: record.file().map(String::from),
            line: record.line(),
            session_id: self.session_id.clone(),
        }
    }

    pub fn format_line(entry: &LogEntry, config: &LoggerConfig) -> String {
        if config.output_json {
            return serde_json::to_string(entry).unwrap_or_default();
        }

        let mut output = String::new();
        let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
        let level = if config.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };

        if config.show_colors {
            output.push_str(&format!(
                "{} [{}] ",
                timestamp.bright_black(),
                level.color(entry.level.color()).bold()
            ));
        } else {
            output.push_str(&format!("{} [{}] ", timestamp, level));
        }

        if config.show_target {
            if config.show_colors {
                output.push_str(&format!("{}: ", entry.target.bright_blue()));
            } else {
                output.push_str(&format!("{}: ", entry.target));
            }
        }

        output.push_str(&entry.message);

        if config.show_file_location {
            if let (Some(file), Some(line)) = (&entry.file, entry.line) {
                let location = format!("{}:{}", file, line);
                if config.show_colors {
                    output.push_str(&format!(" ({})", location.bright_black()));
                } else {
                    output.push_str(&format!(" ({})", location));
                }
            }
        }

        output
    }
}

impl Default for ForgeLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for ForgeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => metadata.level() <= config.min_level.to_level(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = self.entry(record);

        if let Ok(config) = self.config.lock() {
            // stdout is reserved for results
            eprintln!("{}", Self::format_line(&entry, &config));

            if let Ok(mut guard) = self.log_file.lock() {
                if let Some(file) = guard.as_mut() {
                    let plain = LoggerConfig {
                        show_colors: false,
                        ..config.clone()
                    };
                    let _ = writeln!(file, "{}", Self::format_line(&entry, &plain));
                }
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Ok(mut guard) = self.log_file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Logs how long a scope took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  {} finished in {:.2}s",
            self.name,
            self.elapsed().as_secs_f64()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_config_info(config: &ForgeConfig) {
    log::info!("⚙️  Configuration loaded (session {}):", session_id());
    log::info!("   Backend: {:?}", config.backend);
    log::info!("   Model: {}", config.resolved_model_id());
    log::info!("   Output directory: {}", config.output_dir.display());
    log::info!("   Translation service: {}", config.translator.base_url);
    log::debug!(
        "   Translation API key: {}",
        if config.translator.api_key.is_some() { "✅" } else { "❌" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> LogEntry {
        LogEntry {
            timestamp: Local::now(),
            level: LogLevel::Warn,
            message: "Translation failed".to_string(),
            target: "imgforge::translate".to_string(),
            file: Some("src/translate/mod.rs".to_string()),
            line: Some(42),
            session_id: "abcd1234".to_string(),
        }
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Error.emoji(), "❌");
        assert_eq!(LogLevel::Debug.color(), Color::Blue);
        assert!(LogLevel::Warn > LogLevel::Info);
        assert_eq!(LogLevel::from_level(Level::Warn), LogLevel::Warn);
    }

    #[test]
    fn test_logger_config_presets() {
        let config = LoggerConfig::development();
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.show_colors);

        let prod_config = LoggerConfig::production();
        assert!(!prod_config.show_colors);
        assert!(prod_config.output_json);
    }

    #[test]
    fn test_plain_line_format() {
        let config = LoggerConfig::new().with_colors(false);
        let line = ForgeLogger::format_line(&sample_entry(), &config);
        assert!(line.contains("[⚠️ WARN] Translation failed"));
        assert!(!line.contains("src/translate"));

        let config = LoggerConfig::development().with_colors(false);
        let line = ForgeLogger::format_line(&sample_entry(), &config);
        assert!(line.contains("imgforge::translate: "));
        assert!(line.ends_with("(src/translate/mod.rs:42)"));
    }

    #[test]
    fn test_json_line_format() {
        let config = LoggerConfig::production();
        let line = ForgeLogger::format_line(&sample_entry(), &config);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["session_id"], "abcd1234");
    }

    #[test]
    fn test_logger_initialization_is_repeatable() {
        assert!(init_with_config(LoggerConfig::development()).is_ok());
        assert!(init_with_config(LoggerConfig::default()).is_ok());
        assert_eq!(session_id().len(), 8);
    }
}
