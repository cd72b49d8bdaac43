//! Configuration management for sigpad-core

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Tablet device configuration
    #[serde(default)]
    pub device: DeviceConfig,

    /// On-device UI configuration
    #[serde(default)]
    pub ui: UiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// HTTP bind address
    #[serde(default = "default_http_host")]
    pub host: String,

    /// HTTP port for the capture API
    #[serde(default = "default_http_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Tablet address (host:port)
    #[serde(default = "default_device_addr")]
    pub addr: String,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Delay after ink-mode changes, lets the device settle
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Pen data option mode sent at session start
    #[serde(default = "default_pen_data_option_mode")]
    pub pen_data_option_mode: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Font file used for button labels and the summary overlay
    #[serde(default = "default_font_path")]
    pub font_path: String,

    /// Localized label for the cancel button
    #[serde(default = "default_label_cancel")]
    pub label_cancel: String,

    /// Localized label for the clear button
    #[serde(default = "default_label_clear")]
    pub label_clear: String,

    /// Localized label for the accept button
    #[serde(default = "default_label_accept")]
    pub label_accept: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            addr: default_device_addr(),
            connect_timeout_secs: default_connect_timeout(),
            settle_delay_ms: default_settle_delay(),
            pen_data_option_mode: default_pen_data_option_mode(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_path: default_font_path(),
            label_cancel: default_label_cancel(),
            label_clear: default_label_clear(),
            label_accept: default_label_accept(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.http.port == 0 {
            return Err("HTTP port must be non-zero".into());
        }

        if self.device.addr.is_empty() {
            return Err("Device address must not be empty".into());
        }

        if self.device.connect_timeout_secs == 0 {
            return Err("Device connect timeout must be non-zero".into());
        }

        if self.device.settle_delay_ms == 0 {
            return Err("Device settle delay must be non-zero".into());
        }

        if self.ui.label_cancel.is_empty()
            || self.ui.label_clear.is_empty()
            || self.ui.label_accept.is_empty()
        {
            return Err("Button labels must not be empty".into());
        }

        Ok(())
    }
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8780
}

fn default_device_addr() -> String {
    "127.0.0.1:9266".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_settle_delay() -> u64 {
    200
}

fn default_pen_data_option_mode() -> u8 {
    1
}

fn default_font_path() -> String {
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string()
}

fn default_label_cancel() -> String {
    "Cancel".to_string()
}

fn default_label_clear() -> String {
    "Clear".to_string()
}

fn default_label_accept() -> String {
    "Accept".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut cfg = Config::default();
        cfg.http.port = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_device_addr() {
        let mut cfg = Config::default();
        cfg.device.addr = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_labels() {
        let mut cfg = Config::default();
        cfg.ui.label_accept = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: Config = toml::from_str(
            r#"
            [device]
            addr = "10.0.0.12:9266"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.device.addr, "10.0.0.12:9266");
        assert_eq!(cfg.http.port, 8780);
    }
}
