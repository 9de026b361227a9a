//! 设置 - 从持久化 JSON 读取
//!
//! 路径：`~/.config/message-bar-enhancer/settings.json`。
//! 文件不存在时使用默认值；文件损坏时记录警告并使用默认值（格式化开启）。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::formatter::FormatterOptions;
use crate::modal::PresenterTiming;

/// 展示器时间参数（毫秒）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub settle_delay_ms: u64,
    pub ready_delay_ms: u64,
    pub fallback_delay_ms: u64,
    pub advance_delay_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        let timing = PresenterTiming::default();
        Self {
            settle_delay_ms: timing.settle_delay.as_millis() as u64,
            ready_delay_ms: timing.ready_delay.as_millis() as u64,
            fallback_delay_ms: timing.fallback_delay.as_millis() as u64,
            advance_delay_ms: timing.advance_delay.as_millis() as u64,
        }
    }
}

impl TimingSettings {
    pub fn presenter_timing(&self) -> PresenterTiming {
        PresenterTiming {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            ready_delay: Duration::from_millis(self.ready_delay_ms),
            fallback_delay: Duration::from_millis(self.fallback_delay_ms),
            advance_delay: Duration::from_millis(self.advance_delay_ms),
        }
    }
}

/// 用户设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 是否启用告警格式化；关闭时不扫描、不监听
    pub format: bool,
    /// 是否识别裸 URL
    pub linkify: bool,
    /// 页面路径包含其中任一片段时不入队弹窗
    pub suppressed_paths: Vec<String>,
    pub timing: TimingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: true,
            linkify: true,
            suppressed_paths: vec!["TicketEdit".to_string()],
            timing: TimingSettings::default(),
        }
    }
}

impl Settings {
    /// 默认设置文件路径
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("message-bar-enhancer")
            .join("settings.json")
    }

    /// 从默认路径读取
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// 从指定路径读取，任何错误都退回默认值
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!(path = %path.display(), "Settings file not found, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    /// 从指定路径读取；文件不存在返回 `Ok(None)`
    pub fn try_load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(settings))
    }

    pub fn formatter_options(&self) -> FormatterOptions {
        FormatterOptions {
            linkify: self.linkify,
            suppressed_paths: self.suppressed_paths.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/settings.json"));
        assert_eq!(settings, Settings::default());
        assert!(settings.format);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"format": false, "timing": {{"settle_delay_ms": 5}}}}"#).unwrap();

        let settings = Settings::load_from(file.path());
        assert!(!settings.format);
        assert!(settings.linkify);
        assert_eq!(settings.suppressed_paths, vec!["TicketEdit"]);
        assert_eq!(settings.timing.settle_delay_ms, 5);
        assert_eq!(settings.timing.fallback_delay_ms, 1000);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(Settings::try_load_from(file.path()).is_err());
        assert_eq!(Settings::load_from(file.path()), Settings::default());
    }

    #[test]
    fn test_timing_conversion() {
        let timing = TimingSettings::default().presenter_timing();
        assert_eq!(timing, PresenterTiming::default());
    }
}
