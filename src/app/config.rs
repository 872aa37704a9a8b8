use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// デフォルトのコマンドファイル
pub const DEFAULT_COMMAND_FILE: &str = "/var/tmp/dialog.log";

/// コマンドファイル監視設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// ウォッチャーからエンジンへのチャネル容量
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// 再オープン時の初回待機時間（ミリ秒）
    #[serde(default = "default_reopen_initial_delay_ms")]
    pub reopen_initial_delay_ms: u64,
    /// 再オープン時の最大待機時間（ミリ秒）
    #[serde(default = "default_reopen_max_delay_ms")]
    pub reopen_max_delay_ms: u64,
    /// 再オープンの最大試行回数
    #[serde(default = "default_reopen_max_attempts")]
    pub reopen_max_attempts: u32,
}

fn default_channel_capacity() -> usize {
    100
}

fn default_reopen_initial_delay_ms() -> u64 {
    50
}

fn default_reopen_max_delay_ms() -> u64 {
    2000
}

fn default_reopen_max_attempts() -> u32 {
    10
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            reopen_initial_delay_ms: default_reopen_initial_delay_ms(),
            reopen_max_delay_ms: default_reopen_max_delay_ms(),
            reopen_max_attempts: default_reopen_max_attempts(),
        }
    }
}

impl WatcherConfig {
    /// Delay before re-open attempt `attempt` (0-based), doubling up to the max
    pub fn reopen_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay = self.reopen_initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.reopen_max_delay_ms))
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// コマンドファイルのパス
    #[serde(default = "default_command_file")]
    pub command_file: PathBuf,
    /// ログレベル
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 状態をJSON行として標準出力に出すか
    #[serde(default)]
    pub emit_json: bool,
    /// 監視設定
    #[serde(default)]
    pub watcher: WatcherConfig,
}

fn default_command_file() -> PathBuf {
    PathBuf::from(DEFAULT_COMMAND_FILE)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_file: default_command_file(),
            log_level: default_log_level(),
            emit_json: false,
            watcher: WatcherConfig::default(),
        }
    }
}

impl Config {
    /// 設定ファイルから読み込み（存在しない場合はデフォルトを作成して保存）
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            // 初回起動時はデフォルト設定をファイルに保存
            let config = Self::default();
            if let Err(e) = config.save() {
                tracing::warn!("Failed to save default config: {}", e);
            }
            Ok(config)
        }
    }

    /// TOML文字列からパース
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))
    }

    /// 設定ファイルパスを取得
    pub fn config_path() -> Result<PathBuf> {
        // ~/.config/dialog-engine/config.toml を使用
        let base_dirs = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))?;
        Ok(base_dirs.home_dir().join(".config/dialog-engine/config.toml"))
    }

    /// 現在の設定をファイルに保存
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.command_file, PathBuf::from("/var/tmp/dialog.log"));
        assert_eq!(config.log_level, "info");
        assert!(!config.emit_json);
        assert_eq!(config.watcher.channel_capacity, 100);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            command_file = "/tmp/custom.log"

            [watcher]
            reopen_max_attempts = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.command_file, PathBuf::from("/tmp/custom.log"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.watcher.reopen_max_attempts, 3);
        assert_eq!(config.watcher.reopen_initial_delay_ms, 50);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml(&content).unwrap();
        assert_eq!(parsed.command_file, config.command_file);
    }

    #[test]
    fn test_reopen_delay_backoff() {
        let watcher = WatcherConfig::default();
        assert_eq!(watcher.reopen_delay(0), Duration::from_millis(50));
        assert_eq!(watcher.reopen_delay(1), Duration::from_millis(100));
        assert_eq!(watcher.reopen_delay(3), Duration::from_millis(400));
        assert_eq!(watcher.reopen_delay(10), Duration::from_millis(2000));
        assert_eq!(watcher.reopen_delay(200), Duration::from_millis(2000));
    }
}
