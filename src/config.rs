use crate::error::{CodesageError, Result};
use codesage_common::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// API URLを上書きする環境変数
pub const API_URL_ENV: &str = "CODESAGE_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub timeout_seconds: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_seconds: 120,
            log_level: "info".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CodesageError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("codesage").join("config.json"))
    }

    /// 解析APIのベースURLを決める
    ///
    /// 優先順位: コマンドライン引数 > 環境変数 > 設定ファイル > localhost
    pub fn resolve_api_url(&self, cli_override: Option<&str>) -> Result<String> {
        let env_value = std::env::var(API_URL_ENV).ok();
        let url = pick_api_url(cli_override, env_value.as_deref(), self.api_url.as_deref());
        validate_api_url(&url)?;
        Ok(url)
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        validate_api_url(&url)?;
        self.api_url = Some(url);
        self.save()
    }
}

fn pick_api_url(cli: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [cli, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

fn validate_api_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(CodesageError::Config(format!(
            "API URLは http:// または https:// で始めてください: {}",
            url
        )))
    }
}
