use std::path::{Path, PathBuf};

use crate::domain::error::AppError;
use crate::domain::settings::AppSettings;

const APP_DIR: &str = "text-humanizer";
const SETTINGS_FILE: &str = "settings.json";

/// 設定ファイルの保存先を上書きする環境変数
pub const ENV_SETTINGS_PATH: &str = "HT_SETTINGS_PATH";
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

/// JSON ファイルによる設定の永続化
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 既定の保存先（HT_SETTINGS_PATH > 設定ディレクトリ > カレント）
    pub fn default_location() -> Self {
        let path = std::env::var(ENV_SETTINGS_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(APP_DIR)
                    .join(SETTINGS_FILE)
            });
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイルが無ければ既定値。存在するキーだけ上書きする。
    pub fn load(&self) -> Result<AppSettings, AppError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("Settings file not found, using defaults: {}", self.path.display());
                return Ok(AppSettings::default());
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        if raw.trim().is_empty() {
            return Ok(AppSettings::default());
        }

        serde_json::from_str(&raw)
            .map_err(|e| AppError::config(format!("Invalid settings file {}: {e}", self.path.display())))
    }

    pub fn save(&self, settings: &AppSettings) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| AppError::config(format!("Failed to create {}: {e}", dir.display())))?;
        }
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::internal(format!("settings serialize: {e}")))?;
        std::fs::write(&self.path, json)
            .map_err(|e| AppError::config(format!("Failed to write {}: {e}", self.path.display())))
    }

    /// ファイル設定を読み、環境変数の API キーで上書きする
    pub fn load_with_env(&self) -> Result<AppSettings, AppError> {
        let mut settings = self.load()?;
        apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
        Ok(settings)
    }
}

/// 環境変数の API キーを反映する（空値は無視）
pub fn apply_env_overrides<F>(settings: &mut AppSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    if let Some(key) = non_empty(ENV_GROQ_API_KEY) {
        settings.groq_api_key = Some(key);
    }
    if let Some(key) = non_empty(ENV_ANTHROPIC_API_KEY) {
        settings.claude_api_key = Some(key);
    }
}
