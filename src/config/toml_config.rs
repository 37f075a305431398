use crate::adapters::storage::BackendKind;
use crate::domain::calendar::TimeReference;
use crate::utils::error::{DailiesError, Result};
use crate::utils::validation::{validate_locale_tag, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    pub calendar: CalendarConfig,
    pub app: AppConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// 未設定時依 backend 選擇預設檔名
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub time_reference: TimeReference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub locale: String,
    pub notifications: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Json,
            path: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            notifications: true,
        }
    }
}

impl StorageConfig {
    pub fn resolved_path(&self) -> String {
        match (&self.path, self.backend) {
            (Some(path), _) => path.clone(),
            (None, BackendKind::Sqlite) => "./data/commissions.db".to_string(),
            (None, _) => "./data/commissions.json".to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DailiesError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DailiesError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數原樣保留
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DailiesError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn data_path(&self) -> String {
        self.storage.resolved_path()
    }

    pub fn time_reference(&self) -> TimeReference {
        self.calendar.time_reference
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if self.storage.backend != BackendKind::Memory {
            validate_path("storage.path", &self.data_path())?;
        }
        validate_locale_tag("app.locale", &self.app.locale)?;
        Ok(())
    }
}
