use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::directory::validator::{ValidationMode, DEFAULT_MAX_INSPECTED};
use crate::directory::DEFAULT_PAGE_SIZE;
use crate::error::{AppError, AppResult};
use crate::http::DEFAULT_TIMEOUT_SECONDS;
use crate::models::DirectoryEntry;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub form: FormConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FormConfig {
    /// `http` or `file`
    #[serde(rename = "type")]
    pub form_type: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// Directory of `{key}.json` answer files for `type: file`
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DirectoryConfig {
    /// `graph`, `scim` or `memory`
    #[serde(rename = "type")]
    pub directory_type: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Entries served by `type: memory`
    #[serde(default)]
    pub entries: Vec<DirectoryEntry>,
    #[serde(default = "default_server_side_filter")]
    pub server_side_filter: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ValidationConfig {
    #[serde(default)]
    pub mode: ValidationModeType,
    #[serde(default = "default_max_inspected")]
    pub max_inspected: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationModeType {
    Direct,
    #[default]
    Paginated,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: ValidationModeType::default(),
            max_inspected: DEFAULT_MAX_INSPECTED,
        }
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_inspected() -> usize {
    DEFAULT_MAX_INSPECTED
}

fn default_server_side_filter() -> bool {
    true
}

impl ValidationConfig {
    pub fn validation_mode(&self) -> AppResult<ValidationMode> {
        match self.mode {
            ValidationModeType::Direct => Ok(ValidationMode::DirectMatch),
            ValidationModeType::Paginated if self.max_inspected == 0 => Err(AppError::Configuration(
                "directory.validation.max_inspected must be at least 1".to_string(),
            )),
            ValidationModeType::Paginated => Ok(ValidationMode::PaginatedScan {
                max_inspected: self.max_inspected,
            }),
        }
    }
}

impl AppConfig {
    /// Load configuration from YAML file
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> AppResult<Self> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(AppError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            AppError::Configuration(msg) => {
                AppError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse configuration from YAML text after expanding environment variables
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let expanded_content = Self::expand_env_vars(content)?;

        let app_config: AppConfig = serde_yaml::from_str(&expanded_content)
            .map_err(|e| AppError::Configuration(format!("Failed to parse config: {}", e)))?;

        app_config.validate()?;
        Ok(app_config)
    }

    /// Local configuration: answer files under `./forms`, empty in-memory directory
    pub fn default_config() -> Self {
        AppConfig {
            form: FormConfig {
                form_type: "file".to_string(),
                base_url: None,
                token: None,
                path: Some("./forms".to_string()),
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            },
            directory: DirectoryConfig {
                directory_type: "memory".to_string(),
                base_url: None,
                token: None,
                page_size: DEFAULT_PAGE_SIZE,
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
                validation: ValidationConfig::default(),
                entries: Vec::new(),
                server_side_filter: true,
            },
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        match self.form.form_type.as_str() {
            "http" => require(&self.form.base_url, "form.base_url")?,
            "file" => require(&self.form.path, "form.path")?,
            other => {
                return Err(AppError::Configuration(format!(
                    "Unsupported form type: {}",
                    other
                )))
            }
        }

        match self.directory.directory_type.as_str() {
            "graph" | "scim" => require(&self.directory.base_url, "directory.base_url")?,
            "memory" => {}
            other => {
                return Err(AppError::Configuration(format!(
                    "Unsupported directory type: {}",
                    other
                )))
            }
        }

        for (field, timeout) in [
            ("form.timeout_seconds", self.form.timeout_seconds),
            ("directory.timeout_seconds", self.directory.timeout_seconds),
        ] {
            if timeout == 0 {
                return Err(AppError::Configuration(format!("{} must be at least 1", field)));
            }
        }

        if self.directory.page_size == 0 {
            return Err(AppError::Configuration(
                "directory.page_size must be at least 1".to_string(),
            ));
        }
        self.directory.validation.validation_mode()?;
        Ok(())
    }

    /// Expand environment variables in format ${VAR_NAME} or ${VAR_NAME:-default}
    fn expand_env_vars(content: &str) -> AppResult<String> {
        let mut expanded = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            let Some(len) = rest[start + 2..].find('}') else {
                break;
            };
            expanded.push_str(&rest[..start]);

            let var_expr = &rest[start + 2..start + 2 + len];
            let (var_name, default_value) = match var_expr.split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (var_expr, None),
            };

            let value = match (std::env::var(var_name), default_value) {
                (Ok(val), _) => val,
                (Err(_), Some(default)) => default.to_string(),
                (Err(_), None) => {
                    return Err(AppError::Configuration(format!(
                        "Environment variable {} not found and no default provided",
                        var_name
                    )))
                }
            };
            expanded.push_str(&value);
            rest = &rest[start + 2 + len + 1..];
        }

        expanded.push_str(rest);
        Ok(expanded)
    }
}

fn require(value: &Option<String>, name: &str) -> AppResult<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(AppError::Configuration(format!("{} is required", name))),
    }
}
