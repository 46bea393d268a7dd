use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::{AppConfig, DirectoryConfig, FormConfig};
use crate::directory::{
    DirectorySource, DirectoryValidator, GraphDirectory, MemoryDirectory, ScimDirectory,
};
use crate::error::{AppError, AppResult};
use crate::form::{FileFormSource, FormSource, JiraFormClient};
use crate::http::HttpClient;
use crate::order::OrderService;

/// Wire form source, directory and validator from configuration.
pub fn build_order_service(config: &AppConfig) -> AppResult<OrderService> {
    config.validate()?;

    let forms = build_form_source(&config.form)?;
    let directory = build_directory_source(&config.directory)?;
    let mode = config.directory.validation.validation_mode()?;
    debug!(?mode, "Directory validation mode");

    let validator = DirectoryValidator::new(directory, mode);
    Ok(OrderService::new(forms, Arc::new(validator)))
}

pub fn build_form_source(config: &FormConfig) -> AppResult<Arc<dyn FormSource>> {
    match config.form_type.as_str() {
        "http" => {
            let http = HttpClient::new(
                required(&config.base_url, "form.base_url")?,
                config.token.clone(),
                config.timeout_seconds,
            )?;
            debug!(base_url = %http.base_url(), "Using HTTP form service");
            Ok(Arc::new(JiraFormClient::new(http)))
        }
        "file" => {
            let path = PathBuf::from(required(&config.path, "form.path")?);
            debug!(path = %path.display(), "Using form answer files");
            Ok(Arc::new(FileFormSource::new(path)))
        }
        other => Err(AppError::Configuration(format!(
            "Unsupported form type: {}",
            other
        ))),
    }
}

pub fn build_directory_source(config: &DirectoryConfig) -> AppResult<Arc<dyn DirectorySource>> {
    match config.directory_type.as_str() {
        "graph" | "scim" => {
            let http = HttpClient::new(
                required(&config.base_url, "directory.base_url")?,
                config.token.clone(),
                config.timeout_seconds,
            )?;
            debug!(directory = %config.directory_type, base_url = %http.base_url(), "Using directory service");
            if config.directory_type == "graph" {
                Ok(Arc::new(GraphDirectory::new(http, config.page_size)))
            } else {
                Ok(Arc::new(ScimDirectory::new(http, config.page_size)))
            }
        }
        "memory" => Ok(Arc::new(MemoryDirectory::new(
            config.entries.clone(),
            config.page_size,
            config.server_side_filter,
        ))),
        other => Err(AppError::Configuration(format!(
            "Unsupported directory type: {}",
            other
        ))),
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> AppResult<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{} is required", name)))
}
