//! Command handlers, one module per subcommand.

pub mod completions;
pub mod config;
pub mod init;
pub mod rules;
pub mod validate;

use std::path::{Path, PathBuf};

use metaval_adapters::InMemoryMetaStore;
use metaval_core::application::ValidationService;

use crate::{config::AppConfig, error::CliResult};

/// Resolve the rules path: the `--rules` flag wins over `rules.path`.
pub(crate) fn rules_path(flag: Option<PathBuf>, config: &AppConfig) -> PathBuf {
    flag.unwrap_or_else(|| config.rules.path.clone())
}

/// Build a validation service over every rule file under `path`.
pub(crate) fn service_for(path: &Path) -> CliResult<ValidationService> {
    let store = InMemoryMetaStore::from_path(path)?;
    Ok(ValidationService::new(Box::new(store)))
}
