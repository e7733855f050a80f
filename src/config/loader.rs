//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading service
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{ServiceError, ServiceResult};

use super::types::{
    AttendanceSettings, ConciergeFile, ConciergeSettings, PayrollRules, ServiceConfig,
};

/// Loads and provides access to service configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── payroll.yaml    # Multipliers, statutory brackets, flat rates
/// └── concierge.yaml  # Context budgets, room limits, attendance lockout
/// ```
///
/// # Example
///
/// ```no_run
/// use innkeeper::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Overtime multiplier: {}", loader.payroll().overtime_multiplier);
/// # Ok::<(), innkeeper::error::ServiceError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: ServiceConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if either file is
    /// missing or contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> ServiceResult<Self> {
        let path = path.as_ref();

        let payroll = Self::load_yaml::<PayrollRules>(&path.join("payroll.yaml"))?;
        let concierge_file = Self::load_yaml::<ConciergeFile>(&path.join("concierge.yaml"))?;

        let config = ServiceConfig::new(
            payroll,
            concierge_file.concierge,
            concierge_file.attendance,
        );

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: ServiceConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> ServiceResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ServiceError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ServiceError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the payroll rules.
    pub fn payroll(&self) -> &PayrollRules {
        self.config.payroll()
    }

    /// Returns the chatbot settings.
    pub fn concierge(&self) -> &ConciergeSettings {
        self.config.concierge()
    }

    /// Returns the attendance settings.
    pub fn attendance(&self) -> &AttendanceSettings {
        self.config.attendance()
    }
}
