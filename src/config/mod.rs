//! Configuration loading and management.
//!
//! Tunables (payroll multipliers, statutory brackets, chatbot budgets) are
//! loaded from YAML files; secrets and addresses come from the environment.
//!
//! # Example
//!
//! ```no_run
//! use innkeeper::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Night differential: {}", config.payroll().night_differential_rate);
//! ```

mod loader;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use settings::{AppSettings, GeminiSettings, MessengerSettings};
pub use types::{
    AttendanceSettings, ConciergeSettings, FlatRate, FlatRates, HealthRules, HousingRules,
    PayrollRules, PensionRules, ServiceConfig, StatutoryRules,
};
