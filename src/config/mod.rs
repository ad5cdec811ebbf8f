//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), or built-in defaults
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → route table and proxy client built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    BackendsConfig, CorsConfig, GatewayConfig, ListenerConfig, ObservabilityConfig,
    ProxySettings, TimeoutConfig,
};
pub use validation::ValidationError;
