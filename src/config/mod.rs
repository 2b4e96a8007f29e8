//! Configuration module for pool settings and YAML loading
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `PoolConfig`, `FeeShareConfig`, `OracleConfig`, `KeeperConfig`)
//! - YAML loading functionality (`load_config`)
//! - Logging configuration (`init_logging`)

mod loader;
pub mod logging;
mod types;

// Re-export types
pub use types::{
    AppConfig, FeeShareConfig, KeeperConfig, OracleConfig, PoolConfig, SimulatedFlow,
    SimulationConfig,
    BPS_DENOMINATOR, MAX_POOL_FEE,
};

// Re-export loader functions
pub use loader::{config_path_from_env, load_config, load_config_from_str, CONFIG_PATH_ENV};

// Re-export logging functions
pub use logging::init_logging;
