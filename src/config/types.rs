//! Configuration types for pool settings
//!
//! This module defines all configuration structs that are loaded from YAML.
//! The pool section is immutable once a pool is created from it.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Largest valid swap fee tier (100% in hundredths of a basis point)
pub const MAX_POOL_FEE: u32 = 1_000_000;

/// Basis-point denominator for the oracle tolerance
pub const BPS_DENOMINATOR: u32 = 10_000;

// ============================================================================
// Configuration Structs
// ============================================================================

/// Immutable pool parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolConfig {
    /// Streaming token accepted from accounts
    pub input_token: Address,
    /// Streaming token distributed back to accounts
    pub output_token: Address,
    /// Asset wrapped by the input token, first hop of the swap path
    pub underlying_input_token: Address,
    /// Asset wrapped by the output token, last hop of the swap path
    pub underlying_output_token: Address,
    /// Ordered hop assets for the swap venue
    pub swap_path: Vec<Address>,
    /// Fee tier of each hop (hundredths of a basis point, e.g. 3000 = 0.3%)
    pub pool_fees: Vec<u32>,
    /// Price feed used for the slippage bound
    pub price_feed: Address,
    /// Feed quotes output-per-input instead of input-per-output
    #[serde(default)]
    pub invert_price: bool,
    /// Automation registry allowed to trigger distributions
    pub automation_registry: Address,
    /// Distribution index identifier on the index ledger
    #[serde(default)]
    pub index_id: u32,
    /// Flow-rate divisor producing distribution units
    #[serde(default = "default_share_scaler")]
    pub share_scaler: u64,
}

fn default_share_scaler() -> u64 {
    100_000
}

impl PoolConfig {
    /// Validate pool configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        if self.input_token == self.output_token {
            return Err(AppError::Config(format!(
                "input_token and output_token cannot be the same (both are {})",
                self.input_token
            )));
        }

        if self.swap_path.len() < 2 {
            return Err(AppError::Config(format!(
                "swap_path needs at least 2 hops (got {})",
                self.swap_path.len()
            )));
        }

        if self.pool_fees.len() + 1 != self.swap_path.len() {
            return Err(AppError::Config(format!(
                "pool_fees must have one entry per hop: {} fees for {} path assets",
                self.pool_fees.len(),
                self.swap_path.len()
            )));
        }

        if let Some(fee) = self.pool_fees.iter().find(|fee| **fee >= MAX_POOL_FEE) {
            return Err(AppError::Config(format!(
                "pool fee {} must be below {}",
                fee, MAX_POOL_FEE
            )));
        }

        if self.swap_path.first() != Some(&self.underlying_input_token) {
            return Err(AppError::Config(
                "swap_path must start with underlying_input_token".to_string(),
            ));
        }

        if self.swap_path.last() != Some(&self.underlying_output_token) {
            return Err(AppError::Config(
                "swap_path must end with underlying_output_token".to_string(),
            ));
        }

        if self.share_scaler == 0 {
            return Err(AppError::Config("share_scaler must be > 0".to_string()));
        }

        Ok(())
    }
}

/// Bounds and cadence for the automation fee share
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeShareConfig {
    /// Fee share (percent of swap output) at pool creation
    pub initial: u32,
    /// Floor of the fee share
    pub min: u32,
    /// Ceiling of the fee share
    pub max: u32,
    /// Desired seconds between distributions
    pub target_interval_secs: u64,
}

impl FeeShareConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.min > self.max {
            return Err(AppError::Config(format!(
                "fee_share: min ({}) must be <= max ({})",
                self.min, self.max
            )));
        }

        if self.initial < self.min || self.initial > self.max {
            return Err(AppError::Config(format!(
                "fee_share: initial ({}) must be within [{}, {}]",
                self.initial, self.min, self.max
            )));
        }

        if self.max > 100 {
            return Err(AppError::Config(format!(
                "fee_share: max must be <= 100 percent, got {}",
                self.max
            )));
        }

        if self.target_interval_secs == 0 {
            return Err(AppError::Config(
                "fee_share: target_interval_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for FeeShareConfig {
    fn default() -> Self {
        Self {
            initial: 5,
            min: 1,
            max: 10,
            target_interval_secs: 4 * 3600,
        }
    }
}

/// Oracle slippage-bound parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OracleConfig {
    /// Decimals of the raw feed answer
    pub price_decimals: u32,
    /// Accepted shortfall versus the oracle-implied output, in basis points
    pub rate_tolerance_bps: u32,
    /// Answers older than this are stale
    pub max_price_age_secs: u64,
}

impl OracleConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.rate_tolerance_bps >= BPS_DENOMINATOR {
            return Err(AppError::Config(format!(
                "oracle: rate_tolerance_bps must be < {} (got {})",
                BPS_DENOMINATOR, self.rate_tolerance_bps
            )));
        }

        if self.price_decimals > 36 {
            return Err(AppError::Config(format!(
                "oracle: price_decimals must be <= 36 (got {})",
                self.price_decimals
            )));
        }

        Ok(())
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            price_decimals: 8,
            rate_tolerance_bps: 200,
            max_price_age_secs: 3600,
        }
    }
}

/// Keeper loop parameters used with the scheduling predictor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeeperConfig {
    /// Gas consumed by one `distribute` call
    pub gas_limit: u64,
    /// Gas price in wei
    pub gas_price: u64,
    /// Native-to-input-token conversion rate, scaled by 1e9
    pub token_to_native_rate: u64,
    /// Seconds between keeper polls
    pub poll_interval_secs: u64,
}

impl KeeperConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.poll_interval_secs == 0 {
            return Err(AppError::Config(
                "keeper: poll_interval_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            gas_limit: 120_000,
            gas_price: 3_200,
            token_to_native_rate: 1_000_000_000,
            poll_interval_secs: 60,
        }
    }
}

/// Flow opened at startup when running against simulated collaborators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulatedFlow {
    pub account: Address,
    /// Tokens per second in input-token base units
    pub flow_rate: u64,
}

/// Settings for the simulated collaborators the binary runs against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Reference price in feed decimals
    pub reference_price: u64,
    /// Identity the simulated automation registry executes as
    pub executor: Address,
    /// Flows opened when the keeper starts
    #[serde(default)]
    pub flows: Vec<SimulatedFlow>,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.reference_price == 0 {
            return Err(AppError::Config(
                "simulation: reference_price must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            reference_price: 200_000_000_000,
            executor: Address::repeat_byte(0xE0),
            flows: Vec::new(),
        }
    }
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub pool: PoolConfig,
    #[serde(default)]
    pub fee_share: FeeShareConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub keeper: KeeperConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl AppConfig {
    /// Validate all configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        self.pool.validate()?;
        self.fee_share.validate()?;
        self.oracle.validate()?;
        self.keeper.validate()?;
        self.simulation.validate()?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
