//! Fixtures shared by the core unit tests

use alloy_primitives::Address;

use crate::config::{AppConfig, FeeShareConfig, KeeperConfig, OracleConfig, PoolConfig, SimulationConfig};

/// Pool creation time used across tests
pub const START: u64 = 1_700_000_000;

/// Registered automation executor
pub const EXECUTOR: Address = Address::repeat_byte(0xE0);

pub const INPUT_TOKEN: Address = Address::repeat_byte(0x01);
pub const OUTPUT_TOKEN: Address = Address::repeat_byte(0x02);

pub fn sample_config() -> AppConfig {
    let underlying_in = Address::repeat_byte(0x11);
    let underlying_out = Address::repeat_byte(0x12);
    AppConfig {
        pool: PoolConfig {
            input_token: INPUT_TOKEN,
            output_token: OUTPUT_TOKEN,
            underlying_input_token: underlying_in,
            underlying_output_token: underlying_out,
            swap_path: vec![underlying_in, Address::repeat_byte(0x13), underlying_out],
            pool_fees: vec![500, 3_000],
            price_feed: Address::repeat_byte(0x21),
            invert_price: false,
            automation_registry: Address::repeat_byte(0x31),
            index_id: 0,
            share_scaler: 100_000,
        },
        fee_share: FeeShareConfig::default(),
        oracle: OracleConfig::default(),
        keeper: KeeperConfig::default(),
        simulation: SimulationConfig::default(),
    }
}
