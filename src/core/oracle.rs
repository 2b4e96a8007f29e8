//! Oracle price checks and the swap slippage bound
//!
//! The feed answers in `price_decimals` fixed point. Without inversion the
//! answer is input-per-output (e.g. USD per ETH for a USDC to ETH pool); with
//! inversion it is output-per-input.

use alloy_primitives::U256;

use crate::adapters::PriceData;
use crate::config::{OracleConfig, BPS_DENOMINATOR};
use crate::error::{PoolError, PoolResult};

fn scale(decimals: u32) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(decimals))
}

/// Positive, fresh price from a raw feed answer
///
/// # Errors
/// `PoolError::Oracle` when the answer is non-positive or older than
/// `max_price_age_secs`.
pub fn validated_price(data: PriceData, now: u64, config: &OracleConfig) -> PoolResult<u128> {
    let price = u128::try_from(data.price)
        .ok()
        .filter(|price| *price > 0)
        .ok_or_else(|| PoolError::Oracle(format!("non-positive price {}", data.price)))?;

    let age = now.saturating_sub(data.updated_at);
    if age > config.max_price_age_secs {
        return Err(PoolError::Oracle(format!(
            "stale price: updated {}s ago (max {}s)",
            age, config.max_price_age_secs
        )));
    }

    Ok(price)
}

/// Input-per-output price in feed decimals, applying the inversion flag
pub fn effective_price(price: u128, decimals: u32, invert_price: bool) -> Option<u128> {
    if !invert_price {
        return Some(price);
    }
    let squared = scale(decimals)?.checked_mul(scale(decimals)?)?;
    u128::try_from(squared.checked_div(U256::from(price))?).ok()
}

/// Output the oracle implies for `amount_in`
pub fn expected_output(
    amount_in: u128,
    price: u128,
    decimals: u32,
    invert_price: bool,
) -> Option<u128> {
    let amount_in = U256::from(amount_in);
    let price = U256::from(price);
    let expected = if invert_price {
        amount_in.checked_mul(price)?.checked_div(scale(decimals)?)?
    } else {
        amount_in.checked_mul(scale(decimals)?)?.checked_div(price)?
    };
    u128::try_from(expected).ok()
}

/// Minimum acceptable swap output for `amount_in` at the feed price
///
/// # Errors
/// `PoolError::Oracle` when the price fails validation or the resulting
/// bound would be zero.
pub fn min_amount_out(
    amount_in: u128,
    data: PriceData,
    now: u64,
    config: &OracleConfig,
    invert_price: bool,
) -> PoolResult<u128> {
    let price = validated_price(data, now, config)?;
    let expected = expected_output(amount_in, price, config.price_decimals, invert_price)
        .ok_or_else(|| PoolError::Oracle("expected output overflows".to_string()))?;

    let keep = U256::from(BPS_DENOMINATOR.saturating_sub(config.rate_tolerance_bps));
    let bound = U256::from(expected).saturating_mul(keep) / U256::from(BPS_DENOMINATOR);
    let bound = u128::try_from(bound)
        .map_err(|_| PoolError::Oracle("slippage bound overflows".to_string()))?;

    if bound == 0 {
        return Err(PoolError::Oracle(format!(
            "non-positive slippage bound for amount {} at price {}",
            amount_in, price
        )));
    }
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;
    // 2000 USD per ETH with 8 decimals
    const ETH_PRICE: i128 = 200_000_000_000;

    fn config() -> OracleConfig {
        OracleConfig::default()
    }

    #[test]
    fn test_fresh_positive_price_accepted() {
        let data = PriceData {
            price: ETH_PRICE,
            updated_at: NOW - 60,
        };
        assert_eq!(validated_price(data, NOW, &config()), Ok(200_000_000_000));
    }

    #[test]
    fn test_zero_price_rejected() {
        let data = PriceData { price: 0, updated_at: NOW };
        let err = validated_price(data, NOW, &config()).unwrap_err();
        assert!(err.to_string().contains("non-positive price"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let data = PriceData { price: -5, updated_at: NOW };
        assert!(matches!(validated_price(data, NOW, &config()), Err(PoolError::Oracle(_))));
    }

    #[test]
    fn test_stale_price_rejected() {
        let data = PriceData {
            price: ETH_PRICE,
            updated_at: NOW - 3_601,
        };
        let err = validated_price(data, NOW, &config()).unwrap_err();
        assert!(err.to_string().contains("stale price"));
    }

    #[test]
    fn test_price_at_max_age_accepted() {
        let data = PriceData {
            price: ETH_PRICE,
            updated_at: NOW - 3_600,
        };
        assert!(validated_price(data, NOW, &config()).is_ok());
    }

    #[test]
    fn test_expected_output_divides_by_price() {
        // 2000 USDC (18 decimals) buys 1 ETH
        let amount_in = 2_000 * 10u128.pow(18);
        let out = expected_output(amount_in, 200_000_000_000, 8, false).unwrap();
        assert_eq!(out, 10u128.pow(18));
    }

    #[test]
    fn test_expected_output_inverted_multiplies() {
        // 1 MATIC at 0.5 USD
        let out = expected_output(10u128.pow(18), 50_000_000, 8, true).unwrap();
        assert_eq!(out, 5 * 10u128.pow(17));
    }

    #[test]
    fn test_effective_price_inversion() {
        assert_eq!(effective_price(50_000_000, 8, true), Some(200_000_000));
        assert_eq!(effective_price(50_000_000, 8, false), Some(50_000_000));
    }

    #[test]
    fn test_min_amount_out_applies_tolerance() {
        let amount_in = 2_000 * 10u128.pow(18);
        let data = PriceData {
            price: ETH_PRICE,
            updated_at: NOW,
        };
        let bound = min_amount_out(amount_in, data, NOW, &config(), false).unwrap();
        assert_eq!(bound, 98 * 10u128.pow(16));
    }

    #[test]
    fn test_zero_bound_is_oracle_error() {
        let data = PriceData {
            price: ETH_PRICE,
            updated_at: NOW,
        };
        let err = min_amount_out(1, data, NOW, &config(), false).unwrap_err();
        assert!(err.to_string().contains("non-positive slippage bound"));
    }
}
