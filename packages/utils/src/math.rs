use std::convert::TryFrom;

use cosmwasm_std::{
    CheckedFromRatioError, Decimal, Decimal256, DivideByZeroError, Fraction, OverflowError,
    OverflowOperation, StdError, StdResult, Uint128, Uint256,
};

/// 10^-6 token units. Added to a fractional token amount before truncating it so that values
/// that should be whole numbers (e.g. 9.999999999) are not rounded down.
pub const TRUNCATION_EPSILON: Decimal256 = Decimal256::raw(1_000_000_000_000);

fn from_ratio_error(
    err: CheckedFromRatioError,
    numerator: String,
    denominator: String,
) -> StdError {
    match err {
        CheckedFromRatioError::Overflow => StdError::Overflow {
            source: OverflowError {
                operation: OverflowOperation::Mul,
                operand1: numerator,
                operand2: denominator,
            },
        },
        CheckedFromRatioError::DivideByZero => StdError::DivideByZero {
            source: DivideByZeroError::new(numerator),
        },
    }
}

/// Lifts an integer token amount into a 256-bit decimal. Every `Uint128` fits.
pub fn uint128_to_decimal256(amount: Uint128) -> StdResult<Decimal256> {
    Decimal256::checked_from_ratio(amount, 1u128)
        .map_err(|e| from_ratio_error(e, amount.to_string(), "1".to_string()))
}

/// Integer part of `amount`, as long as it fits a token amount.
pub fn decimal256_to_uint128_floor(amount: Decimal256) -> StdResult<Uint128> {
    let floor: Uint256 = amount.to_uint_floor();
    Ok(Uint128::try_from(floor)?)
}

/// Divide 'a' by 'b'.
pub fn divide_decimal256(a: Decimal256, b: Decimal256) -> StdResult<Decimal256> {
    Decimal256::checked_from_ratio(a.numerator(), b.numerator())
        .map_err(|e| from_ratio_error(e, a.to_string(), b.to_string()))
}

/// Divide an integer amount by a decimal, keeping the fractional part.
pub fn divide_uint128_by_decimal256(a: Uint128, b: Decimal256) -> StdResult<Decimal256> {
    divide_decimal256(uint128_to_decimal256(a)?, b)
}

/// `base ^ exp` for the exponents produced by interval counting.
pub fn decimal_pow(base: Decimal, exp: u64) -> StdResult<Decimal> {
    let exp = u32::try_from(exp).map_err(|_| {
        StdError::overflow(OverflowError::new(OverflowOperation::Pow, base, exp))
    })?;
    Ok(base.checked_pow(exp)?)
}

/// Truncates a fractional token amount to an integer payout after adding
/// [`TRUNCATION_EPSILON`].
pub fn truncate_with_epsilon(amount: Decimal256) -> StdResult<Uint128> {
    decimal256_to_uint128_floor(amount.checked_add(TRUNCATION_EPSILON)?)
}

/// Converts freshly delegated tokens into shares of a pool holding `total_tokens` backed by
/// `total_shares`. An empty pool mints shares 1:1.
pub fn convert_new_tokens_to_shares(
    total_tokens: Decimal256,
    total_shares: Decimal256,
    new_tokens: Uint128,
) -> StdResult<Decimal256> {
    if total_shares.is_zero() {
        return uint128_to_decimal256(new_tokens);
    }
    let shares_per_token = divide_decimal256(total_shares, total_tokens)?;
    Ok(shares_per_token.checked_mul(uint128_to_decimal256(new_tokens)?)?)
}

/// Converts shares of a pool back into (fractional) tokens. With no shares outstanding the whole
/// pool is returned.
pub fn convert_shares_to_tokens(
    total_tokens: Decimal256,
    total_shares: Decimal256,
    shares: Decimal256,
) -> StdResult<Decimal256> {
    if total_shares.is_zero() {
        return Ok(total_tokens);
    }
    Ok(divide_decimal256(shares, total_shares)?.checked_mul(total_tokens)?)
}
