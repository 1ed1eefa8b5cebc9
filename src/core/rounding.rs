use rust_decimal::Decimal;

/// Price precision used for quotes.
pub const PRICE_DP: u32 = 2;
/// Precision used for exchange rates.
pub const RATE_DP: u32 = 4;

/// Rounds `value` to `dp` decimal places, half to even.
///
/// The exact binary value is rounded, not its shortest decimal rendering:
/// `2.675` is stored as `2.67499999...` and rounds to `2.67`. Only true
/// binary midpoints such as `0.125` go to the even neighbour.
///
/// Values outside the range `Decimal` can represent have no fractional
/// digits at `f64` precision anyway, so they are returned unchanged.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(dp))
        // Going through the decimal string yields the nearest f64 to the rounded value.
        .and_then(|d| d.to_string().parse::<f64>().ok())
        .unwrap_or(value)
}
