// Automated market maker pricing
//
// A fixed two-parameter bonded price curve: the share price of an outcome is
// a linear interpolation over the band [MIN_PRICE, MAX_PRICE] by the
// outcome's share of total market stakes. Prices across outcomes do NOT sum
// to a constant; this is a deliberate simplification, not a conserved-sum
// market maker.

use crate::amount::{Amount, WEI_PER_UNIT};
use crate::error::MarketError;

/// Price floor: 0.1 units per share.
pub const MIN_PRICE: Amount = Amount::from_wei(WEI_PER_UNIT / 10);

/// Price ceiling: 0.9 units per share.
pub const MAX_PRICE: Amount = Amount::from_wei(9 * WEI_PER_UNIT / 10);

/// Price of every outcome while the market has no stakes: 0.5 units,
/// the midpoint of the band.
pub const BASELINE_PRICE: Amount = Amount::from_wei(WEI_PER_UNIT / 2);

/// Current share price for one outcome given the stake distribution.
///
/// `price = MIN_PRICE + (outcome_stakes / total_market_stakes) * (MAX_PRICE - MIN_PRICE)`
///
/// With `outcome_stakes <= total_market_stakes` the result already lies in
/// the band; the clamp guards the derived fields against any caller that
/// passes stale totals.
pub fn share_price(outcome_stakes: Amount, total_market_stakes: Amount) -> Amount {
    if total_market_stakes.is_zero() {
        return BASELINE_PRICE;
    }
    let band = Amount::from_wei(MAX_PRICE.wei() - MIN_PRICE.wei());
    // ratio * band, computed as one exact mul_div; cannot overflow u128
    // because the result is at most `band`.
    let scaled = outcome_stakes
        .mul_div(band, total_market_stakes)
        .unwrap_or(band);
    let price = Amount::from_wei(MIN_PRICE.wei().saturating_add(scaled.wei()));
    price.clamp(MIN_PRICE, MAX_PRICE)
}

/// Shares issued for `amount` staked at `price`, truncating toward zero so
/// rounding never manufactures value.
pub fn shares_for(amount: Amount, price: Amount) -> Result<Amount, MarketError> {
    amount.fixed_div(price)
}
