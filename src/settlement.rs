// Settlement: winnings distribution for a resolved market.
//
// The entire market volume (losing stakes included) is split among holders of
// the winning outcome, proportional to the amount each invested — not to
// shares held. Floor rounding may leave a small residue locked in the market;
// that residue stays unclaimed by design.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::balances::BalanceLedger;
use crate::error::MarketError;
use crate::market::Market;
use crate::positions::PositionLedger;

/// The oracle's verdict as stored on a resolved market. Opaque to the core:
/// written once at resolution, surfaced by queries, never interpreted again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRecord {
    pub outcome_id: String,
    pub confidence: f64,
    pub summary: String,
    pub evidence: String,
}

/// Credit each winning position's payout to its owner's balance.
///
/// `payout = floor(total_invested * total_volume / winning_stakes)`
///
/// If nobody staked on the winning outcome this is a no-op: the volume stays
/// locked in the market, which is an accepted edge case rather than a bug.
/// Losing positions are left untouched for historical queries.
///
/// Returns the total amount paid out.
pub fn distribute(
    market: &Market,
    winning_outcome_id: &str,
    positions: &PositionLedger,
    balances: &mut BalanceLedger,
) -> Result<Amount, MarketError> {
    let winning_stakes = market
        .outcome(winning_outcome_id)
        .ok_or_else(|| MarketError::OutcomeNotFound(winning_outcome_id.to_string()))?
        .total_stakes;

    if winning_stakes.is_zero() {
        return Ok(Amount::ZERO);
    }

    // Two phases: compute every payout with checked arithmetic first, then
    // commit. A failure in the compute phase leaves all balances untouched.
    let mut payouts = Vec::new();
    let mut total_paid = Amount::ZERO;
    for (owner, invested) in positions.holders_of(&market.id, winning_outcome_id) {
        let payout = invested.mul_div(market.total_volume, winning_stakes)?;
        // Overflow check only; the credit itself happens in the commit loop.
        balances.get(&owner).checked_add(payout)?;
        total_paid = total_paid.checked_add(payout)?;
        payouts.push((owner, payout));
    }
    for (owner, payout) in payouts {
        balances.credit(&owner, payout)?;
    }
    Ok(total_paid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{Category, MarketRegistry};

    fn funded_market() -> (MarketRegistry, PositionLedger, String) {
        let mut registry = MarketRegistry::new();
        let mut positions = PositionLedger::new();
        let id = registry
            .create(
                "Winner?".to_string(),
                String::new(),
                Category::Sports,
                "2026-01-01".to_string(),
                "final score".to_string(),
                vec!["Yes".to_string(), "No".to_string()],
                Amount::from_unit_str("0.01").unwrap(),
                "alice".to_string(),
                0,
            )
            .unwrap();

        // alice 1.0 and bob 3.0 on Yes, carol 2.0 on No.
        for (owner, outcome, units) in
            [("alice", "outcome_1", 1), ("bob", "outcome_1", 3), ("carol", "outcome_2", 2)]
        {
            let amount = Amount::from_units(units);
            let (price, shares) = registry.record_stake(&id, outcome, amount).unwrap();
            positions
                .record_stake(owner, &id, outcome, shares, amount, price)
                .unwrap();
        }
        (registry, positions, id)
    }

    #[test]
    fn test_stake_proportional_split_of_full_volume() {
        let (registry, positions, id) = funded_market();
        let mut balances = BalanceLedger::new();
        let market = registry.get(&id).unwrap();

        let paid = distribute(market, "outcome_1", &positions, &mut balances).unwrap();

        // total_volume 6.0, winning_stakes 4.0:
        // alice floor(1 * 6 / 4) = 1.5, bob floor(3 * 6 / 4) = 4.5.
        assert_eq!(balances.get("alice"), Amount::from_unit_str("1.5").unwrap());
        assert_eq!(balances.get("bob"), Amount::from_unit_str("4.5").unwrap());
        assert_eq!(balances.get("carol"), Amount::ZERO);
        assert_eq!(paid, Amount::from_units(6));
    }

    #[test]
    fn test_unstaked_winner_is_a_noop() {
        let mut registry = MarketRegistry::new();
        let mut positions = PositionLedger::new();
        let id = registry
            .create(
                "Nobody picked right".to_string(),
                String::new(),
                Category::Other,
                String::new(),
                String::new(),
                vec!["Yes".to_string(), "No".to_string()],
                Amount::from_unit_str("0.01").unwrap(),
                "alice".to_string(),
                0,
            )
            .unwrap();
        let amount = Amount::from_units(2);
        let (price, shares) = registry.record_stake(&id, "outcome_1", amount).unwrap();
        positions
            .record_stake("alice", &id, "outcome_1", shares, amount, price)
            .unwrap();

        let mut balances = BalanceLedger::new();
        let market = registry.get(&id).unwrap();
        // Winner is outcome_2, which nobody staked: volume stays locked.
        let paid = distribute(market, "outcome_2", &positions, &mut balances).unwrap();
        assert_eq!(paid, Amount::ZERO);
        assert_eq!(balances.get("alice"), Amount::ZERO);
    }

    #[test]
    fn test_payout_sum_bounded_by_volume() {
        let mut registry = MarketRegistry::new();
        let mut positions = PositionLedger::new();
        let id = registry
            .create(
                "Rounding".to_string(),
                String::new(),
                Category::Other,
                String::new(),
                String::new(),
                vec!["A".to_string(), "B".to_string()],
                Amount::from_wei(1),
                "alice".to_string(),
                0,
            )
            .unwrap();

        // Awkward stakes to force floor loss.
        for (owner, outcome, wei) in [
            ("alice", "outcome_1", 1_000_000_000_000_000_001u128),
            ("bob", "outcome_1", 2_000_000_000_000_000_003),
            ("carol", "outcome_2", 999_999_999_999_999_999),
        ] {
            let amount = Amount::from_wei(wei);
            let (price, shares) = registry.record_stake(&id, outcome, amount).unwrap();
            positions
                .record_stake(owner, &id, outcome, shares, amount, price)
                .unwrap();
        }

        let mut balances = BalanceLedger::new();
        let market = registry.get(&id).unwrap();
        let winning_stakes = market.outcome("outcome_1").unwrap().total_stakes;
        let paid = distribute(market, "outcome_1", &positions, &mut balances).unwrap();

        assert!(paid <= market.total_volume);
        let shortfall = market.total_volume.checked_sub(paid).unwrap();
        assert!(shortfall < winning_stakes, "rounding loss is bounded");
    }
}
