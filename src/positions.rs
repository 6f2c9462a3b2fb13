// Position ledger: per-user, per-(market, outcome) holdings.
//
// Positions are created on a user's first stake on a (market, outcome) pair,
// accumulated on every later stake, and never deleted — losing positions stay
// in storage for historical queries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::amount::Amount;
use crate::error::MarketError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub market_id: String,
    pub outcome_id: String,
    pub shares: Amount,
    pub total_invested: Amount,
    /// total_invested / shares, fixed-point, truncating.
    pub average_price: Amount,
}

/// A stake's full effect on one position, validated but not yet written.
/// Produced by `prepare_stake`, applied by `commit_stake`.
#[derive(Debug)]
pub struct StagedStake {
    owner: String,
    key: String,
    position: Position,
}

/// Owns all Position records, keyed by owner then by "{market_id}_{outcome_id}".
/// BTreeMaps keep iteration deterministic.
#[derive(Debug, Default)]
pub struct PositionLedger {
    positions: BTreeMap<String, BTreeMap<String, Position>>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn position_key(market_id: &str, outcome_id: &str) -> String {
        format!("{}_{}", market_id, outcome_id)
    }

    /// Compute the position as it would stand after a stake the registry has
    /// already priced: created on a first stake, accumulated afterwards. All
    /// arithmetic is checked here and nothing is written, so `commit_stake`
    /// cannot fail.
    pub fn prepare_stake(
        &self,
        owner: &str,
        market_id: &str,
        outcome_id: &str,
        shares: Amount,
        amount: Amount,
        price_now: Amount,
    ) -> Result<StagedStake, MarketError> {
        let key = Self::position_key(market_id, outcome_id);
        let existing = self.positions.get(owner).and_then(|owned| owned.get(&key));

        let position = match existing {
            Some(position) => {
                let new_shares = position.shares.checked_add(shares)?;
                let new_invested = position.total_invested.checked_add(amount)?;
                let average_price = if new_shares.is_zero() {
                    position.average_price
                } else {
                    new_invested.fixed_div(new_shares)?
                };
                Position {
                    market_id: market_id.to_string(),
                    outcome_id: outcome_id.to_string(),
                    shares: new_shares,
                    total_invested: new_invested,
                    average_price,
                }
            }
            None => Position {
                market_id: market_id.to_string(),
                outcome_id: outcome_id.to_string(),
                shares,
                total_invested: amount,
                average_price: price_now,
            },
        };

        Ok(StagedStake {
            owner: owner.to_string(),
            key,
            position,
        })
    }

    /// Write a staged stake. Infallible so a caller can sequence it after
    /// every fallible step of a multi-store operation.
    pub fn commit_stake(&mut self, staged: StagedStake) {
        self.positions
            .entry(staged.owner)
            .or_default()
            .insert(staged.key, staged.position);
    }

    /// Prepare and commit in one call, for callers with no cross-store
    /// bookkeeping of their own.
    pub fn record_stake(
        &mut self,
        owner: &str,
        market_id: &str,
        outcome_id: &str,
        shares: Amount,
        amount: Amount,
        price_now: Amount,
    ) -> Result<(), MarketError> {
        let staged = self.prepare_stake(owner, market_id, outcome_id, shares, amount, price_now)?;
        self.commit_stake(staged);
        Ok(())
    }

    /// All positions held by one owner, in key order.
    pub fn positions_of(&self, owner: &str) -> Vec<&Position> {
        self.positions
            .get(owner)
            .map(|owned| owned.values().collect())
            .unwrap_or_default()
    }

    /// Owners holding a position on the given (market, outcome), with the
    /// amount each invested. Used by settlement to pay winners.
    pub fn holders_of(&self, market_id: &str, outcome_id: &str) -> Vec<(String, Amount)> {
        let key = Self::position_key(market_id, outcome_id);
        self.positions
            .iter()
            .filter_map(|(owner, owned)| {
                owned
                    .get(&key)
                    .map(|position| (owner.clone(), position.total_invested))
            })
            .collect()
    }
}
