// Market registry: creates markets, assigns sequential ids, owns all
// Market records (including their nested outcomes).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::amm;
use crate::amount::Amount;
use crate::error::MarketError;
use crate::settlement::ResolutionRecord;

/// Fixed category set. Anything else is rejected at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sports,
    Politics,
    Entertainment,
    Economics,
    Crypto,
    Other,
}

impl FromStr for Category {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sports" => Ok(Category::Sports),
            "politics" => Ok(Category::Politics),
            "entertainment" => Ok(Category::Entertainment),
            "economics" => Ok(Category::Economics),
            "crypto" => Ok(Category::Crypto),
            "other" => Ok(Category::Other),
            _ => Err(MarketError::InvalidCategory(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Sports => "sports",
            Category::Politics => "politics",
            Category::Entertainment => "entertainment",
            Category::Economics => "economics",
            Category::Crypto => "crypto",
            Category::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// Market lifecycle status.
///
/// Flow: Active -> Resolved (settlement) or Active -> Cancelled (external
/// administrative path; no core operation produces it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Active,
    Resolved,
    Cancelled,
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarketStatus::Active => "active",
            MarketStatus::Resolved => "resolved",
            MarketStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// One enumerated outcome of a market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    /// `outcome_{i}`, 1-based position in the market's outcome list.
    pub id: String,
    pub description: String,
    /// Sum of all stakes ever placed on this outcome. Monotonically
    /// non-decreasing while the market is active, frozen afterwards.
    pub total_stakes: Amount,
    /// Derived from the stake distribution by the AMM; never mutated
    /// independently.
    pub share_price: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub creator: String,
    /// Unix timestamp (seconds).
    pub creation_time: u64,
    /// Date string supplied by the creator, e.g. "2026-02-15".
    pub resolution_deadline: String,
    /// URL or free text fed to the oracle as evidence at resolution time.
    pub resolution_source: String,
    pub status: MarketStatus,
    /// Ordered, fixed at creation (2..=10 entries).
    pub outcomes: Vec<Outcome>,
    /// Always equals the sum of outcome total_stakes.
    pub total_volume: Amount,
    /// Some iff status == Resolved.
    pub resolved_outcome_id: Option<String>,
    /// Oracle verdict stored at resolution, opaque to the core.
    pub resolution_record: Option<ResolutionRecord>,
    pub min_stake: Amount,
}

impl Market {
    pub fn outcome(&self, outcome_id: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.id == outcome_id)
    }

    /// Recompute every outcome's share price against the current volume.
    /// A stake on one outcome moves the displayed price of all of them.
    fn reprice(&mut self) {
        for outcome in &mut self.outcomes {
            outcome.share_price = amm::share_price(outcome.total_stakes, self.total_volume);
        }
    }
}

/// A validated stake, priced at pre-update totals with the post-stake totals
/// already computed. Produced by `quote_stake`, applied by `commit_stake`.
#[derive(Debug, Clone)]
pub struct StakeQuote {
    outcome_index: usize,
    new_stakes: Amount,
    new_volume: Amount,
    pub price_now: Amount,
    pub shares: Amount,
}

/// Owns all Market records, keyed by the numeric counter so iteration is
/// always creation order (string ids would sort "market_10" before
/// "market_2").
pub struct MarketRegistry {
    markets: BTreeMap<u64, Market>,
    /// Incremented exactly once per successful creation, only after
    /// validation passes. Never reused.
    counter: u64,
}

impl MarketRegistry {
    pub fn new() -> Self {
        Self {
            markets: BTreeMap::new(),
            counter: 0,
        }
    }

    /// Create a market. Validation happens before the counter moves, so a
    /// rejected request never burns an id.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        title: String,
        description: String,
        category: Category,
        resolution_deadline: String,
        resolution_source: String,
        outcome_descriptions: Vec<String>,
        min_stake: Amount,
        creator: String,
        creation_time: u64,
    ) -> Result<String, MarketError> {
        if outcome_descriptions.len() < 2 || outcome_descriptions.len() > 10 {
            return Err(MarketError::InvalidOutcomeCount(outcome_descriptions.len()));
        }
        if min_stake.is_zero() {
            return Err(MarketError::InvalidAmount(
                "min_stake must be positive".to_string(),
            ));
        }

        self.counter += 1;
        let market_id = format!("market_{}", self.counter);

        let outcomes = outcome_descriptions
            .into_iter()
            .enumerate()
            .map(|(i, description)| Outcome {
                id: format!("outcome_{}", i + 1),
                description,
                total_stakes: Amount::ZERO,
                share_price: amm::share_price(Amount::ZERO, Amount::ZERO),
            })
            .collect();

        let market = Market {
            id: market_id.clone(),
            title,
            description,
            category,
            creator,
            creation_time,
            resolution_deadline,
            resolution_source,
            status: MarketStatus::Active,
            outcomes,
            total_volume: Amount::ZERO,
            resolved_outcome_id: None,
            resolution_record: None,
            min_stake,
        };

        self.markets.insert(self.counter, market);
        Ok(market_id)
    }

    pub fn get(&self, market_id: &str) -> Result<&Market, MarketError> {
        self.markets
            .values()
            .find(|m| m.id == market_id)
            .ok_or_else(|| MarketError::MarketNotFound(market_id.to_string()))
    }

    fn get_mut(&mut self, market_id: &str) -> Result<&mut Market, MarketError> {
        self.markets
            .values_mut()
            .find(|m| m.id == market_id)
            .ok_or_else(|| MarketError::MarketNotFound(market_id.to_string()))
    }

    /// Markets in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Market> {
        self.markets.values()
    }

    /// Validate a stake against an outcome and price it at the current
    /// (pre-update) totals, without mutating anything. All the checked
    /// arithmetic happens here, so `commit_stake` cannot fail mid-write.
    pub fn quote_stake(
        &self,
        market_id: &str,
        outcome_id: &str,
        amount: Amount,
    ) -> Result<StakeQuote, MarketError> {
        let market = self.get(market_id)?;

        if market.status != MarketStatus::Active {
            return Err(MarketError::MarketNotActive(market_id.to_string()));
        }
        let outcome_index = market
            .outcomes
            .iter()
            .position(|o| o.id == outcome_id)
            .ok_or_else(|| MarketError::OutcomeNotFound(outcome_id.to_string()))?;
        if amount < market.min_stake {
            return Err(MarketError::StakeBelowMinimum {
                staked: amount.to_string(),
                minimum: market.min_stake.to_string(),
            });
        }

        // Price is locked in at the moment of staking, against pre-update
        // totals.
        let price_now = amm::share_price(
            market.outcomes[outcome_index].total_stakes,
            market.total_volume,
        );
        let shares = amm::shares_for(amount, price_now)?;

        // Both new totals are computed here, so overflow cannot leave volume
        // out of step with the sum of outcome stakes.
        let new_stakes = market.outcomes[outcome_index]
            .total_stakes
            .checked_add(amount)?;
        let new_volume = market.total_volume.checked_add(amount)?;

        Ok(StakeQuote {
            outcome_index,
            new_stakes,
            new_volume,
            price_now,
            shares,
        })
    }

    /// Apply a quoted stake: write the new totals and reprice every outcome.
    /// The only failure is a missing market, which writes nothing.
    pub fn commit_stake(
        &mut self,
        market_id: &str,
        quote: &StakeQuote,
    ) -> Result<(), MarketError> {
        let market = self.get_mut(market_id)?;
        market.outcomes[quote.outcome_index].total_stakes = quote.new_stakes;
        market.total_volume = quote.new_volume;
        market.reprice();
        Ok(())
    }

    /// Quote and commit in one call, for callers with no cross-store
    /// bookkeeping of their own. Returns `(price_now, shares_issued)`.
    pub fn record_stake(
        &mut self,
        market_id: &str,
        outcome_id: &str,
        amount: Amount,
    ) -> Result<(Amount, Amount), MarketError> {
        let quote = self.quote_stake(market_id, outcome_id, amount)?;
        self.commit_stake(market_id, &quote)?;
        Ok((quote.price_now, quote.shares))
    }

    /// Transition a market to Resolved with the oracle's verdict.
    /// Only the settlement engine calls this.
    pub fn mark_resolved(
        &mut self,
        market_id: &str,
        winning_outcome_id: &str,
        record: ResolutionRecord,
    ) -> Result<(), MarketError> {
        let market = self.get_mut(market_id)?;
        if market.status != MarketStatus::Active {
            return Err(MarketError::MarketNotActive(market_id.to_string()));
        }
        if market.outcome(winning_outcome_id).is_none() {
            return Err(MarketError::OutcomeNotFound(winning_outcome_id.to_string()));
        }
        market.status = MarketStatus::Resolved;
        market.resolved_outcome_id = Some(winning_outcome_id.to_string());
        market.resolution_record = Some(record);
        Ok(())
    }
}

impl Default for MarketRegistry {
    fn default() -> Self {
        Self::new()
    }
}
