// Top-level market engine: one state struct holding the three stores and
// exposing every public operation. Each operation is all-or-nothing — the
// caller serializes access (the HTTP layer holds a mutex across the whole
// call), and a returned error means no store changed.

use tracing::{info, warn};

use crate::amount::Amount;
use crate::balances::BalanceLedger;
use crate::error::MarketError;
use crate::market::{Category, Market, MarketRegistry, MarketStatus};
use crate::oracle::{self, Oracle, OracleQuery, OracleVerdict};
use crate::positions::{Position, PositionLedger};
use crate::settlement;

/// Everything a stake changed, locked in at execution time.
#[derive(Debug, Clone)]
pub struct StakeReceipt {
    pub market_id: String,
    pub outcome_id: String,
    pub amount: Amount,
    /// Price in effect at the moment of staking (pre-update totals).
    pub entry_price: Amount,
    pub shares_issued: Amount,
}

pub struct MarketEngine {
    registry: MarketRegistry,
    positions: PositionLedger,
    balances: BalanceLedger,
}

impl MarketEngine {
    pub fn new() -> Self {
        Self {
            registry: MarketRegistry::new(),
            positions: PositionLedger::new(),
            balances: BalanceLedger::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_market(
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
        let market_id = self.registry.create(
            title,
            description,
            category,
            resolution_deadline,
            resolution_source,
            outcome_descriptions,
            min_stake,
            creator.clone(),
            creation_time,
        )?;
        info!(market_id = %market_id, creator = %creator, "market created");
        Ok(market_id)
    }

    /// Place a stake. Both stores finish their checked arithmetic before
    /// either writes: the registry quotes price, shares and new totals
    /// against the pre-update state, the position ledger stages its
    /// accumulation, and only then do both commit. A failure at any step
    /// leaves both stores untouched.
    pub fn stake(
        &mut self,
        owner: &str,
        market_id: &str,
        outcome_id: &str,
        amount: Amount,
    ) -> Result<StakeReceipt, MarketError> {
        let quote = self.registry.quote_stake(market_id, outcome_id, amount)?;
        let staged = self.positions.prepare_stake(
            owner,
            market_id,
            outcome_id,
            quote.shares,
            amount,
            quote.price_now,
        )?;
        self.registry.commit_stake(market_id, &quote)?;
        self.positions.commit_stake(staged);

        info!(
            owner = %owner,
            market_id = %market_id,
            outcome_id = %outcome_id,
            amount = %amount,
            entry_price = %quote.price_now,
            shares = %quote.shares,
            "stake placed"
        );
        Ok(StakeReceipt {
            market_id: market_id.to_string(),
            outcome_id: outcome_id.to_string(),
            amount,
            entry_price: quote.price_now,
            shares_issued: quote.shares,
        })
    }

    /// Resolve a market through the oracle and distribute winnings.
    ///
    /// Only the creator may resolve. An unreachable or undecided oracle — or
    /// a verdict naming an outcome the market does not have — comes back as
    /// ResolutionInconclusive with the market still Active, so the caller can
    /// try again later. Resolving an already-resolved market fails with
    /// MarketNotActive and never re-distributes.
    pub async fn resolve(
        &mut self,
        market_id: &str,
        requester: &str,
        oracle: &dyn Oracle,
    ) -> Result<(), MarketError> {
        let (query, resolution_source) = {
            let market = self.registry.get(market_id)?;
            if market.status != MarketStatus::Active {
                return Err(MarketError::MarketNotActive(market_id.to_string()));
            }
            if market.creator != requester {
                return Err(MarketError::NotCreator(requester.to_string()));
            }
            (
                OracleQuery::for_market(market, String::new()),
                market.resolution_source.clone(),
            )
        };

        // Evidence fetch and oracle call are the only suspension points; the
        // caller's lock is held throughout, so no state is visible mid-flight.
        let evidence = match oracle::fetch_evidence(&resolution_source).await {
            Ok(evidence) => evidence,
            Err(reason) => {
                warn!(market_id = %market_id, %reason, "evidence fetch failed");
                return Err(MarketError::ResolutionInconclusive(reason));
            }
        };
        let query = OracleQuery { evidence, ..query };

        let verdict = oracle
            .adjudicate(&query)
            .await
            .map_err(MarketError::ResolutionInconclusive)?;

        let record = match verdict {
            OracleVerdict::Resolved(record) => record,
            OracleVerdict::Unresolved { reason } => {
                info!(market_id = %market_id, %reason, "oracle abstained, market stays active");
                return Err(MarketError::ResolutionInconclusive(reason));
            }
        };

        let winner = record.outcome_id.clone();
        {
            let market = self.registry.get(market_id)?;
            if market.outcome(&winner).is_none() {
                // The oracle named an outcome this market does not have;
                // treat it as undecided rather than crash.
                return Err(MarketError::ResolutionInconclusive(format!(
                    "oracle named unknown outcome {}",
                    winner
                )));
            }
            // Payouts commit before the status flip: if payout arithmetic
            // fails the market stays Active with no balances touched, and
            // the flip itself cannot fail after the validations above.
            let paid = settlement::distribute(market, &winner, &self.positions, &mut self.balances)?;
            info!(
                market_id = %market_id,
                winner = %winner,
                total_volume = %market.total_volume,
                paid = %paid,
                "market resolved, winnings distributed"
            );
        }
        self.registry.mark_resolved(market_id, &winner, record)?;
        Ok(())
    }

    /// Zero the owner's balance and return what was withdrawn.
    pub fn withdraw(&mut self, owner: &str) -> Result<Amount, MarketError> {
        let withdrawn = self.balances.withdraw(owner)?;
        info!(owner = %owner, amount = %withdrawn, "balance withdrawn");
        Ok(withdrawn)
    }

    // === Read access for the query layer ===

    pub fn market(&self, market_id: &str) -> Result<&Market, MarketError> {
        self.registry.get(market_id)
    }

    pub fn markets(&self) -> impl Iterator<Item = &Market> {
        self.registry.iter()
    }

    pub fn positions_of(&self, owner: &str) -> Vec<&Position> {
        self.positions.positions_of(owner)
    }

    pub fn balance_of(&self, owner: &str) -> Amount {
        self.balances.get(owner)
    }
}

impl Default for MarketEngine {
    fn default() -> Self {
        Self::new()
    }
}
