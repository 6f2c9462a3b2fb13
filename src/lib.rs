/// stakecast — stake-weighted prediction market ledger
/// Exports all modules for use as a library crate

pub mod amm;
pub mod amount;
pub mod app_state;
pub mod balances;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod market;
pub mod models;
pub mod oracle;
pub mod positions;
pub mod query;
pub mod settlement;

pub use amm::{share_price, shares_for, BASELINE_PRICE, MAX_PRICE, MIN_PRICE};
pub use amount::{Amount, WEI_PER_UNIT};
pub use balances::BalanceLedger;
pub use engine::{MarketEngine, StakeReceipt};
pub use error::MarketError;
pub use market::{Category, Market, MarketRegistry, MarketStatus, Outcome, StakeQuote};
pub use oracle::{fetch_evidence, HttpOracle, Oracle, OracleQuery, OracleVerdict, ScriptedOracle};
pub use positions::{Position, PositionLedger, StagedStake};
pub use query::{list_markets, list_positions, market_detail, trending, MarketDetail, MarketSummary, PositionSummary};
pub use settlement::{distribute, ResolutionRecord};
