// Request DTOs for the stakecast API.
//
// Staked/withdrawn amounts travel as decimal strings of base units (the
// Amount serde form); min_stake on market creation is a human decimal-unit
// string like "0.01", matching how creators think about it.

use serde::Deserialize;

use crate::amount::Amount;

/// POST /markets request body.
///
/// ```json
/// {
///   "title": "Super Bowl 2027 Winner",
///   "description": "Which team wins Super Bowl 2027?",
///   "category": "sports",
///   "resolution_deadline": "2027-02-14",
///   "resolution_source": "https://www.espn.com/nfl/",
///   "outcomes": ["Chiefs", "Bills", "Other"],
///   "min_stake": "0.01",
///   "creator": "alice"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateMarketRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub resolution_deadline: String,
    pub resolution_source: String,
    pub outcomes: Vec<String>,
    /// Decimal string of whole units.
    #[serde(default = "default_min_stake")]
    pub min_stake: String,
    pub creator: String,
}

fn default_min_stake() -> String {
    "0.01".to_string()
}

/// POST /markets/:id/stake request body. `amount` is in base units.
#[derive(Debug, Deserialize)]
pub struct StakeRequest {
    pub staker: String,
    pub outcome_id: String,
    pub amount: Amount,
}

/// POST /markets/:id/resolve request body.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub requester: String,
}

/// POST /withdraw request body.
#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub owner: String,
}

/// GET /markets query string. Empty strings mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct ListMarketsParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
