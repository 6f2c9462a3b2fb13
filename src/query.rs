// Read-only projections over the engine's stores. No invariants of its own;
// everything here is a view assembled per request.

use serde::Serialize;

use crate::amount::Amount;
use crate::engine::MarketEngine;
use crate::error::MarketError;
use crate::market::{Category, Market, MarketStatus, Outcome};
use crate::settlement::ResolutionRecord;

/// Listing/trending row.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSummary {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub status: MarketStatus,
    pub total_volume: Amount,
    pub outcome_count: usize,
}

/// Full market view, including outcomes and any resolution record.
#[derive(Debug, Clone, Serialize)]
pub struct MarketDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub creator: String,
    pub creation_time: u64,
    pub resolution_deadline: String,
    pub resolution_source: String,
    pub status: MarketStatus,
    pub total_volume: Amount,
    pub resolved_outcome_id: Option<String>,
    pub resolution_record: Option<ResolutionRecord>,
    pub min_stake: Amount,
    pub outcomes: Vec<Outcome>,
}

/// A user's position joined with its market's title and status.
#[derive(Debug, Clone, Serialize)]
pub struct PositionSummary {
    pub market_id: String,
    pub market_title: String,
    pub market_status: MarketStatus,
    pub outcome_id: String,
    pub shares: Amount,
    pub total_invested: Amount,
    pub average_price: Amount,
}

fn summary(market: &Market) -> MarketSummary {
    MarketSummary {
        id: market.id.clone(),
        title: market.title.clone(),
        category: market.category,
        status: market.status,
        total_volume: market.total_volume,
        outcome_count: market.outcomes.len(),
    }
}

/// Markets in creation order, optionally filtered by exact category/status.
pub fn list_markets(
    engine: &MarketEngine,
    category: Option<Category>,
    status: Option<MarketStatus>,
) -> Vec<MarketSummary> {
    engine
        .markets()
        .filter(|m| category.map_or(true, |c| m.category == c))
        .filter(|m| status.map_or(true, |s| m.status == s))
        .map(summary)
        .collect()
}

pub fn market_detail(engine: &MarketEngine, market_id: &str) -> Result<MarketDetail, MarketError> {
    let market = engine.market(market_id)?;
    Ok(MarketDetail {
        id: market.id.clone(),
        title: market.title.clone(),
        description: market.description.clone(),
        category: market.category,
        creator: market.creator.clone(),
        creation_time: market.creation_time,
        resolution_deadline: market.resolution_deadline.clone(),
        resolution_source: market.resolution_source.clone(),
        status: market.status,
        total_volume: market.total_volume,
        resolved_outcome_id: market.resolved_outcome_id.clone(),
        resolution_record: market.resolution_record.clone(),
        min_stake: market.min_stake,
        outcomes: market.outcomes.clone(),
    })
}

pub fn list_positions(engine: &MarketEngine, owner: &str) -> Vec<PositionSummary> {
    engine
        .positions_of(owner)
        .into_iter()
        .filter_map(|position| {
            // A position always references a stored market; skip rather
            // than fail if that ever stops holding.
            engine.market(&position.market_id).ok().map(|market| PositionSummary {
                market_id: position.market_id.clone(),
                market_title: market.title.clone(),
                market_status: market.status,
                outcome_id: position.outcome_id.clone(),
                shares: position.shares,
                total_invested: position.total_invested,
                average_price: position.average_price,
            })
        })
        .collect()
}

/// Active markets sorted by volume descending, top 10. The sort is stable,
/// so equal volumes keep creation order.
pub fn trending(engine: &MarketEngine) -> Vec<MarketSummary> {
    let mut active: Vec<MarketSummary> = engine
        .markets()
        .filter(|m| m.status == MarketStatus::Active)
        .map(summary)
        .collect();
    active.sort_by(|a, b| b.total_volume.cmp(&a.total_volume));
    active.truncate(10);
    active
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_markets(count: usize) -> MarketEngine {
        let mut engine = MarketEngine::new();
        for i in 0..count {
            engine
                .create_market(
                    format!("Market {}", i + 1),
                    String::new(),
                    if i % 2 == 0 { Category::Sports } else { Category::Crypto },
                    "2026-12-31".to_string(),
                    "source".to_string(),
                    vec!["Yes".to_string(), "No".to_string()],
                    Amount::from_unit_str("0.01").unwrap(),
                    "alice".to_string(),
                    1_700_000_000 + i as u64,
                )
                .unwrap();
        }
        engine
    }

    #[test]
    fn test_list_markets_filters_exact() {
        let engine = engine_with_markets(4);
        assert_eq!(list_markets(&engine, None, None).len(), 4);
        assert_eq!(list_markets(&engine, Some(Category::Sports), None).len(), 2);
        assert_eq!(
            list_markets(&engine, None, Some(MarketStatus::Resolved)).len(),
            0
        );
    }

    #[test]
    fn test_trending_sorted_truncated_and_stable() {
        let mut engine = engine_with_markets(12);
        // market_3 gets the most volume, market_7 second.
        engine
            .stake("bob", "market_3", "outcome_1", Amount::from_units(9))
            .unwrap();
        engine
            .stake("bob", "market_7", "outcome_1", Amount::from_units(4))
            .unwrap();

        let trending = trending(&engine);
        assert_eq!(trending.len(), 10);
        assert_eq!(trending[0].id, "market_3");
        assert_eq!(trending[1].id, "market_7");
        // Zero-volume ties keep creation order.
        assert_eq!(trending[2].id, "market_1");
        assert_eq!(trending[3].id, "market_2");
    }

    #[test]
    fn test_market_detail_not_found() {
        let engine = engine_with_markets(1);
        assert!(matches!(
            market_detail(&engine, "market_9").unwrap_err(),
            MarketError::MarketNotFound(_)
        ));
    }

    #[test]
    fn test_positions_joined_with_market() {
        let mut engine = engine_with_markets(1);
        engine
            .stake("bob", "market_1", "outcome_1", Amount::from_units(1))
            .unwrap();
        let positions = list_positions(&engine, "bob");
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].market_title, "Market 1");
        assert_eq!(positions[0].market_status, MarketStatus::Active);
        assert_eq!(positions[0].shares, Amount::from_units(2));
    }
}
