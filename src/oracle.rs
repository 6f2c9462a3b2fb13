// Oracle interface: the external decision service that resolves a market.
//
// The core treats the oracle as a deterministic black box — same query, same
// verdict. It never retries internally; an unavailable or undecided oracle
// surfaces as ResolutionInconclusive and the market stays Active for a later
// attempt.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::market::Market;
use crate::settlement::ResolutionRecord;

/// What the settlement engine sends to the oracle.
#[derive(Debug, Clone, Serialize)]
pub struct OracleQuery {
    pub market_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub outcomes: Vec<OutcomeChoice>,
    /// Resolution-source text, or the fetched page text when the source is
    /// a URL.
    pub evidence: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeChoice {
    pub id: String,
    pub description: String,
}

impl OracleQuery {
    pub fn for_market(market: &Market, evidence: String) -> Self {
        Self {
            market_id: market.id.clone(),
            title: market.title.clone(),
            description: market.description.clone(),
            category: market.category.to_string(),
            outcomes: market
                .outcomes
                .iter()
                .map(|o| OutcomeChoice {
                    id: o.id.clone(),
                    description: o.description.clone(),
                })
                .collect(),
            evidence,
        }
    }
}

/// The oracle's answer: a single winning outcome with its supporting record,
/// or an explicit refusal to decide.
#[derive(Debug, Clone)]
pub enum OracleVerdict {
    Resolved(ResolutionRecord),
    Unresolved { reason: String },
}

/// Decision service consumed by the settlement engine.
///
/// Implementations: HttpOracle (production resolver service), ScriptedOracle
/// (deterministic, for tests and local runs).
#[async_trait::async_trait]
pub trait Oracle: Send + Sync {
    /// Decide the market. Errors mean the oracle was unreachable; the
    /// settlement engine treats that the same as an Unresolved verdict.
    async fn adjudicate(&self, query: &OracleQuery) -> Result<OracleVerdict, String>;

    fn source_name(&self) -> &str;
}

// ============================================================================
// HTTP RESOLVER ADAPTER
// ============================================================================

/// Wire shape returned by the resolver service.
#[derive(Debug, Deserialize)]
struct ResolverResponse {
    resolved_outcome_id: Option<String>,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    resolution_summary: String,
    #[serde(default)]
    evidence: String,
}

/// Adapter for an HTTP resolver service: POSTs the query as JSON and expects
/// a `ResolverResponse` back.
pub struct HttpOracle {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpOracle {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// Build from RESOLVER_URL, if configured.
    pub fn from_env() -> Option<Self> {
        std::env::var("RESOLVER_URL").ok().map(Self::new)
    }
}

#[async_trait::async_trait]
impl Oracle for HttpOracle {
    async fn adjudicate(&self, query: &OracleQuery) -> Result<OracleVerdict, String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(query)
            .send()
            .await
            .map_err(|e| format!("resolver unreachable: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("resolver returned {}", response.status()));
        }

        let body: ResolverResponse = response
            .json()
            .await
            .map_err(|e| format!("resolver response malformed: {}", e))?;

        match body.resolved_outcome_id {
            Some(outcome_id) => Ok(OracleVerdict::Resolved(ResolutionRecord {
                outcome_id,
                confidence: body.confidence,
                summary: body.resolution_summary,
                evidence: body.evidence,
            })),
            None => Ok(OracleVerdict::Unresolved {
                reason: if body.resolution_summary.is_empty() {
                    "insufficient data".to_string()
                } else {
                    body.resolution_summary
                },
            }),
        }
    }

    fn source_name(&self) -> &str {
        "http_resolver"
    }
}

/// Fetch evidence text for a market's resolution source. URLs are fetched
/// and stripped to text; anything else is already the evidence.
pub async fn fetch_evidence(resolution_source: &str) -> Result<String, String> {
    if !resolution_source.starts_with("http") {
        return Ok(resolution_source.to_string());
    }

    let body = reqwest::get(resolution_source)
        .await
        .map_err(|e| format!("failed to fetch {}: {}", resolution_source, e))?
        .text()
        .await
        .map_err(|e| format!("failed to read {}: {}", resolution_source, e))?;

    let document = scraper::Html::parse_document(&body);
    let text: Vec<&str> = document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    Ok(text.join(" "))
}

// ============================================================================
// SCRIPTED ORACLE (tests, local runs)
// ============================================================================

/// Deterministic oracle with pre-seeded verdicts per market id. Markets it
/// has no script for come back Unresolved.
#[derive(Default)]
pub struct ScriptedOracle {
    verdicts: BTreeMap<String, OracleVerdict>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn will_resolve(mut self, market_id: &str, outcome_id: &str, summary: &str) -> Self {
        self.verdicts.insert(
            market_id.to_string(),
            OracleVerdict::Resolved(ResolutionRecord {
                outcome_id: outcome_id.to_string(),
                confidence: 0.95,
                summary: summary.to_string(),
                evidence: String::new(),
            }),
        );
        self
    }

    pub fn will_abstain(mut self, market_id: &str, reason: &str) -> Self {
        self.verdicts.insert(
            market_id.to_string(),
            OracleVerdict::Unresolved {
                reason: reason.to_string(),
            },
        );
        self
    }
}

#[async_trait::async_trait]
impl Oracle for ScriptedOracle {
    async fn adjudicate(&self, query: &OracleQuery) -> Result<OracleVerdict, String> {
        Ok(self
            .verdicts
            .get(&query.market_id)
            .cloned()
            .unwrap_or(OracleVerdict::Unresolved {
                reason: "no verdict scripted".to_string(),
            }))
    }

    fn source_name(&self) -> &str {
        "scripted"
    }
}
