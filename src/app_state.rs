// Application state for the HTTP layer.
//
// Every operation — mutating or read-only — runs under one async mutex, so
// operations are fully serialized (no two interleave their effects). The
// mutex is tokio's because `resolve` suspends on the oracle call while
// holding it; no state is observable mid-resolution.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::engine::MarketEngine;
use crate::oracle::Oracle;

pub type SharedState = Arc<Mutex<AppState>>;

pub struct AppState {
    pub engine: MarketEngine,
    pub oracle: Arc<dyn Oracle>,
}

impl AppState {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            engine: MarketEngine::new(),
            oracle,
        }
    }

    pub fn shared(oracle: Arc<dyn Oracle>) -> SharedState {
        Arc::new(Mutex::new(Self::new(oracle)))
    }
}
