use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Background refreshes that must never overlap with themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefreshKind {
    MarketPrices,
    FxRates,
    CryptoPrices,
}

impl RefreshKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshKind::MarketPrices => "MARKET_PRICES",
            RefreshKind::FxRates => "FX_RATES",
            RefreshKind::CryptoPrices => "CRYPTO_PRICES",
        }
    }
}

impl fmt::Display for RefreshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks which refresh kinds are in flight.
///
/// Cloning shares the state, so one guard can be handed to every worker.
#[derive(Debug, Clone, Default)]
pub struct RefreshGuard {
    in_flight: Arc<Mutex<HashSet<RefreshKind>>>,
}

impl RefreshGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `kind`. Returns `None` when a refresh of that kind is already running.
    ///
    /// The claim is released when the returned ticket is dropped. Completion of
    /// a refresh should be followed by a full position recomputation.
    pub fn try_begin(&self, kind: RefreshKind) -> Option<RefreshTicket> {
        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !in_flight.insert(kind) {
            debug!("{} refresh already in flight, skipping", kind);
            return None;
        }
        debug!("{} refresh started", kind);
        Some(RefreshTicket {
            kind,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_running(&self, kind: RefreshKind) -> bool {
        self.in_flight
            .lock()
            .map(|in_flight| in_flight.contains(&kind))
            .unwrap_or(false)
    }
}

/// Proof that the holder owns the in-flight slot of one refresh kind.
#[derive(Debug)]
pub struct RefreshTicket {
    kind: RefreshKind,
    in_flight: Arc<Mutex<HashSet<RefreshKind>>>,
}

impl RefreshTicket {
    pub fn kind(&self) -> RefreshKind {
        self.kind
    }
}

impl Drop for RefreshTicket {
    fn drop(&mut self) {
        match self.in_flight.lock() {
            Ok(mut in_flight) => {
                in_flight.remove(&self.kind);
                debug!("{} refresh finished", self.kind);
            }
            Err(poisoned) => {
                error!("Refresh guard poisoned while releasing {}", self.kind);
                poisoned.into_inner().remove(&self.kind);
            }
        }
    }
}
