//! Refresh module - single-flight guard for background price and rate refreshes.

mod refresh_guard;

pub use refresh_guard::{RefreshGuard, RefreshKind, RefreshTicket};
