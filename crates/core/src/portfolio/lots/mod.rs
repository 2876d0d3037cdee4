//! FIFO lot tracking.

mod lot_tracker;
mod lots_model;


pub use lot_tracker::LotTracker;
pub use lots_model::{Lot, LotConsumption, LotDraw};
