//! Realized ("finished") operations reconstructed from the journal.

mod finished_calculator;
mod finished_model;


pub use finished_calculator::finished_operations;
pub use finished_model::{FinishedOperation, FinishedOperationsReport, FinishedTotals};
