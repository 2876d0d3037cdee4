use super::holdings_model::Position;
use crate::errors::Result;
use async_trait::async_trait;

/// Cache of the positions produced by the last full recomputation.
#[async_trait]
pub trait PositionRepositoryTrait: Send + Sync {
    fn list_positions(&self) -> Result<Vec<Position>>;
    /// Replaces every cached position. Returns the number stored.
    async fn replace_all(&self, positions: Vec<Position>) -> Result<usize>;
}
