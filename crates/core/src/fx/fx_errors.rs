use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("Rate cache error: {0}")]
    CacheError(String),
}
