use thiserror::Error;

/// Failures raised while drawing a mock offer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    /// A pool that must supply at least one value is empty
    #[error("invalid pool: mock data pool `{pool}` is empty")]
    InvalidPool { pool: &'static str },

    #[error("invalid pool: mock data pool `{pool}` has {actual} entries, {required} required")]
    PoolTooSmall {
        pool: &'static str,
        required: usize,
        actual: usize,
    },

    /// A generator setting that cannot produce a valid offer
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),
}
