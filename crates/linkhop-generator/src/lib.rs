pub mod random;
pub mod seq;

use linkhop_core::ShortCode;
use thiserror::Error;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness against the store is checked by the caller, which also
/// persists the code; a generated code is never reserved.
pub trait Generator: Send + Sync + 'static {
    /// Proposes a new short code.
    fn generate(&self) -> ShortCode;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("code length must be between 1 and {max}, got {length}")]
    InvalidLength { length: usize, max: usize },
    #[error("prefix must be at most {max} ASCII letters or digits: '{prefix}'")]
    InvalidPrefix { prefix: String, max: usize },
}
