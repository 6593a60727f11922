use crate::{Generator, GeneratorError};
use linkhop_core::{ShortCode, MAX_SHORT_CODE_LENGTH};
use std::sync::atomic::{AtomicU64, Ordering};

const COUNTER_WIDTH: usize = 6;
const MAX_PREFIX_LENGTH: usize = MAX_SHORT_CODE_LENGTH - COUNTER_WIDTH;

/// A short code generator using sequential counters.
///
/// This generator produces codes like "ab000000", "ab000001", etc. Codes are
/// predictable, so it suits tests and local runs rather than public
/// deployments. Once the counter outgrows six digits the codes get longer
/// than the store accepts.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGenerator {
    /// Creates a new sequential generator with a custom prefix.
    ///
    /// The prefix holds at most four ASCII letters or digits.
    pub fn with_prefix(prefix: impl Into<String>) -> Result<Self, GeneratorError> {
        Self::with_offset(prefix, 0)
    }

    /// Creates a new sequential generator starting from a specific counter value.
    ///
    /// Useful for resuming from a known state.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Result<Self, GeneratorError> {
        let prefix = prefix.into();
        if prefix.len() > MAX_PREFIX_LENGTH || !prefix.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(GeneratorError::InvalidPrefix {
                prefix,
                max: MAX_PREFIX_LENGTH,
            });
        }

        Ok(Self {
            counter: AtomicU64::new(offset),
            prefix,
        })
    }
}

impl Generator for SeqGenerator {
    fn generate(&self) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new_unchecked(format!("{}{:0width$}", self.prefix, count, width = COUNTER_WIDTH))
    }
}
