use crate::{Generator, GeneratorError};
use linkhop_core::{ShortCode, MAX_SHORT_CODE_LENGTH};
use rand::Rng;

/// Symbols a random code is drawn from: ASCII letters and digits.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Generates fixed-length codes with every symbol sampled independently and
/// uniformly from [`ALPHABET`].
///
/// At the default length the code space holds 62^6 (about 5.6e10) codes.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing codes of `length` symbols.
    pub fn new(length: usize) -> Result<Self, GeneratorError> {
        if length == 0 || length > MAX_SHORT_CODE_LENGTH {
            return Err(GeneratorError::InvalidLength {
                length,
                max: MAX_SHORT_CODE_LENGTH,
            });
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn alphabet_has_62_unique_symbols() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 62);
        assert!(ALPHABET.iter().all(u8::is_ascii_alphanumeric));
    }

    #[test]
    fn default_length_is_six() {
        let generator = RandomGenerator::default();
        assert_eq!(generator.length(), 6);
        assert_eq!(generator.generate().as_str().len(), 6);
    }

    #[test]
    fn codes_have_configured_length_and_alphabet() {
        for length in 1..=MAX_SHORT_CODE_LENGTH {
            let generator = RandomGenerator::new(length).unwrap();
            for _ in 0..200 {
                let code = generator.generate();
                assert_eq!(code.as_str().len(), length);
                assert!(code.as_str().bytes().all(|b| ALPHABET.contains(&b)));
                // Generated codes always pass the public validation rules.
                assert!(ShortCode::new(code.as_str()).is_ok());
            }
        }
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert_eq!(
            RandomGenerator::new(0).unwrap_err(),
            GeneratorError::InvalidLength { length: 0, max: 10 }
        );
        assert!(RandomGenerator::new(11).is_err());
    }

    #[test]
    fn codes_vary() {
        let generator = RandomGenerator::default();
        let codes: HashSet<_> = (0..100).map(|_| generator.generate()).collect();
        assert!(codes.len() > 90);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
