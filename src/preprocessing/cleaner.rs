use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CleanerError {
    #[error("Input is empty after cleaning")]
    EmptyInput,
    #[error("Input exceeds maximum length: {length} > {max}")]
    TooLong { length: usize, max: usize },
}

/// Input-collection step in front of the conversation engine.
#[derive(Debug, Clone, Copy)]
pub struct Cleaner {
    max_length: usize,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(Self::MAX_LENGTH)
    }
}

impl Cleaner {
    const MAX_LENGTH: usize = 4000;

    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Trim the submission and reject empty or oversized text. Length is
    /// counted in characters; accented text is kept as typed.
    pub fn clean(&self, input: &str) -> Result<String, CleanerError> {
        let cleaned = input.trim();

        if cleaned.is_empty() {
            return Err(CleanerError::EmptyInput);
        }

        let length = cleaned.chars().count();
        if length > self.max_length {
            return Err(CleanerError::TooLong {
                length,
                max: self.max_length,
            });
        }

        Ok(cleaned.to_string())
    }
}
