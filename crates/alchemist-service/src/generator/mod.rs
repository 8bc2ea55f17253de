//! Article generation seam.
//!
//! The gateway treats generation as an opaque, fallible call:
//! `generate(keyword) -> BlogPost`. Production uses the Gemini client; tests
//! inject a scripted implementation.

pub mod gemini;

pub use gemini::{GeminiClient, DEFAULT_MODEL, MIN_BODY_WORDS};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A generated blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    /// SEO-friendly title.
    pub title: String,

    /// Two-to-three sentence summary, kept out of the body.
    pub tldr: String,

    /// Markdown article body.
    pub body: String,
}

impl BlogPost {
    /// Whitespace-delimited word count of the body.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn word_count(&self) -> u32 {
        self.body.split_whitespace().count() as u32
    }
}

/// Errors that can occur during article generation.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// HTTP request failed (network, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned an error response.
    #[error("provider error ({status}): {message}")]
    Api {
        /// HTTP status from the provider.
        status: u16,
        /// Provider error message.
        message: String,
    },

    /// The provider answered, but not with a usable blog post.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// The article body is under the minimum word count.
    #[error("blog post body is too short ({words} words)")]
    TooShort {
        /// Actual word count of the body.
        words: u32,
    },
}

/// An article generator.
///
/// One call per keyword; failures are isolated to the keyword and still
/// consume its credit.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Name of the generation approach, recorded on attempt records.
    fn approach(&self) -> &str;

    /// Generate a blog post for one keyword.
    ///
    /// # Errors
    ///
    /// Returns a [`GeneratorError`] when the provider fails, times out, or
    /// produces an unusable article.
    async fn generate(&self, keyword: &str) -> Result<BlogPost, GeneratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_splits_on_whitespace() {
        let post = BlogPost {
            title: "t".into(),
            tldr: "s".into(),
            body: "one two\nthree\tfour  five".into(),
        };
        assert_eq!(post.word_count(), 5);
    }
}
