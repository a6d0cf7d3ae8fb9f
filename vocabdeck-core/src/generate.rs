use crate::GenerationError;
use async_trait::async_trait;

/// External generation collaborator used to populate a card's auxiliary
/// fields (explanation text, image reference). Never called by the
/// scheduler or session engine.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A short learner-facing explanation for the word. `hint` steers the
    /// wording when provided.
    async fn generate_explanation(
        &self,
        word: &str,
        meaning: &str,
        hint: Option<&str>,
    ) -> Result<String, GenerationError>;

    /// An image reference (e.g. a base64 data URL) illustrating the word.
    async fn generate_image(&self, word: &str, meaning: &str) -> Result<String, GenerationError>;
}
