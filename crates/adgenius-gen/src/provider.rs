use async_trait::async_trait;

use crate::error::GenerationError;

/// Single-shot text/image synthesis. Implementations make at most one
/// remote call per operation: no retry, no streaming, no cancellation.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Short ad copy for a product, shaped by audience and tone.
    async fn generate_copy(
        &self,
        product_name: &str,
        audience: &str,
        tone: &str,
    ) -> Result<String, GenerationError>;

    /// An inline-encoded image (`data:image/...;base64,...`) for a prompt.
    async fn generate_image(&self, prompt: &str) -> Result<String, GenerationError>;
}
