pub mod error;
pub mod gemini;
pub mod mock;
pub mod provider;

pub use error::GenerationError;
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use provider::GenerationProvider;
