pub mod metrics;
pub mod providers;

pub use providers::gemini::GeminiTextProvider;
pub use providers::{ProviderError, TextProvider};
