pub mod error;
pub mod gemini;
pub mod http;
pub mod mock;
pub mod types;

pub use gemini::GeminiProvider;
pub use types::ApiKey;
