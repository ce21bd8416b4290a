pub mod gemini;

pub use gemini::{GeminiPlanSource, DEFAULT_MODEL, GEMINI_API_BASE};
