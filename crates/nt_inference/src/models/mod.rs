pub mod gemini;
pub mod openai;

pub use gemini::GeminiSummarizer;
pub use openai::OpenAiSummarizer;
