pub mod google;
pub mod openai;

pub use google::GoogleTtsProvider;
pub use openai::OpenAiTtsProvider;
