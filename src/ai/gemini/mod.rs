pub mod backend;
pub mod client;

pub use backend::GeminiBackend;
