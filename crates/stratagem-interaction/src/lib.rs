//! Generation clients: turn a topic into a validated batch of perspectives.

pub mod factory;
pub mod gemini_api_client;
pub mod prompt;
pub mod proxy_client;
pub mod response;

pub use factory::build_generator;
pub use gemini_api_client::GeminiPerspectiveClient;
pub use proxy_client::ProxyPerspectiveClient;
