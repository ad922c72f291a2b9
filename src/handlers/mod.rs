// Handler modules
pub mod chat;
pub mod inspect;
pub mod invoke;
pub mod serve;

// Re-export all handler functions
pub use chat::{ChatRequest, ChatResponse, HandlerResponse, handle_event};
pub use inspect::handle_inspect;
pub use invoke::handle_invoke;
pub use serve::handle_serve;
