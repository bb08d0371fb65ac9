pub mod context;
pub mod conversation_service;
pub mod token_service;

pub use context::AppContext;
pub use conversation_service::{ConversationService, PostMessageResponse};
pub use token_service::TokenService;
