pub mod chat_list;
pub mod chat_window;
pub mod contact_service;
pub mod message_service;
pub mod session_service;
pub mod webhook_service;

pub use chat_list::*;
pub use chat_window::*;
pub use contact_service::*;
pub use message_service::*;
pub use session_service::*;
pub use webhook_service::*;
