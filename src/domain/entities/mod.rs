pub mod channel;
pub mod contact;
pub mod message;
pub mod session;
pub mod template;
pub mod whatsapp;

pub use channel::*;
pub use contact::*;
pub use message::*;
pub use session::*;
pub use template::*;
pub use whatsapp::*;
