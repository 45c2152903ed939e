pub mod phone;
pub mod timestamps;

pub use phone::*;
pub use timestamps::*;
