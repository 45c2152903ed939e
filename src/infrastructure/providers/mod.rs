pub mod gotrue;

pub use gotrue::*;
