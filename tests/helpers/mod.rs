#![allow(unused_imports)]
pub mod app;
pub mod fakes;
pub mod fixtures;
pub mod test_db;

pub use app::*;
pub use fakes::*;
pub use fixtures::*;
pub use test_db::*;
