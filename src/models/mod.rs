pub mod common;
pub mod backend;
pub mod request;
pub mod translation;

pub use common::*;
pub use backend::*;
pub use request::*;
pub use translation::*;
