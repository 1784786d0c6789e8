//! Request and response bodies

pub mod prediction;
pub mod status;

pub use prediction::*;
pub use status::*;
