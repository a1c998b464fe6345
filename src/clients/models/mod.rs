pub mod common;
pub mod raw;
