pub mod error;
pub mod level;
