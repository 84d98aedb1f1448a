pub mod cli;
pub mod config;
pub mod errors;
pub mod git;
pub mod review;
pub mod stack;

pub use errors::StackedError;
