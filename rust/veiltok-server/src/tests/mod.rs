//! End-to-end tests of the parties and their test utilities.

pub mod utils;

mod sharing;
mod tokenization;

pub use self::builder::{NetworkBuilder, TestNetwork};
