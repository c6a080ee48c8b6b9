//! statforge CLI library.

pub mod cli;
pub mod dump;
