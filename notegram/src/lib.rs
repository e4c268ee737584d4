//! Internals of the notegram CLI, exposed for integration tests and the
//! xtask crate. The conversion itself lives in `notegram_format`.
pub mod cli;
pub mod config;
pub mod process;
