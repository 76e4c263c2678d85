// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod core;
pub mod extract;

pub mod client;
pub mod error;
pub mod form;
pub mod params;
pub mod session;
pub mod types;

pub use error::{Error, Result};
