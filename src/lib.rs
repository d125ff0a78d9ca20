// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;

pub mod browser;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod specs;

pub mod file;
pub mod log;
pub mod matcher;
pub mod portal;
pub mod progress;
pub mod records;
pub mod runner;
pub mod scrape;
pub mod store;

pub use error::{Error, Result};
