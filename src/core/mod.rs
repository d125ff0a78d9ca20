// src/core/mod.rs

pub mod sanitize;

pub use sanitize::{format_number, normalize};
