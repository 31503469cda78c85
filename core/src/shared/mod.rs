//! Types shared across the crate

pub mod errors;
