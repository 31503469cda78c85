//! Infrastructure: record store access and logging

pub mod db;
pub mod logging;
