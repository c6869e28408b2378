//! Core domain + application logic for the Web3 scout bot.
//!
//! This crate is framework-agnostic. Telegram, Twitter, OpenAI and CoinGecko
//! live behind ports (traits) implemented in adapter crates.

pub mod analysis;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod report;
pub mod research;
pub mod service;
pub mod session;
pub mod sources;

pub use errors::{Error, Result};
