//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod log;
pub mod quote;
pub mod rate;
pub mod rounding;

// Re-export main types for cleaner imports
pub use error::FetchError;
pub use quote::{Quote, QuoteProvider};
pub use rate::{CurrencyPair, ExchangeRate, RateProvider};
