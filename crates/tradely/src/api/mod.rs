//! Client for the Tradely analysis backend

pub mod client;
pub mod types;

pub use client::{BackendClient, DEFAULT_PERIOD, normalize_ticker};
pub use types::{NewsItem, NewsResponse, PricePoint};
