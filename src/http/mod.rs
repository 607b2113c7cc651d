//! HTTP client construction and request admission.
mod client;
mod rate;


pub use client::build_client;
pub use rate::RateLimiter;
