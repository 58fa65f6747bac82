//! AI judgment service client.

pub mod client;
pub mod retry;

pub use client::HttpJudge;
pub use retry::RetryPolicy;
