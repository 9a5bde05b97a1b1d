//! HTTP handlers for prompt-relay.

pub mod generate;
pub mod health;
pub mod metrics;

pub use generate::generate;
pub use health::health_check;
pub use metrics::metrics;
