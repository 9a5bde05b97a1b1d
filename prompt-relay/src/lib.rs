//! prompt-relay: forwards prompts to the Gemini API using a server-held key.
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod services;
pub mod startup;
