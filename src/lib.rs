pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod explore;
pub mod logging;
pub mod observability;
pub mod pipeline;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
