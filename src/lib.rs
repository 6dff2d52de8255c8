pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod server;

// Domain data shapes and the pure view resolver
pub mod domain;
pub mod resolver;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
