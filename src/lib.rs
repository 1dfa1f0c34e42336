pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod indexer;
pub mod models;
pub mod parse;
pub mod server;
pub mod service;
pub mod stats;
