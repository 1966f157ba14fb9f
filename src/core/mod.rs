//! Core translation engine module

pub mod batch;
pub mod client;
pub mod config;
pub mod document;
pub mod errors;
pub mod models;
pub mod placeholder;
pub mod provider;
