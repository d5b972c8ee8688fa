pub mod config;
pub mod error;
pub mod export;
pub mod k8s;
pub mod server;
