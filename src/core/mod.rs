//! Configuration and domain models shared by the API and reconciler Lambdas.

pub mod config;
pub mod models;
pub mod secrets;
