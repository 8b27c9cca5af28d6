//! Admin Console - account administration for a multi-tenant management console.
//!
//! This crate implements two Lambdas:
//! 1. An API Lambda serving the `/admin` endpoints: list accounts, toggle the
//!    admin flag, remove an account with everything it owns, and impersonate a
//!    user ("become" / "revert")
//! 2. A scheduled reconciler Lambda that removes spaces left behind by
//!    removals that failed part way
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - DynamoDB (or an in-memory store) behind the [`store::ResourceStore`] trait
//! - lettre for SMTP notifications
//! - a signed cookie for the per-session impersonation context
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use admin_console::clients::SmtpMailer;
//! use admin_console::core::config::MailConfig;
//! use admin_console::removal::{RemovalOrchestrator, RemovalOutcome};
//! use admin_console::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     admin_console::setup_logging();
//!
//!     let orchestrator =
//!         RemovalOrchestrator::new(Arc::new(MemoryStore::new()), Arc::new(SmtpMailer::new()));
//!
//!     match orchestrator
//!         .remove("user-id", &MailConfig::default(), "console.example.com")
//!         .await
//!     {
//!         RemovalOutcome::Success => println!("Removed and notified"),
//!         RemovalOutcome::SucceededWithWarning(w) => println!("{}", w.message()),
//!         RemovalOutcome::Failed(f) => println!("Failed at {}: {}", f.stage.as_str(), f.error),
//!     }
//! }
//! ```

pub mod api;
pub mod clients;
pub mod core;
pub mod errors;
pub mod reconcile;
pub mod removal;
pub mod state;
pub mod store;

pub use errors::AdminError;
pub use state::AppState;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`). It
/// should be called once at the start of each Lambda binary. Calling it again
/// is a no-op.
///
/// # Example
///
/// ```
/// admin_console::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
