//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber` formatter for the whole
//! process. `RUST_LOG` wins when set; otherwise the configured default filter applies.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: each collection and counter actor logs start and stop
//! - **Store requests**: one `debug` line per request with the `collection` field
//! - **Mutations**: `info` on create, update and delete with the business id
//! - **Rejections**: `warn` on conflicts, failed version checks and store failures
//!
//! Service methods open a span per call, so nested lines read like
//! `create{kind="products"}: Created business_id=1`.
//!
//! ```bash
//! RUST_LOG=debug cargo run
//! RUST_LOG=catalog_store::docstore=debug cargo run
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // `collection` / `kind` fields say where a line comes from
        .compact()
        .init();
}
