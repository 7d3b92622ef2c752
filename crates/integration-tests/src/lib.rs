//! Integration tests for Vistapro.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and apply migrations
//! cargo run -p vistapro-cli -- migrate
//!
//! # Start the server
//! cargo run -p vistapro-server
//!
//! # Run the ignored integration tests
//! cargo test -p vistapro-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `VISTAPRO_BASE_URL` - server under test (default: <http://localhost:8080>)
//! - `VISTAPRO_DATABASE_URL` / `DATABASE_URL` - database the tests seed into
//!
//! # Test Categories
//!
//! - `reports` - Scoped totals and per-order report endpoints
//! - `assignments` - Reassignment endpoints and their effect on resolution
