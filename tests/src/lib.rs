//! # Transaction Sender Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (lock registry, submit path)
//! └── src/
//!     ├── harness.rs    # Shared fixtures: node double, keyring, sender builder
//!     └── integration/  # End-to-end flows against SimulatedNode
//!         ├── nonce_ordering.rs
//!         ├── outcomes.rs
//!         └── lifecycle.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tx-tests
//!
//! # By category
//! cargo test -p tx-tests integration::nonce_ordering::
//! cargo test -p tx-tests integration::lifecycle::
//!
//! # Benchmarks
//! cargo bench -p tx-tests
//! ```

pub mod harness;
pub mod integration;
