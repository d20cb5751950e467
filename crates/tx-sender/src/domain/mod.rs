//! Domain module for the transaction sender
//!
//! Pure types: identities and transactions, the lifecycle status stream,
//! typed event records, dispatch outcomes and the error taxonomy.

pub mod entities;
pub mod errors;
pub mod outcome;
pub mod records;
pub mod status;

pub use entities::*;
pub use errors::*;
pub use outcome::*;
pub use records::*;
pub use status::*;
