//! Wire-level types for the Ecobank Corporate API.
//!
//! This crate holds the protocol pieces that have no HTTP dependency:
//!
//! - [`envelope`] — the uniform outer JSON wrapper distinguishing protocol
//!   metadata (status, message, timestamp, errors) from the actual payload;
//! - [`timestamp`] — the loosely-formatted timestamps and compact dates the
//!   API sends and expects;
//! - [`errors`] — the ordered multi-message error list the envelope can
//!   carry instead of a payload.
//!
//! The HTTP client that drives these lives in the `ecobank-rs` crate.

pub mod envelope;
pub mod errors;
pub mod timestamp;

pub use envelope::{Envelope, EnvelopeError, ResponseMeta};
pub use errors::ResponseErrors;
pub use timestamp::{Date, Timestamp, TimestampParseError, register_timestamp_layout};
