//! chirpdb - a minimal append-only store for short attributed messages
//!
//! Each record carries a 32-byte author handle, a creation timestamp, a
//! topic of up to 50 characters, and a content body of up to 280
//! characters, serialized into a fixed-prefix binary layout that byte
//! offset filter predicates can address directly.

pub mod cli;
pub mod identity;
pub mod observability;
pub mod query;
pub mod record;
pub mod store;
pub mod validator;
