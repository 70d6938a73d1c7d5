//! Data Transfer Objects
//!
//! Request shapes received over HTTP. Kept apart from the domain types so
//! the wire field names (camelCase, legacy spellings) stay at the edge.

pub mod webhook;
