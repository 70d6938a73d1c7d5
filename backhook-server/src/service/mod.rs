//! Service Module
//!
//! Business logic layer for the server.
//! Services sit between the HTTP handlers and the archive/sink collaborators.

pub mod archive;
pub mod notify;
pub mod retention;

// Re-export for convenience
pub use archive::{FsLogStore, LogStore};
pub use notify::NotifyService;
