//! Backhook Core
//!
//! Core types and report processing for the Backhook notification relay.
//!
//! This crate contains:
//! - Domain types: parsed backup reports and outbound notification documents
//! - DTOs: the inbound webhook request shape
//! - Parser: turns a semi-structured backup report into a `ParsedReport`
//! - Renderer: turns a `ParsedReport` into size-bounded embeds
//!
//! Nothing in here performs I/O, so every stage can be exercised directly.

pub mod domain;
pub mod dto;
pub mod parser;
pub mod render;

pub use parser::{ReportParser, SplitPolicy};
pub use render::{Limits, RenderContext, RenderProfile, Renderer};
