//! Core domain types
//!
//! This module contains the structures shared between the parsing,
//! rendering and delivery stages. `report` holds what the parser extracts
//! from the raw text; `notification` holds what is sent to the sink.

pub mod notification;
pub mod report;
