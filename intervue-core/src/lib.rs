//! Intervue Core
//!
//! Core types and algorithms for the Intervue interview analysis system.
//!
//! This crate contains:
//! - Domain types: Core business entities (Interview, Step, Transcript, reports)
//! - DTOs: Data transfer objects for the orchestrator API
//! - Flow: Local conversation flow graph analysis
//! - Extract: Tolerant parsing of structured model output

pub mod domain;
pub mod dto;
pub mod extract;
pub mod flow;
