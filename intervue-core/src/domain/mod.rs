//! Core domain types
//!
//! This module contains the core domain structures used across Intervue services.
//! These types are shared between the orchestrator (persists and executes) and the
//! client/CLI (display).

pub mod analysis;
pub mod flow;
pub mod interview;
pub mod monitoring;
pub mod report;
pub mod run;
pub mod step;
pub mod transcript;
