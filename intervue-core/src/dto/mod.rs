//! Data Transfer Objects for the orchestrator API
//!
//! Lightweight request and response shapes exchanged between the orchestrator
//! and its clients (CLI, dashboards).

pub mod interview;
