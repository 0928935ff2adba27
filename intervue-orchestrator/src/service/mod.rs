//! Service Module
//!
//! Business logic layer for the orchestrator.
//! Services sit between the API and the store and contain domain logic.

pub mod interview;
pub mod pipeline;

// Re-export for convenience
pub use interview as interview_service;
