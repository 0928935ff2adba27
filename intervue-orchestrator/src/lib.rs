//! Intervue Orchestrator
//!
//! HTTP service that registers interviews and runs the analysis pipeline
//! over them.

pub mod api;
pub mod config;
pub mod db;
pub mod gateway;
pub mod repository;
pub mod service;
