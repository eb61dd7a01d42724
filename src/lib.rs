//! Scripted Sales Lead Agent Library
//!
//! This library provides the core of a scripted sales chatbot: a per-lead
//! conversation state machine (consent → age → country → interest), a
//! durable lead store mirrored to a CSV file, and a follow-up scheduler
//! that chases leads who go quiet after giving consent.
//!
//! # Modules
//!
//! - `classifier`: Consent-step response classification.
//! - `config`: Configuration management.
//! - `engine`: Conversation state machine.
//! - `errors`: Error handling types.
//! - `lead_store`: Lead map and CSV persistence.
//! - `models`: Core data models.
//! - `scheduler`: Follow-up reminder scheduling.

pub mod classifier;
pub mod config;
pub mod engine;
pub mod errors;
pub mod lead_store;
pub mod models;
pub mod scheduler;
