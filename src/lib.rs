//! AI orchestration core for the ATS Optimizer resume toolkit
//!
//! Turns an uploaded resume and a job description into a schema-validated
//! analysis, recruiter outreach copy, and a stateful interview-coaching
//! conversation, each governed by a user-editable bot configuration.

pub mod ai;
pub mod app;
pub mod chat;
pub mod compose;
pub mod document;
pub mod error;
pub mod models;
pub mod prompts;
pub mod schema;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};
