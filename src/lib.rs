//! MoA Chat - Mixture-of-Agents chat service
//!
//! Keeps topic-labelled conversation threads and extends them one turn at a
//! time by streaming a reply from an OpenAI-compatible completion service.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
