//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors)
//! - `conversation` - Conversation aggregate, messages and history codec
//! - `generation` - Sampling parameters, instruction composition, reply accumulation

pub mod conversation;
pub mod foundation;
pub mod generation;
