//! Generation domain: parameters, instruction composition and reply
//! accumulation for a single completion call.

mod accumulator;
mod instruction;
mod parameters;
mod references;

pub use accumulator::{EmptyResponse, ResponseAccumulator};
pub use instruction::Instruction;
pub use parameters::{GenerationParams, MaxTokens, ModelId, Temperature};
pub use references::aggregator_system_prompt;
