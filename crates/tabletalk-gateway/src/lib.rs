//! Multi-provider LLM gateway for CSV question answering.
//!
//! Takes a `(csv bytes, file name, question)` triple, picks one configured
//! provider from a fixed-priority catalog, builds the provider-specific
//! request, executes it with a bounded timeout, and normalizes the
//! heterogeneous provider responses and errors into one uniform shape.
//! Nothing outlives the call that produced it.

mod anthropic;
mod builder;
mod catalog;
mod config;
mod error_map;
mod gateway;
mod gemini;
mod normalize;
mod openai;
mod transport;
mod types;

pub use builder::build;
pub use catalog::*;
pub use config::*;
pub use error_map::map_error;
pub use gateway::*;
pub use normalize::normalize;
pub use transport::*;
pub use types::*;
