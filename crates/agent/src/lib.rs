//! Instruction resolution and the DCL agent.
//!
//! The agent follows a **Parse → Assemble → Invoke** cycle:
//!
//! 1. **Parse** the instruction text into an `Instruction`
//! 2. **Assemble** it against the validated registry with the selected
//!    [`AssemblyStrategy`]
//! 3. **Invoke** the generation adapter with the resulting context
//!
//! Loading and validation happen once, when the agent is built.

pub mod runner;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use runner::DclAgent;
pub use strategy::{AssemblyStrategy, EXEMPLAR, UnknownStrategy, format_module};
