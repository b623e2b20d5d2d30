//! # DCL Core
//!
//! Domain types, traits, and error definitions for the DCL instruction resolver.
//! This crate has **no framework dependencies**; it defines the domain model
//! that the parser, registry, assembly, and provider crates implement against.
//!
//! ## Pipeline
//!
//! ```text
//! bundles ──▶ BundleLoader ──▶ ModuleRegistry (validated, frozen)
//!                                      │
//! text ──▶ parser ──▶ Instruction ──▶ AssemblyStrategy ──▶ InvocationContext ──▶ GenerationAdapter
//! ```

pub mod adapter;
pub mod error;
pub mod model;

// Re-export key types at crate root for ergonomics
pub use adapter::{GenerationAdapter, ToolDefinition};
pub use error::{AdapterError, ConfigurationError, Error, Result, SyntaxError};
pub use model::{
    ContentFrame, Entity, InvocationContext, Instruction, Module, ResourceRef, ANY_TYPE,
    DEFAULT_MODULE_TYPE, DEFAULT_MODULE_VERSION, RESOURCE_TYPE,
};
