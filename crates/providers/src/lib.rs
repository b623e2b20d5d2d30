//! Generation adapter implementations.
//!
//! All adapters implement the `dcl_core::GenerationAdapter` trait.
//! The router builds the configured adapter.

pub mod mock;
pub mod openai_compat;
pub mod router;

pub use mock::MockAdapter;
pub use openai_compat::OpenAiCompatAdapter;
pub use router::build_from_config;
