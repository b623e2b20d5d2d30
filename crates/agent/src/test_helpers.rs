//! Shared fixtures for strategy and agent tests.

use std::sync::Mutex;

use async_trait::async_trait;
use dcl_core::{AdapterError, Entity, GenerationAdapter, Instruction, InvocationContext, Module, ResourceRef};
use dcl_registry::ModuleRegistry;

/// Registry with one operator, one modifier and one raw resource.
pub fn sample_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    let _ = registry.register(Module::new("write", "1.0", "OPERATOR", "Write a text."));
    let _ = registry.register(Module::new("lens1", "1.0", "MODIFIER", "Be polite."));
    let _ = registry.register(Module::new("source1", "1.0", "RESOURCE", "Data 1."));
    let _ = registry.register(Module::new("goal1", "1.0", "GOAL", "Stay under 100 words."));
    let _ = registry.register_alias("WRITE", "write");
    registry
}

/// `write Email USING lens1 FROM source1`, built by hand with empty original text.
pub fn sample_instruction() -> Instruction {
    let mut instruction = Instruction::new("write", Entity::any("Email"));
    instruction.modifiers = vec![ResourceRef::new("lens1")];
    instruction.sources = vec![ResourceRef::new("source1")];
    instruction
}

/// Adapter that returns a scripted response and records every context it sees.
pub struct RecordingAdapter {
    response: String,
    contexts: Mutex<Vec<InvocationContext>>,
}

impl RecordingAdapter {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_context(&self) -> Option<InvocationContext> {
        self.contexts.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationAdapter for RecordingAdapter {
    fn name(&self) -> &str {
        "recording"
    }

    async fn invoke(&self, context: &InvocationContext) -> Result<String, AdapterError> {
        self.contexts.lock().unwrap().push(context.clone());
        Ok(self.response.clone())
    }
}
