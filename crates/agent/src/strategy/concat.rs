//! Concatenation: every part joined into one text frame.
//!
//! Part order:
//!
//! 1. original instruction text
//! 2. exemplar
//! 3. operator (or `<!-- Missing Operator: id -->`)
//! 4. modifiers (or a missing marker each)
//! 5. sources (or a missing marker each)
//! 6. `Target: <operand>`
//! 7. resolved goals as `Goal: <content>`; unresolved goals are dropped

use dcl_core::{ContentFrame, Instruction, InvocationContext, Module};
use dcl_registry::ModuleRegistry;
use tracing::debug;

use super::{EXEMPLAR, format_module};

const PART_SEPARATOR: &str = "\n\n";

pub(super) fn assemble(instruction: &Instruction, registry: &ModuleRegistry) -> InvocationContext {
    let mut parts = vec![instruction.original_text.clone(), EXEMPLAR.to_string()];

    parts.push(section(registry, "Operator", &instruction.action));
    for modifier in &instruction.modifiers {
        parts.push(section(registry, "Modifier", &modifier.id));
    }
    for source in &instruction.sources {
        parts.push(section(registry, "Source", &source.id));
    }

    parts.push(format!("Target: {}", instruction.operand.render()));

    for goal in &instruction.goals {
        match registry.get(&goal.id) {
            Some(module) => parts.push(format!("Goal: {}", module.content)),
            None => debug!(goal = %goal.id, "Skipping unresolved goal"),
        }
    }

    InvocationContext::new(vec![ContentFrame::text(parts.join(PART_SEPARATOR))])
}

/// A resolved module with its header, or a marker naming the missing id.
fn section(registry: &ModuleRegistry, role: &str, id: &str) -> String {
    match registry.get(id) {
        Some(module) => with_header(module),
        None => {
            debug!(role, id, "Reference not found in registry");
            format!("<!-- Missing {role}: {id} -->")
        }
    }
}

fn with_header(module: &Module) -> String {
    format!("--- {}: {} ---\n{}", module.module_type, module.id, format_module(module))
}
