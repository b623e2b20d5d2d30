//! Structured: one text frame per resolved unit.
//!
//! Frame order: original text, exemplar, operator, operand, modifiers,
//! goals, sources. Unresolved references produce no frame at all.

use dcl_core::{ContentFrame, Instruction, InvocationContext, ResourceRef};
use dcl_registry::ModuleRegistry;
use tracing::debug;

use super::{EXEMPLAR, format_module};

pub(super) fn assemble(instruction: &Instruction, registry: &ModuleRegistry) -> InvocationContext {
    let mut frames = vec![
        ContentFrame::text(instruction.original_text.as_str()),
        ContentFrame::text(EXEMPLAR),
    ];

    match registry.get(&instruction.action) {
        Some(module) => frames.push(ContentFrame::text(format_module(module))),
        None => debug!(operator = %instruction.action, "Omitting unresolved operator"),
    }

    frames.push(ContentFrame::text(instruction.operand.render()));

    push_resolved(&mut frames, registry, &instruction.modifiers);
    push_resolved(&mut frames, registry, &instruction.goals);
    push_resolved(&mut frames, registry, &instruction.sources);

    InvocationContext::new(frames)
}

fn push_resolved(frames: &mut Vec<ContentFrame>, registry: &ModuleRegistry, refs: &[ResourceRef]) {
    for reference in refs {
        match registry.get(&reference.id) {
            Some(module) => frames.push(ContentFrame::text(format_module(module))),
            None => debug!(id = %reference.id, "Omitting unresolved reference"),
        }
    }
}
