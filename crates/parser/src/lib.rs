//! Instruction language parser.
//!
//! Turns instruction text into a structured [`Instruction`]:
//!
//! ```text
//! <action> <operand> [FROM <resources>] [USING <resources>] [OPTIMIZING_FOR <resources>]
//! ```
//!
//! # Example
//!
//! ```text
//! WRITE 'Code' FROM Spec('s1') USING Lens('l1'), Lens('l2') OPTIMIZING_FOR Goal('g1')
//! sys/ops/write 'Target' FROM sys/res/spec
//! ```
//!
//! Parsing runs in two stages: [`lexer`] + [`grammar`] build a parse tree,
//! [`transform`] turns the tree into an [`Instruction`]. Any input that does
//! not match the grammar yields a [`SyntaxError`] and no partial result.

pub mod grammar;
pub mod lexer;
pub mod transform;

use dcl_core::{Instruction, SyntaxError};
use tracing::trace;

pub use grammar::InstructionTree;

/// Parse instruction text into a parse tree without transforming it.
pub fn parse_tree(text: &str) -> Result<InstructionTree, SyntaxError> {
    let tokens = lexer::tokenize(text)?;
    grammar::parse_tokens(&tokens)
}

/// Parse instruction text into an [`Instruction`].
pub fn parse_instruction(text: &str) -> Result<Instruction, SyntaxError> {
    let tree = parse_tree(text)?;
    let instruction = transform::transform(tree, text);
    trace!(
        action = %instruction.action,
        sources = instruction.sources.len(),
        modifiers = instruction.modifiers.len(),
        goals = instruction.goals.len(),
        "Parsed instruction"
    );
    Ok(instruction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcl_core::{Entity, ResourceRef};

    #[test]
    fn parse_simple_action() {
        let instr = parse_instruction("WRITE 'System Architecture'").unwrap();
        assert_eq!(instr.action, "WRITE");
        assert_eq!(instr.operand.value, "System Architecture");
        assert_eq!(instr.operand.entity_type, "ANY");
        assert!(instr.sources.is_empty());
    }

    #[test]
    fn parse_typed_operand() {
        let instr = parse_instruction("WRITE PromptModule('sys/goals/g1')").unwrap();
        assert_eq!(instr.action, "WRITE");
        assert_eq!(instr.operand.entity_type, "PromptModule");
        assert_eq!(instr.operand.value, "sys/goals/g1");
    }

    #[test]
    fn parse_quoted_topic() {
        let instr = parse_instruction("WRITE 'Topic'").unwrap();
        assert_eq!(instr.operand, Entity::any("Topic"));
    }

    #[test]
    fn parse_bare_operand_and_typed_bare_argument() {
        let instr = parse_instruction("WRITE Topic").unwrap();
        assert_eq!(instr.operand, Entity::any("Topic"));

        let instr = parse_instruction("WRITE PromptModule(sys/goals/g1)").unwrap();
        assert_eq!(instr.operand, Entity::typed("PromptModule", "sys/goals/g1"));
    }

    #[test]
    fn parse_full_instruction() {
        let text = "WRITE 'Code' FROM Spec('s1') USING Lens('l1'), Lens('l2') OPTIMIZING_FOR Goal('g1')";
        let instr = parse_instruction(text).unwrap();

        assert_eq!(instr.action, "WRITE");
        assert_eq!(instr.operand, Entity::any("Code"));

        assert_eq!(instr.sources, vec![ResourceRef::typed("Spec", "s1")]);
        assert_eq!(
            instr.modifiers,
            vec![ResourceRef::typed("Lens", "l1"), ResourceRef::typed("Lens", "l2")]
        );
        assert_eq!(instr.goals.len(), 1);
        assert_eq!(instr.goals[0].id, "g1");
        assert_eq!(instr.original_text, text);
    }

    #[test]
    fn parse_namespace_id() {
        let instr = parse_instruction("sys/ops/write 'Target' FROM sys/res/spec").unwrap();
        assert_eq!(instr.action, "sys/ops/write");
        assert_eq!(instr.sources[0].id, "sys/res/spec");
        assert_eq!(instr.sources[0].resource_type, None);
    }

    #[test]
    fn parse_versioned_modifier() {
        let instr = parse_instruction("write/1.0 'Topic' USING lens/1.0").unwrap();
        assert_eq!(instr.action, "write/1.0");
        assert_eq!(instr.modifiers, vec![ResourceRef::new("lens/1.0")]);
    }

    #[test]
    fn parse_quoted_resources() {
        let instr = parse_instruction(r#"WRITE x FROM 'a b', "c""#).unwrap();
        assert_eq!(instr.sources, vec![ResourceRef::new("a b"), ResourceRef::new("c")]);
    }

    #[test]
    fn original_text_is_verbatim() {
        let text = "  WRITE   'Topic'  ";
        let instr = parse_instruction(text).unwrap();
        assert_eq!(instr.original_text, text);
    }

    #[test]
    fn invalid_syntax() {
        let err = parse_instruction("INVALID SYNTAX HERE").unwrap_err();
        assert_eq!(err.position, 15);
        assert!(err.to_string().contains("HERE"));
    }

    #[test]
    fn empty_input_rejected() {
        let err = parse_instruction("   ").unwrap_err();
        assert_eq!(err.position, 3);
        assert_eq!(err.expected, "operator identifier");
    }

    #[test]
    fn instruction_serializes() {
        let instr = parse_instruction("WRITE Doc('x') USING Lens('l')").unwrap();
        let json = serde_json::to_value(&instr).unwrap();
        assert_eq!(json["operand"]["type"], "Doc");
        assert_eq!(json["modifiers"][0]["type"], "Lens");
    }
}
