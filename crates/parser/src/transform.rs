//! Tree-to-struct transform: [`InstructionTree`] → [`Instruction`].

use dcl_core::{Entity, Instruction, ResourceRef};

use crate::grammar::{ClauseKind, InstructionTree, Literal, OperandNode, ResourceNode};

/// Strip one pair of matching surrounding quotes and resolve backslash escapes.
pub fn unquote(raw: &str) -> String {
    let inner = match raw.chars().next() {
        Some(q @ ('\'' | '"')) if raw.len() >= 2 && raw.ends_with(q) => &raw[1..raw.len() - 1],
        _ => return raw.to_string(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn literal_value(literal: Literal) -> String {
    match literal {
        Literal::Quoted(raw) => unquote(&raw),
        Literal::Bare(word) => word,
    }
}

fn resource_ref(node: ResourceNode) -> ResourceRef {
    let id = literal_value(node.id);
    match node.type_name {
        Some(t) => ResourceRef::typed(t, id),
        None => ResourceRef::new(id),
    }
}

/// Convert a parse tree into an [`Instruction`], keeping `original_text` verbatim.
pub fn transform(tree: InstructionTree, original_text: &str) -> Instruction {
    let operand = match tree.operand {
        OperandNode::Typed {
            type_name,
            argument,
        } => Entity::typed(type_name, literal_value(argument)),
        OperandNode::Plain(literal) => Entity::any(literal_value(literal)),
    };

    let mut instruction = Instruction::new(tree.operator, operand);
    for clause in tree.clauses {
        let refs: Vec<ResourceRef> = clause.resources.into_iter().map(resource_ref).collect();
        match clause.kind {
            ClauseKind::Source => instruction.sources = refs,
            ClauseKind::Modifier => instruction.modifiers = refs,
            ClauseKind::Goal => instruction.goals = refs,
        }
    }
    instruction.original_text = original_text.to_string();
    instruction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_single_and_double() {
        assert_eq!(unquote("'Topic'"), "Topic");
        assert_eq!(unquote("\"Topic\""), "Topic");
        assert_eq!(unquote(r"'it\'s'"), "it's");
    }

    #[test]
    fn unquote_leaves_unbalanced_text() {
        assert_eq!(unquote("Topic"), "Topic");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote("'mixed\""), "'mixed\"");
    }

    #[test]
    fn unquote_empty_literal() {
        assert_eq!(unquote("''"), "");
    }

    #[test]
    fn transform_assigns_clauses() {
        let tree = InstructionTree {
            operator: "WRITE".into(),
            operand: OperandNode::Plain(Literal::Quoted("'Email'".into())),
            clauses: vec![
                crate::grammar::ClauseNode {
                    kind: ClauseKind::Goal,
                    resources: vec![ResourceNode {
                        type_name: Some("Goal".into()),
                        id: Literal::Quoted("'g1'".into()),
                    }],
                },
            ],
        };
        let instr = transform(tree, "WRITE 'Email' OPTIMIZING_FOR Goal('g1')");
        assert_eq!(instr.operand, Entity::any("Email"));
        assert!(instr.sources.is_empty());
        assert_eq!(instr.goals, vec![ResourceRef::typed("Goal", "g1")]);
        assert_eq!(instr.original_text, "WRITE 'Email' OPTIMIZING_FOR Goal('g1')");
    }
}
