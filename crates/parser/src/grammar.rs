//! Recursive-descent parser producing a parse tree.
//!
//! Grammar (informal):
//! ```text
//! instruction     = operator operand [source_clause] [modifier_clause] [goal_clause]
//! operator        = IDENT
//! operand         = IDENT "(" literal ")" | literal
//! source_clause   = "FROM" resource_list
//! modifier_clause = "USING" resource_list
//! goal_clause     = "OPTIMIZING_FOR" resource_list
//! resource_list   = resource ("," resource)*
//! resource        = IDENT "(" literal ")" | [IDENT] literal
//! literal         = QUOTED_STRING | IDENT
//! ```
//!
//! Clauses appear at most once and in the order above. The parser never
//! backtracks: each production is chosen by at most two tokens of lookahead.

use dcl_core::SyntaxError;

use crate::lexer::{Token, TokenKind};

/// A literal as written: quoted (raw, quotes included) or bare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Quoted(String),
    Bare(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandNode {
    /// `Type(literal)`
    Typed { type_name: String, argument: Literal },
    /// `'value'` or `value`
    Plain(Literal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNode {
    pub type_name: Option<String>,
    pub id: Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClauseKind {
    Source,
    Modifier,
    Goal,
}

impl ClauseKind {
    fn from_token(kind: &TokenKind) -> Option<Self> {
        match kind {
            TokenKind::From => Some(Self::Source),
            TokenKind::Using => Some(Self::Modifier),
            TokenKind::OptimizingFor => Some(Self::Goal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseNode {
    pub kind: ClauseKind,
    pub resources: Vec<ResourceNode>,
}

/// The parse tree for one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionTree {
    pub operator: String,
    pub operand: OperandNode,
    pub clauses: Vec<ClauseNode>,
}

type Parsed<'t, T> = Result<(T, &'t [Token]), SyntaxError>;

fn unexpected(token: &Token, expected: &str) -> SyntaxError {
    SyntaxError::new(token.position, token.describe(), expected)
}

/// Parse a token stream (as produced by [`crate::lexer::tokenize`]) into a tree.
pub fn parse_tokens(tokens: &[Token]) -> Result<InstructionTree, SyntaxError> {
    let (operator, rest) = parse_operator(tokens)?;
    let (operand, rest) = parse_operand(rest)?;
    let (clauses, rest) = parse_clauses(rest)?;
    match rest.first() {
        Some(Token { kind: TokenKind::End, .. }) => Ok(InstructionTree {
            operator,
            operand,
            clauses,
        }),
        Some(token) => Err(unexpected(token, &clause_expectation(clauses.last().map(|c| c.kind)))),
        None => Err(SyntaxError::new(0, "empty token stream", "end of input marker")),
    }
}

fn first(tokens: &[Token]) -> Result<&Token, SyntaxError> {
    tokens
        .first()
        .ok_or_else(|| SyntaxError::new(0, "empty token stream", "end of input marker"))
}

fn parse_operator(tokens: &[Token]) -> Parsed<'_, String> {
    let token = first(tokens)?;
    match &token.kind {
        TokenKind::Word(w) => Ok((w.clone(), &tokens[1..])),
        _ => Err(unexpected(token, "operator identifier")),
    }
}

fn parse_operand(tokens: &[Token]) -> Parsed<'_, OperandNode> {
    let token = first(tokens)?;
    match (&token.kind, tokens.get(1).map(|t| &t.kind)) {
        (TokenKind::Word(type_name), Some(TokenKind::LParen)) => {
            let (argument, rest) = parse_parenthesized(&tokens[1..])?;
            Ok((
                OperandNode::Typed {
                    type_name: type_name.clone(),
                    argument,
                },
                rest,
            ))
        }
        _ => {
            let (literal, rest) = parse_literal(tokens, "operand (quoted string, identifier or Type('value'))")?;
            Ok((OperandNode::Plain(literal), rest))
        }
    }
}

/// `"(" literal ")"`, starting at the opening parenthesis.
fn parse_parenthesized(tokens: &[Token]) -> Parsed<'_, Literal> {
    let open = first(tokens)?;
    if open.kind != TokenKind::LParen {
        return Err(unexpected(open, "'('"));
    }
    let (literal, rest) = parse_literal(&tokens[1..], "quoted string or identifier")?;
    let close = first(rest)?;
    if close.kind != TokenKind::RParen {
        return Err(unexpected(close, "')'"));
    }
    Ok((literal, &rest[1..]))
}

fn parse_literal<'t>(tokens: &'t [Token], expected: &str) -> Parsed<'t, Literal> {
    let token = first(tokens)?;
    match &token.kind {
        TokenKind::Quoted(raw) => Ok((Literal::Quoted(raw.clone()), &tokens[1..])),
        TokenKind::Word(w) => Ok((Literal::Bare(w.clone()), &tokens[1..])),
        _ => Err(unexpected(token, expected)),
    }
}

fn clause_expectation(last: Option<ClauseKind>) -> String {
    let remaining: Vec<&str> = [
        (ClauseKind::Source, "FROM"),
        (ClauseKind::Modifier, "USING"),
        (ClauseKind::Goal, "OPTIMIZING_FOR"),
    ]
    .iter()
    .filter(|(kind, _)| last.is_none_or(|l| *kind > l))
    .map(|(_, kw)| *kw)
    .collect();

    if remaining.is_empty() {
        "end of input".into()
    } else {
        format!("{} or end of input", remaining.join(", "))
    }
}

fn parse_clauses(mut tokens: &[Token]) -> Parsed<'_, Vec<ClauseNode>> {
    let mut clauses: Vec<ClauseNode> = Vec::new();

    while let Some(token) = tokens.first() {
        let Some(kind) = ClauseKind::from_token(&token.kind) else {
            break;
        };
        if let Some(last) = clauses.last() {
            if kind <= last.kind {
                return Err(unexpected(token, &clause_expectation(Some(last.kind))));
            }
        }
        let (resources, rest) = parse_resource_list(&tokens[1..])?;
        clauses.push(ClauseNode { kind, resources });
        tokens = rest;
    }

    Ok((clauses, tokens))
}

fn parse_resource_list(tokens: &[Token]) -> Parsed<'_, Vec<ResourceNode>> {
    let mut resources = Vec::new();
    let (resource, mut rest) = parse_resource(tokens)?;
    resources.push(resource);

    while rest.first().is_some_and(|t| t.kind == TokenKind::Comma) {
        let (resource, remaining) = parse_resource(&rest[1..])?;
        resources.push(resource);
        rest = remaining;
    }

    Ok((resources, rest))
}

fn parse_resource(tokens: &[Token]) -> Parsed<'_, ResourceNode> {
    let token = first(tokens)?;
    let next = tokens.get(1).map(|t| &t.kind);
    match (&token.kind, next) {
        (TokenKind::Word(type_name), Some(TokenKind::LParen)) => {
            let (id, rest) = parse_parenthesized(&tokens[1..])?;
            Ok((
                ResourceNode {
                    type_name: Some(type_name.clone()),
                    id,
                },
                rest,
            ))
        }
        (TokenKind::Word(type_name), Some(TokenKind::Quoted(_) | TokenKind::Word(_))) => {
            let (id, rest) = parse_literal(&tokens[1..], "resource id")?;
            Ok((
                ResourceNode {
                    type_name: Some(type_name.clone()),
                    id,
                },
                rest,
            ))
        }
        _ => {
            let (id, rest) = parse_literal(tokens, "resource (quoted string, identifier or Type('id'))")?;
            Ok((ResourceNode { type_name: None, id }, rest))
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
