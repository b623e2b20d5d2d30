//! Tokenizer for the instruction language.
//!
//! Every token carries the byte offset where it starts so syntax errors can
//! point at the offending input. The token stream always ends with
//! [`TokenKind::End`].

use dcl_core::SyntaxError;

/// Token types for the instruction language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare identifier: operator ids, type names, bare values, `sys/ops/write`, `lens/1.0`.
    Word(String),
    /// Quoted literal, raw text including its surrounding quotes.
    Quoted(String),
    LParen,
    RParen,
    Comma,
    From,
    Using,
    OptimizingFor,
    End,
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    /// Description used in syntax errors.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Word(w) => format!("identifier '{w}'"),
            TokenKind::Quoted(raw) => format!("string {raw}"),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::From => "keyword 'FROM'".into(),
            TokenKind::Using => "keyword 'USING'".into(),
            TokenKind::OptimizingFor => "keyword 'OPTIMIZING_FOR'".into(),
            TokenKind::End => "end of input".into(),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '/' | '.' | ':' | '@')
}

/// Split instruction text into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            _ if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::LParen, position: pos });
            }
            ')' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::RParen, position: pos });
            }
            ',' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::Comma, position: pos });
            }
            '"' | '\'' => {
                let quote = c;
                chars.next();
                let mut end = None;
                while let Some((i, ch)) = chars.next() {
                    match ch {
                        '\\' => {
                            chars.next();
                        }
                        _ if ch == quote => {
                            end = Some(i + ch.len_utf8());
                            break;
                        }
                        _ => {}
                    }
                }
                let Some(end) = end else {
                    return Err(SyntaxError::new(
                        pos,
                        "unterminated string literal",
                        format!("closing {quote}"),
                    ));
                };
                tokens.push(Token {
                    kind: TokenKind::Quoted(input[pos..end].to_string()),
                    position: pos,
                });
            }
            _ if is_word_char(c) => {
                let mut end = pos;
                while let Some(&(i, wc)) = chars.peek() {
                    if !is_word_char(wc) {
                        break;
                    }
                    end = i + wc.len_utf8();
                    chars.next();
                }
                let kind = match &input[pos..end] {
                    "FROM" => TokenKind::From,
                    "USING" => TokenKind::Using,
                    "OPTIMIZING_FOR" => TokenKind::OptimizingFor,
                    word => TokenKind::Word(word.to_string()),
                };
                tokens.push(Token { kind, position: pos });
            }
            _ => {
                return Err(SyntaxError::new(
                    pos,
                    format!("character '{c}'"),
                    "identifier, quoted string, '(', ')' or ','",
                ));
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::End,
        position: input.len(),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn namespaced_identifiers_are_single_words() {
        assert_eq!(
            kinds("sys/ops/write lens/1.0"),
            vec![
                TokenKind::Word("sys/ops/write".into()),
                TokenKind::Word("lens/1.0".into()),
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            kinds("FROM from USING OPTIMIZING_FOR"),
            vec![
                TokenKind::From,
                TokenKind::Word("from".into()),
                TokenKind::Using,
                TokenKind::OptimizingFor,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn quoted_literal_keeps_raw_text() {
        let tokens = tokenize(r#"WRITE 'it\'s' "two words""#).unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Quoted(r"'it\'s'".into()));
        assert_eq!(tokens[2].kind, TokenKind::Quoted("\"two words\"".into()));
        assert_eq!(tokens[2].position, 14);
    }

    #[test]
    fn positions_are_byte_offsets() {
        let tokens = tokenize("A(b), c").unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 6, 7]);
    }

    #[test]
    fn unterminated_string_rejected() {
        let err = tokenize("WRITE 'oops").unwrap_err();
        assert_eq!(err.position, 6);
        assert!(err.found.contains("unterminated"));
    }

    #[test]
    fn unexpected_character_rejected() {
        let err = tokenize("WRITE Topic; DROP").unwrap_err();
        assert_eq!(err.position, 11);
        assert!(err.found.contains(';'));
    }
}
