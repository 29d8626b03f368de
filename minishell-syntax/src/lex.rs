//! Converts a raw input line into a flat [`Token`] stream.
//!
//! The lexer never looks at variable values; it only records quoting so the
//! expander (in `minishell-semantics`) knows, per fragment, whether `$` is
//! meaningful and whether the result may be word-split.

use crate::token::{Fragment, Quoting, Token, TokenKind};
use thiserror::Error;

/// A lexical error, always an unterminated quote (the only way this
/// lexer's grammar can fail — unlike `yash_syntax`'s lexer, there is no
/// backslash-escape or parameter-expansion-brace grammar to mis-nest).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum LexError {
    #[error("unterminated single quote")]
    UnterminatedSingleQuote,
    #[error("unterminated double quote")]
    UnterminatedDoubleQuote,
}

/// Lexes `line` into a token stream, or reports the first unterminated
/// quote encountered.
pub fn lex(line: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    let mut tokens = Vec::new();

    while i < chars.len() {
        match chars[i] {
            ' ' | '\t' => {
                i += 1;
            }
            '|' => {
                tokens.push(Token::operator(TokenKind::Pipe));
                i += 1;
            }
            '<' if chars.get(i + 1) == Some(&'<') => {
                tokens.push(Token::operator(TokenKind::DLt));
                i += 2;
            }
            '<' => {
                tokens.push(Token::operator(TokenKind::Lt));
                i += 1;
            }
            '>' if chars.get(i + 1) == Some(&'>') => {
                tokens.push(Token::operator(TokenKind::DGt));
                i += 2;
            }
            '>' => {
                tokens.push(Token::operator(TokenKind::Gt));
                i += 1;
            }
            _ => {
                let (word, next) = lex_word(&chars, i)?;
                tokens.push(word);
                i = next;
            }
        }
    }

    Ok(tokens)
}

/// Lexes one WORD token starting at `start`, which must not be whitespace
/// or an operator character. Returns the token and the index just past it.
fn lex_word(chars: &[char], start: usize) -> Result<(Token, usize), LexError> {
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut current = String::new();
    let mut current_quoting = Quoting::None;
    let mut i = start;

    macro_rules! flush {
        () => {
            if !current.is_empty() {
                fragments.push(Fragment {
                    text: std::mem::take(&mut current),
                    quoting: current_quoting,
                });
            }
        };
    }

    // Unlike `flush!`, always emits a fragment for the quoted run just
    // closed, even an empty one (`""` must still expand, quoted, to an
    // empty-string argv entry rather than disappear entirely).
    macro_rules! flush_quoted {
        () => {
            fragments.push(Fragment {
                text: std::mem::take(&mut current),
                quoting: current_quoting,
            });
        };
    }

    while i < chars.len() {
        match chars[i] {
            ' ' | '\t' | '|' | '<' | '>' => break,
            '\'' => {
                flush!();
                current_quoting = Quoting::Single;
                i += 1;
                let run_start = i;
                while i < chars.len() && chars[i] != '\'' {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(LexError::UnterminatedSingleQuote);
                }
                current.push_str(&chars[run_start..i].iter().collect::<String>());
                flush_quoted!();
                current_quoting = Quoting::None;
                i += 1; // closing quote
            }
            '"' => {
                flush!();
                current_quoting = Quoting::Double;
                i += 1;
                let run_start = i;
                while i < chars.len() && chars[i] != '"' {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(LexError::UnterminatedDoubleQuote);
                }
                current.push_str(&chars[run_start..i].iter().collect::<String>());
                flush_quoted!();
                current_quoting = Quoting::None;
                i += 1; // closing quote
            }
            c => {
                current.push(c);
                i += 1;
            }
        }
    }
    flush!();

    Ok((Token::word(fragments), i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokens: &[Token]) -> Vec<String> {
        tokens.iter().map(Token::raw_text).collect()
    }

    #[test]
    fn simple_words() {
        let tokens = lex("echo hello world").unwrap();
        assert_eq!(words(&tokens), vec!["echo", "hello", "world"]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Word));
    }

    #[test]
    fn operators() {
        let tokens = lex("a|b<c>d>>e<<f").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::Pipe,
                TokenKind::Word,
                TokenKind::Lt,
                TokenKind::Word,
                TokenKind::Gt,
                TokenKind::Word,
                TokenKind::DGt,
                TokenKind::Word,
                TokenKind::DLt,
                TokenKind::Word,
            ]
        );
    }

    #[test]
    fn single_quote_is_literal() {
        let tokens = lex("'$X a b'").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].raw_text(), "$X a b");
        assert!(tokens[0]
            .fragments
            .iter()
            .all(|f| f.quoting == Quoting::Single));
    }

    #[test]
    fn double_quote_keeps_dollar_meaning_flag() {
        let tokens = lex("\"$X\"").unwrap();
        assert_eq!(tokens[0].raw_text(), "$X");
        assert_eq!(tokens[0].fragments[0].quoting, Quoting::Double);
    }

    #[test]
    fn mixed_quoting_concatenates_into_one_word() {
        let tokens = lex("a\"b\"'c'$D").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].raw_text(), "abc$D");
    }

    #[test]
    fn unterminated_single_quote_errors() {
        assert_eq!(lex("'abc"), Err(LexError::UnterminatedSingleQuote));
    }

    #[test]
    fn unterminated_double_quote_errors() {
        assert_eq!(lex("\"abc"), Err(LexError::UnterminatedDoubleQuote));
    }

    #[test]
    fn whitespace_separates_and_is_discarded() {
        let tokens = lex("  a   b  ").unwrap();
        assert_eq!(words(&tokens), vec!["a", "b"]);
    }
}
