//! Validates the token stream's grammar and builds a [`Pipeline`] of
//! [`Command`]s.
//!
//! ```text
//! pipeline := command ( PIPE command )*
//! command  := element+
//! element  := WORD | redir
//! redir    := (LT | GT | DGT) WORD
//!           | DLT WORD              -- heredoc delimiter
//! ```

use crate::ast::{Command, Pipeline, Redir, RedirOp};
use crate::token::{Token, TokenKind};
use thiserror::Error;

/// A parser error, always reported together with exit status 2 (§4.2).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected `|`")]
    UnexpectedPipe,
    #[error("expected a word after redirection operator")]
    MissingRedirTarget,
}

/// Parses a token stream into a [`Pipeline`].
///
/// Returns `Ok(None)` for an empty token stream (§4.2: empty input is not
/// an error, it just produces nothing to execute).
pub fn parse(tokens: Vec<Token>) -> Result<Option<Pipeline>, ParseError> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut commands = vec![Command::default()];
    let mut tokens = tokens.into_iter().peekable();
    let mut expect_command_start = true;

    while let Some(token) = tokens.next() {
        match token.kind {
            TokenKind::Pipe => {
                if expect_command_start {
                    return Err(ParseError::UnexpectedPipe);
                }
                commands.push(Command::default());
                expect_command_start = true;
            }
            TokenKind::Word => {
                commands.last_mut().unwrap().argv.push(token);
                expect_command_start = false;
            }
            TokenKind::Lt | TokenKind::Gt | TokenKind::DGt | TokenKind::DLt => {
                let op = match token.kind {
                    TokenKind::Lt => RedirOp::In,
                    TokenKind::Gt => RedirOp::Out,
                    TokenKind::DGt => RedirOp::Append,
                    TokenKind::DLt => RedirOp::Heredoc,
                    TokenKind::Word | TokenKind::Pipe => unreachable!(),
                };
                let target = match tokens.next() {
                    Some(t) if t.kind == TokenKind::Word => t,
                    _ => return Err(ParseError::MissingRedirTarget),
                };
                commands
                    .last_mut()
                    .unwrap()
                    .redirs
                    .push(Redir::new(op, target));
                expect_command_start = false;
            }
        }
    }

    if expect_command_start {
        // Trailing PIPE: the stream ended right after a `|`.
        return Err(ParseError::UnexpectedPipe);
    }

    Ok(Some(Pipeline { commands }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::lex;
    use assert_matches::assert_matches;

    fn parse_line(line: &str) -> Result<Option<Pipeline>, ParseError> {
        parse(lex(line).unwrap())
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn single_command() {
        let pipeline = parse_line("echo hello").unwrap().unwrap();
        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline.commands[0].argv[0].raw_text(), "echo");
        assert_eq!(pipeline.commands[0].argv[1].raw_text(), "hello");
    }

    #[test]
    fn pipeline_of_three() {
        let pipeline = parse_line("true | true | false").unwrap().unwrap();
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn leading_pipe_is_an_error() {
        assert_matches!(parse_line("| echo hi"), Err(ParseError::UnexpectedPipe));
    }

    #[test]
    fn trailing_pipe_is_an_error() {
        assert_matches!(parse_line("echo hi |"), Err(ParseError::UnexpectedPipe));
    }

    #[test]
    fn adjacent_pipes_are_an_error() {
        assert_matches!(parse_line("echo hi || echo lo"), Err(ParseError::UnexpectedPipe));
    }

    #[test]
    fn redir_without_target_is_an_error() {
        assert_matches!(parse_line("echo a >"), Err(ParseError::MissingRedirTarget));
    }

    #[test]
    fn redirection_only_stage_has_empty_argv() {
        let pipeline = parse_line("> out.txt").unwrap().unwrap();
        assert!(pipeline.commands[0].argv.is_empty());
        assert_eq!(pipeline.commands[0].redirs.len(), 1);
    }

    #[test]
    fn redirection_order_is_preserved() {
        let pipeline = parse_line("cmd < a > b >> c").unwrap().unwrap();
        let ops: Vec<_> = pipeline.commands[0]
            .redirs
            .iter()
            .map(|r| r.op)
            .collect();
        assert_eq!(ops, vec![RedirOp::In, RedirOp::Out, RedirOp::Append]);
    }
}
