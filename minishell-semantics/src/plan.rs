//! Builds the fully-expanded, execution-ready form of a pipeline.
//!
//! This runs the expander (§4.3) over every argv word and every
//! non-heredoc redirection target. It must be called on a pipeline whose
//! heredoc bodies have already been collected (`crate::heredoc`) — the
//! heredoc collector needs the original, unexpanded delimiter token, so
//! it always runs first; concretely this module just carries forward
//! whatever `heredoc_body` collection already filled in.

use crate::expand::expand_argv_word;
use minishell_env::Env;
use minishell_syntax::{self as syntax, RedirOp};

/// One redirection, expanded and ready to apply.
#[derive(Clone, Debug)]
pub struct ExecRedir {
    pub op: RedirOp,
    /// The expanded file path for `In`/`Out`/`Append`; unused for `Heredoc`.
    pub target: String,
    /// The collected body for `Heredoc`; unused otherwise.
    pub heredoc_body: String,
}

/// One pipeline stage, expanded and ready to execute.
#[derive(Clone, Debug, Default)]
pub struct ExecCommand {
    pub argv: Vec<String>,
    pub redirs: Vec<ExecRedir>,
}

/// A pipeline, expanded and ready to execute.
#[derive(Clone, Debug, Default)]
pub struct ExecPipeline {
    pub stages: Vec<ExecCommand>,
}

impl ExecPipeline {
    pub fn len(&self) -> usize {
        self.stages.len()
    }
}

/// Expands every argv word and non-heredoc redirection target in
/// `pipeline` against `env`.
///
/// A redirection target that expands to zero words (e.g. an unquoted
/// unset variable) becomes the empty-string path, which will fail to
/// open exactly the way a real shell's `> $UNSET` does. A target that
/// expands to more than one word takes only the first — the shell has no
/// concept of "ambiguous redirect" to fall back on (a documented
/// simplification, see DESIGN.md).
pub fn build_exec_pipeline(pipeline: &syntax::Pipeline, env: &Env) -> ExecPipeline {
    let stages = pipeline
        .commands
        .iter()
        .map(|command| ExecCommand {
            argv: command
                .argv
                .iter()
                .flat_map(|token| expand_argv_word(token, env))
                .collect(),
            redirs: command
                .redirs
                .iter()
                .map(|redir| match redir.op {
                    RedirOp::Heredoc => ExecRedir {
                        op: redir.op,
                        target: String::new(),
                        heredoc_body: redir.heredoc_body.clone().unwrap_or_default(),
                    },
                    _ => ExecRedir {
                        op: redir.op,
                        target: expand_argv_word(&redir.target, env)
                            .into_iter()
                            .next()
                            .unwrap_or_default(),
                        heredoc_body: String::new(),
                    },
                })
                .collect(),
        })
        .collect();
    ExecPipeline { stages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minishell_syntax::{lex_line, parse};

    fn plan(line: &str, env: &Env) -> ExecPipeline {
        let tokens = lex_line(line).unwrap();
        let pipeline = parse(tokens).unwrap().unwrap();
        build_exec_pipeline(&pipeline, env)
    }

    #[test]
    fn expands_argv_and_redir_targets() {
        let mut env = Env::from_host_env("minishell");
        env.set("F", "out.txt");
        let plan = plan("echo hi > $F", &env);
        assert_eq!(plan.stages[0].argv, vec!["echo", "hi"]);
        assert_eq!(plan.stages[0].redirs[0].target, "out.txt");
    }

    #[test]
    fn carries_forward_collected_heredoc_body() {
        let env = Env::from_host_env("minishell");
        let tokens = lex_line("cat << EOF").unwrap();
        let mut pipeline = parse(tokens).unwrap().unwrap();
        pipeline.commands[0].redirs[0].heredoc_body = Some("hi\n".to_string());
        let plan = build_exec_pipeline(&pipeline, &env);
        assert_eq!(plan.stages[0].redirs[0].heredoc_body, "hi\n");
    }
}
