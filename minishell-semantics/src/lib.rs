//! Expansion, heredoc collection, planning, and execution: everything that
//! turns a parsed [`minishell_syntax::Pipeline`] into a recorded exit
//! status, mirroring the module split between `yash_semantics` and
//! `yash_env` but collapsed into one crate since this shell has no async
//! executor to keep separate from its environment model.

pub mod error;
pub mod exec;
pub mod expand;
pub mod heredoc;
pub mod plan;
pub mod signal;

pub use error::{RedirError, ResolutionError, ShellError, SystemError};
pub use exec::execute;
pub use expand::{expand_argv_word, expand_line_no_split};
pub use heredoc::{collect_heredocs, Aborted};
pub use plan::{build_exec_pipeline, ExecCommand, ExecPipeline, ExecRedir};
pub use signal::Context as SignalContext;
