//! Startup configuration: prompt strings and history file path, resolved
//! once from the host environment before the read-eval loop starts,
//! mirroring the way `yash_cli::startup` assembles shell options ahead of
//! the main loop.

use std::path::PathBuf;

const DEFAULT_PRIMARY_PROMPT: &str = "minishell$> ";
const DEFAULT_SECONDARY_PROMPT: &str = "> ";
const DEFAULT_HISTORY_FILE_NAME: &str = ".minishell_history";

/// Prompt strings and history file path, resolved once at startup and
/// threaded immutably through the REPL loop. Unlike `Env`, nothing in the
/// shell mutates this after startup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub primary_prompt: String,
    pub secondary_prompt: String,
    pub history_file: Option<PathBuf>,
}

impl Config {
    /// Resolves `PS1`/`PS2`/`HISTFILE` from the process environment,
    /// falling back to the built-in defaults. `HISTFILE` falls back to
    /// `$HOME/.minishell_history`, or `None` if `HOME` is unset too.
    pub fn from_env() -> Self {
        let primary_prompt =
            std::env::var("PS1").unwrap_or_else(|_| DEFAULT_PRIMARY_PROMPT.to_string());
        let secondary_prompt =
            std::env::var("PS2").unwrap_or_else(|_| DEFAULT_SECONDARY_PROMPT.to_string());
        let history_file = std::env::var("HISTFILE").map(PathBuf::from).ok().or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(DEFAULT_HISTORY_FILE_NAME))
        });

        Config {
            primary_prompt,
            secondary_prompt,
            history_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        std::env::remove_var("PS1");
        std::env::remove_var("PS2");
        std::env::remove_var("HISTFILE");
        std::env::set_var("HOME", "/home/nobody");
        let config = Config::from_env();
        assert_eq!(config.primary_prompt, DEFAULT_PRIMARY_PROMPT);
        assert_eq!(config.secondary_prompt, DEFAULT_SECONDARY_PROMPT);
        assert_eq!(
            config.history_file,
            Some(PathBuf::from("/home/nobody/.minishell_history"))
        );
    }

    #[test]
    fn overrides_take_precedence() {
        std::env::set_var("PS1", "my$ ");
        std::env::set_var("PS2", "more> ");
        std::env::set_var("HISTFILE", "/tmp/hist");
        let config = Config::from_env();
        assert_eq!(config.primary_prompt, "my$ ");
        assert_eq!(config.secondary_prompt, "more> ");
        assert_eq!(config.history_file, Some(PathBuf::from("/tmp/hist")));
        std::env::remove_var("PS1");
        std::env::remove_var("PS2");
        std::env::remove_var("HISTFILE");
    }
}
