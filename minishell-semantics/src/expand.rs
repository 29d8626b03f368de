//! Variable substitution with quote-sensitive word splitting (§4.3).
//!
//! Runs after parsing, before heredoc collection, over every WORD token of
//! every command: both `argv` entries and the `target` word of non-heredoc
//! redirections. Heredoc delimiters are never passed through here; the
//! heredoc collector (`crate::heredoc`) expands heredoc *bodies* separately,
//! using [`expand_no_split`].

use minishell_env::Env;
use minishell_syntax::{Quoting, Token};

/// Expands one token into the argv entries it produces, applying word
/// splitting to unquoted substitutions.
///
/// A quoted fragment (even an empty one, e.g. `""`) always materializes a
/// word, so a token with any quoting never disappears. A token that is
/// entirely unquoted and expands to nothing (e.g. a lone `$UNSET`) never
/// materializes a word at all and so naturally produces zero entries —
/// no special-casing needed (§4.3).
pub fn expand_argv_word(token: &Token, env: &Env) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current: Option<String> = None;

    for fragment in &token.fragments {
        match fragment.quoting {
            Quoting::Single => {
                current.get_or_insert_with(String::new).push_str(&fragment.text);
            }
            Quoting::Double => {
                let expanded = substitute(&fragment.text, env);
                current.get_or_insert_with(String::new).push_str(&expanded);
            }
            Quoting::None => {
                let expanded = substitute(&fragment.text, env);
                let leading_ws = expanded.starts_with(char::is_whitespace);
                let trailing_ws = expanded.ends_with(char::is_whitespace);
                let fields: Vec<&str> = expanded.split_whitespace().collect();

                if fields.is_empty() {
                    // All whitespace (or truly empty): finalize whatever
                    // word was in progress, but don't start a new one.
                    if let Some(word) = current.take() {
                        entries.push(word);
                    }
                    continue;
                }

                if leading_ws {
                    if let Some(word) = current.take() {
                        entries.push(word);
                    }
                }
                current.get_or_insert_with(String::new).push_str(fields[0]);
                for field in &fields[1..] {
                    entries.push(current.take().unwrap());
                    current = Some((*field).to_string());
                }
                if trailing_ws {
                    entries.push(current.take().unwrap());
                }
            }
        }
    }

    if let Some(word) = current {
        entries.push(word);
    }
    entries
}

/// Expands a token with double-quote rules throughout (no splitting),
/// regardless of the fragments' actual recorded quoting except that
/// `Single`-quoted fragments remain literal. Used for heredoc bodies,
/// which are plain lines of text rather than lexed tokens with genuine
/// quote boundaries (§4.4 item 2).
pub fn expand_line_no_split(line: &str, env: &Env) -> String {
    substitute(line, env)
}

/// Expands `$?`, `$0`, and `$NAME` forms in `text`. A bare `$` not
/// followed by a recognized form is passed through literally, and the
/// following character is rescanned normally (§4.3).
fn substitute(text: &str, env: &Env) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '$' {
            result.push(chars[i]);
            i += 1;
            continue;
        }

        match chars.get(i + 1) {
            Some('?') => {
                result.push_str(&env.last_status.to_string());
                i += 2;
            }
            Some('0') => {
                result.push_str(&env.shell_name);
                i += 2;
            }
            Some(c) if c.is_ascii_alphabetic() || *c == '_' => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len()
                    && (chars[end].is_ascii_alphanumeric() || chars[end] == '_')
                {
                    end += 1;
                }
                let name: String = chars[start..end].iter().collect();
                if let Some(value) = env.value(&name) {
                    result.push_str(value);
                }
                i = end;
            }
            _ => {
                // `$` followed by end-of-fragment, a digit other than `0`,
                // or punctuation: literal `$`, rescan the next character.
                result.push('$');
                i += 1;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use minishell_syntax::lex_line;

    fn env_with(pairs: &[(&str, &str)]) -> Env {
        let mut env = Env::from_host_env("minishell");
        for (name, value) in pairs {
            env.set(*name, value.to_string());
        }
        env
    }

    fn expand_line(line: &str, env: &Env) -> Vec<String> {
        lex_line(line)
            .unwrap()
            .into_iter()
            .flat_map(|t| expand_argv_word(&t, env))
            .collect()
    }

    #[test]
    fn question_mark_expands_to_last_status() {
        let mut env = Env::from_host_env("minishell");
        env.last_status = 42;
        assert_eq!(expand_line("echo $?", &env), vec!["echo", "42"]);
    }

    #[test]
    fn dollar_zero_expands_to_shell_name() {
        let env = Env::from_host_env("minishell");
        assert_eq!(expand_line("echo $0", &env), vec!["echo", "minishell"]);
    }

    #[test]
    fn unset_variable_expands_to_empty_and_is_dropped_unquoted() {
        let env = Env::from_host_env("minishell");
        assert_eq!(expand_line("echo $UNSET end", &env), vec!["echo", "end"]);
    }

    #[test]
    fn unquoted_expansion_with_spaces_splits() {
        let env = env_with(&[("X", "a b")]);
        assert_eq!(expand_line("echo $X", &env), vec!["echo", "a", "b"]);
    }

    #[test]
    fn double_quoted_expansion_does_not_split() {
        let env = env_with(&[("X", "a b")]);
        assert_eq!(expand_line("echo \"$X\"", &env), vec!["echo", "a b"]);
    }

    #[test]
    fn single_quoted_dollar_is_literal() {
        let env = env_with(&[("X", "a b")]);
        assert_eq!(expand_line("echo '$X'", &env), vec!["echo", "$X"]);
    }

    #[test]
    fn quoted_empty_string_is_preserved() {
        let env = Env::from_host_env("minishell");
        assert_eq!(expand_line("echo \"\"", &env), vec!["echo", ""]);
    }

    #[test]
    fn dollar_followed_by_punctuation_is_literal() {
        let env = Env::from_host_env("minishell");
        assert_eq!(expand_line("echo $!", &env), vec!["echo", "$!"]);
    }

    #[test]
    fn dollar_at_end_of_word_is_literal() {
        let env = Env::from_host_env("minishell");
        assert_eq!(expand_line("echo a$", &env), vec!["echo", "a$"]);
    }
}
