//! The shell's process-wide environment: variables, the exit status of the
//! last foreground pipeline, and the shell's own invocation name.
//!
//! A [`Variable`] pairs a value with an `exported` attribute. An [`Env`] is a
//! name-to-[`Variable`] map plus [`Env::last_status`] and [`Env::shell_name`].
//! Unlike `yash_env::variable::VariableSet`, this shell has no nested
//! contexts (no subshells, no function scopes), so the map is flat.

use std::collections::BTreeMap;
use std::env::VarError;
use std::ffi::CString;

/// Value and attributes of a shell variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variable {
    pub value: String,
    pub exported: bool,
}

impl Variable {
    pub fn new(value: impl Into<String>) -> Self {
        Variable {
            value: value.into(),
            exported: false,
        }
    }

    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }
}

/// Error returned when a variable name fails the name grammar in use
/// throughout the shell (leading alphabetic or `_`, remainder alphanumeric
/// or `_`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("not a valid identifier")]
pub struct InvalidName;

/// Returns whether `name` is a valid variable name.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits `NAME=VALUE` (or bare `NAME`) into its parts, validating the name.
pub fn split_assignment(arg: &str) -> Result<(&str, Option<&str>), InvalidName> {
    let (name, value) = match arg.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (arg, None),
    };
    if is_valid_name(name) {
        Ok((name, value))
    } else {
        Err(InvalidName)
    }
}

/// Process-wide shell state: variables, last exit status, and `$0`.
#[derive(Clone, Debug)]
pub struct Env {
    variables: BTreeMap<String, Variable>,
    pub last_status: u8,
    pub shell_name: String,
}

impl Env {
    /// Builds an `Env` by importing every variable from the host process's
    /// environment, marking each one exported (matching the inherited-envp
    /// convention of every POSIX shell on startup).
    pub fn from_host_env(shell_name: impl Into<String>) -> Self {
        let mut variables = BTreeMap::new();
        for (name, value) in std::env::vars() {
            if is_valid_name(&name) {
                variables.insert(name, Variable::new(value).exported(true));
            }
        }
        Env {
            variables,
            last_status: 0,
            shell_name: shell_name.into(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(|v| v.value.as_str())
    }

    /// Sets `name` to `value`, preserving the `exported` bit if the variable
    /// already existed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let exported = self.variables.get(&name).is_some_and(|v| v.exported);
        self.variables
            .insert(name, Variable::new(value).exported(exported));
    }

    /// Marks `name` exported, creating it as an empty variable if absent.
    /// Implements the `export NAME` (no `=`) form: create-if-absent,
    /// mark-exported-if-present (see DESIGN.md for why).
    pub fn export(&mut self, name: &str) {
        self.variables
            .entry(name.to_string())
            .or_insert_with(|| Variable::new(""))
            .exported = true;
    }

    pub fn unset(&mut self, name: &str) {
        self.variables.remove(name);
    }

    /// Iterates all variables in name order, for `export` with no arguments.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates exported variables in name order, for `env`.
    pub fn exported_iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .filter(|(_, v)| v.exported)
            .map(|(k, v)| (k.as_str(), v.value.as_str()))
    }

    /// Flattens exported variables into `NAME=VALUE` C strings suitable for
    /// `execve`'s envp, the same shape `yash_env::system::real` builds before
    /// calling into `nix::unistd::execve`.
    pub fn envp(&self) -> Result<Vec<CString>, std::ffi::NulError> {
        self.exported_iter()
            .map(|(name, value)| CString::new(format!("{name}={value}")))
            .collect()
    }

    pub fn std_var(&self, name: &str) -> Result<String, VarError> {
        self.value(name).map(str::to_owned).ok_or(VarError::NotPresent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(is_valid_name("FOO"));
        assert!(is_valid_name("_foo_1"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1FOO"));
        assert!(!is_valid_name("FOO-BAR"));
    }

    #[test]
    fn split_assignment_bare() {
        assert_eq!(split_assignment("FOO").unwrap(), ("FOO", None));
    }

    #[test]
    fn split_assignment_with_value() {
        assert_eq!(split_assignment("FOO=bar").unwrap(), ("FOO", Some("bar")));
    }

    #[test]
    fn split_assignment_invalid_name() {
        assert!(split_assignment("1FOO=bar").is_err());
    }

    #[test]
    fn set_preserves_export_bit() {
        let mut env = Env::from_host_env("minishell");
        env.export("FOO");
        env.set("FOO", "bar");
        assert!(env.get("FOO").unwrap().exported);
        assert_eq!(env.value("FOO"), Some("bar"));
    }

    #[test]
    fn export_creates_empty_variable() {
        let mut env = Env::from_host_env("minishell");
        env.unset("NEWVAR");
        env.export("NEWVAR");
        let v = env.get("NEWVAR").unwrap();
        assert!(v.exported);
        assert_eq!(v.value, "");
    }

    #[test]
    fn unset_removes_variable() {
        let mut env = Env::from_host_env("minishell");
        env.set("FOO", "bar");
        env.unset("FOO");
        assert!(env.get("FOO").is_none());
    }
}
