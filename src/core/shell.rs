//! Shell export emitter.
//!
//! A child process cannot change its parent's environment, so `kvenv load`
//! prints statements for the calling shell to `eval`. Only statements go to
//! stdout; everything else goes to stderr.

use std::fmt::Write;
use std::path::Path;
use std::process::Command;

/// Target dialect for emitted statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    /// In-process mutation of a child command's environment.
    Native,
}

impl Dialect {
    /// Detect the dialect from a `$SHELL`-style path.
    ///
    /// Falls back to bash (powershell on Windows) when the shell is unknown.
    pub fn from_shell_path(shell: Option<&str>) -> Self {
        let name = shell
            .and_then(|s| Path::new(s).file_name())
            .and_then(|n| n.to_str())
            .map(|n| n.trim_end_matches(".exe").to_ascii_lowercase());

        match name.as_deref() {
            Some("fish") => Self::Fish,
            Some("zsh") => Self::Zsh,
            Some("bash") | Some("sh") => Self::Bash,
            Some("pwsh") | Some("powershell") => Self::PowerShell,
            _ if cfg!(windows) => Self::PowerShell,
            _ => Self::Bash,
        }
    }

    /// Detect the dialect of the calling shell from `$SHELL`.
    pub fn detect() -> Self {
        Self::from_shell_path(std::env::var("SHELL").ok().as_deref())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
            Self::PowerShell => "powershell",
            Self::Native => "native",
        }
    }

    /// Statement setting `key` to `value`. `None` for [`Dialect::Native`].
    pub fn export(&self, key: &str, value: &str) -> Option<String> {
        match self {
            Self::Bash | Self::Zsh => Some(format!("export {}={};", key, quote_posix(value))),
            Self::Fish => Some(format!("set -gx {} {};", key, quote_fish(value))),
            Self::PowerShell => Some(format!("$env:{} = {};", key, quote_powershell(value))),
            Self::Native => None,
        }
    }

    /// Statement removing `key`. `None` for [`Dialect::Native`].
    pub fn unset(&self, key: &str) -> Option<String> {
        match self {
            Self::Bash | Self::Zsh => Some(format!("unset {};", key)),
            Self::Fish => Some(format!("set -e {};", key)),
            Self::PowerShell => Some(format!(
                "Remove-Item Env:{} -ErrorAction SilentlyContinue;",
                key
            )),
            Self::Native => None,
        }
    }
}

/// Single-quote a value for POSIX shells: `'` becomes `'\''`.
pub fn quote_posix(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Single-quote a value for fish. Same as [`quote_posix`], except fish
/// still treats `\\` as an escape inside single quotes, so backslashes are
/// doubled first.
pub fn quote_fish(value: &str) -> String {
    quote_posix(&value.replace('\\', r"\\"))
}

/// Characters PowerShell accepts as a single-quote delimiter.
const POWERSHELL_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Single-quote a value for PowerShell. Every quote character, ASCII or
/// typographic, is doubled.
pub fn quote_powershell(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if POWERSHELL_QUOTES.contains(&c) {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Render one export statement per pair, newline-terminated.
pub fn render_exports<K, V>(dialect: Dialect, pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut output = String::new();
    for (key, value) in pairs {
        if let Some(line) = dialect.export(key.as_ref(), value.as_ref()) {
            let _ = writeln!(&mut output, "{}", line);
        }
    }
    output
}

/// Render one unset statement per key, newline-terminated.
pub fn render_unsets<K: AsRef<str>>(dialect: Dialect, keys: &[K]) -> String {
    let mut output = String::new();
    for key in keys {
        if let Some(line) = dialect.unset(key.as_ref()) {
            let _ = writeln!(&mut output, "{}", line);
        }
    }
    output
}

/// Apply pairs to a child command's environment (the native dialect).
pub fn apply_native<K, V>(cmd: &mut Command, pairs: &[(K, V)])
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (key, value) in pairs {
        cmd.env(key.as_ref(), value.as_ref());
    }
}
