//! One macro invocation in the emitted pic program.
//!
//! A [`Statement`] renders as `name(arg,arg,...);`. Arguments are either
//! bare names, double-quoted strings (with `"` escaped as `\"`), raw pic
//! fragments, or a run of quoted lines separated by spaces.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A generated element name such as `O_3`.
    Ident(String),
    /// A label, emitted quoted and escaped.
    Quoted(String),
    /// A pic fragment emitted verbatim (movement and size specs).
    Raw(String),
    /// An optional raw prefix followed by each line as its own quoted string.
    Lines {
        prefix: Option<String>,
        lines: Vec<String>,
    },
}

/// Escape embedded double quotes for a pic string literal.
pub fn escape(text: &str) -> String {
    text.replace('"', "\\\"")
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) | Self::Raw(name) => f.write_str(name),
            Self::Quoted(text) => write!(f, "\"{}\"", escape(text)),
            Self::Lines { prefix, lines } => {
                let mut parts = Vec::with_capacity(lines.len() + 1);
                if let Some(prefix) = prefix.as_deref().filter(|p| !p.is_empty()) {
                    parts.push(prefix.to_string());
                }
                parts.extend(lines.iter().map(|line| format!("\"{}\"", escape(line))));
                f.write_str(&parts.join(" "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    name: &'static str,
    args: Vec<Arg>,
}

impl Statement {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn ident(mut self, name: impl Into<String>) -> Self {
        self.args.push(Arg::Ident(name.into()));
        self
    }

    #[must_use]
    pub fn quoted(mut self, text: impl Into<String>) -> Self {
        self.args.push(Arg::Quoted(text.into()));
        self
    }

    #[must_use]
    pub fn raw(mut self, fragment: impl Into<String>) -> Self {
        self.args.push(Arg::Raw(fragment.into()));
        self
    }

    #[must_use]
    pub fn lines(mut self, prefix: Option<String>, text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(ToOwned::to_owned).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        self.args.push(Arg::Lines { prefix, lines });
        self
    }

    /// Macro name, e.g. `message`.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// True if any bare-name argument equals `name`.
    pub fn references(&self, name: &str) -> bool {
        self.args
            .iter()
            .any(|arg| matches!(arg, Arg::Ident(ident) if ident == name))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(");")
    }
}
