//! Named options (`--force`, `-n value`, ...) and the per-invocation option map.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A named flag a command may accept.
///
/// Identity is the canonical long name; two kinds with the same name are the
/// same option regardless of shorthand or arity.
#[derive(Debug, Clone, Copy)]
pub struct OptionKind {
    name: &'static str,
    shorthand: Option<char>,
    takes_value: bool,
}

impl OptionKind {
    /// `--force` / `-f`
    pub const FORCE: OptionKind = OptionKind::new("force", Some('f'), false);
    /// `--recursive` / `-r`
    pub const RECURSIVE: OptionKind = OptionKind::new("recursive", Some('r'), false);
    /// `--name <value>` / `-n <value>`
    pub const NAME: OptionKind = OptionKind::new("name", Some('n'), true);
    /// `--verbose` / `-v`
    pub const VERBOSE: OptionKind = OptionKind::new("verbose", Some('v'), false);
    /// `--all` / `-a`
    pub const ALL: OptionKind = OptionKind::new("all", Some('a'), false);
    /// `--silent` / `-s`
    pub const SILENT: OptionKind = OptionKind::new("silent", Some('s'), false);

    /// Every built-in kind, in declaration order.
    pub const BUILTIN: [OptionKind; 6] = [
        Self::FORCE,
        Self::RECURSIVE,
        Self::NAME,
        Self::VERBOSE,
        Self::ALL,
        Self::SILENT,
    ];

    /// Define an option kind. `name` should be lowercase.
    pub const fn new(name: &'static str, shorthand: Option<char>, takes_value: bool) -> Self {
        Self {
            name,
            shorthand,
            takes_value,
        }
    }

    /// Look up a built-in kind by name, case-insensitively (`"FORCE"`, `"force"`).
    pub fn from_name(name: &str) -> Option<OptionKind> {
        Self::BUILTIN
            .iter()
            .find(|kind| kind.name.eq_ignore_ascii_case(name))
            .copied()
    }

    /// Canonical long name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Single-character shorthand, if any.
    #[inline]
    pub fn shorthand(&self) -> Option<char> {
        self.shorthand
    }

    /// Whether `--name value` consumes the following token.
    #[inline]
    pub fn takes_value(&self) -> bool {
        self.takes_value
    }

    /// Whether `long` (without dashes) names this option.
    #[inline]
    pub fn matches_long(&self, long: &str) -> bool {
        self.name.eq_ignore_ascii_case(long)
    }
}

impl PartialEq for OptionKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for OptionKind {}

impl Hash for OptionKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}", self.name)?;
        if let Some(short) = self.shorthand {
            write!(f, " (-{})", short)?;
        }
        Ok(())
    }
}

/// Options supplied with one invocation.
///
/// Keys are unique; inserting an option twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    values: HashMap<OptionKind, Option<String>>,
}

impl Options {
    /// Create an empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `kind`, replacing any earlier value.
    pub fn insert(&mut self, kind: OptionKind, value: Option<String>) {
        self.values.insert(kind, value);
    }

    /// Whether `kind` was supplied.
    pub fn has(&self, kind: &OptionKind) -> bool {
        self.values.contains_key(kind)
    }

    /// Whether an option with this long name was supplied.
    pub fn has_name(&self, name: &str) -> bool {
        self.values.keys().any(|kind| kind.matches_long(name))
    }

    /// `Some(value)` if `kind` was supplied (the inner value may be absent).
    pub fn get(&self, kind: &OptionKind) -> Option<Option<&str>> {
        self.values.get(kind).map(|value| value.as_deref())
    }

    /// The value attached to `kind`, if it was supplied with one.
    pub fn value(&self, kind: &OptionKind) -> Option<&str> {
        self.get(kind).flatten()
    }

    /// Number of distinct options supplied.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no options were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over supplied options in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&OptionKind, Option<&str>)> {
        self.values.iter().map(|(kind, value)| (kind, value.as_deref()))
    }
}

impl FromIterator<(OptionKind, Option<String>)> for Options {
    fn from_iter<I: IntoIterator<Item = (OptionKind, Option<String>)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
