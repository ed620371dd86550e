//! The ignore engine: gitignore-style rules, absolute and scoped rulesets,
//! and path evaluation.

mod matcher;
pub use matcher::is_match;

use bstr::BString;

quick_error::quick_error! {
    #[derive(Debug, PartialEq, Eq)]
    pub enum Error {
        AbsolutePath(path: String) {
            display("check_ignore requires a path relative to the repository root, got {:?}", path)
        }
    }
}

/// A single parsed ignore line: a glob pattern plus whether a match means
/// "ignored" (`true`) or "un-ignore" (`false`, from a leading `!`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub pattern: BString,
    pub include: bool,
}

/// Parse one line of a `.gitignore`-shaped file. Blank lines and `#`
/// comments produce `None`.
pub fn parse_rule(line: &[u8]) -> Option<Rule> {
    let trimmed = trim_ascii_whitespace(line);
    if trimmed.is_empty() || trimmed[0] == b'#' {
        return None;
    }
    if trimmed[0] == b'!' {
        return Some(Rule {
            pattern: trimmed[1..].into(),
            include: false,
        });
    }
    if trimmed[0] == b'\\' {
        return Some(Rule {
            pattern: trimmed[1..].into(),
            include: true,
        });
    }
    Some(Rule {
        pattern: trimmed.into(),
        include: true,
    })
}

/// Parse every non-empty line of a ruleset's file contents.
pub fn parse_ruleset(contents: &[u8]) -> Vec<Rule> {
    contents
        .split(|&b| b == b'\n')
        .filter_map(parse_rule)
        .collect()
}

fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |p| p + 1);
    &bytes[start..end]
}

/// Evaluate a single ruleset against `path`: the last matching rule wins.
/// Returns `None` when no rule in the set matches at all — distinct from a
/// matching `!` rule, which yields `Some(false)`.
fn evaluate_ruleset(rules: &[Rule], path: &str) -> Option<bool> {
    let mut decision = None;
    for rule in rules {
        if is_match(&rule.pattern, path.as_bytes()) {
            decision = Some(rule.include);
        }
    }
    decision
}

/// The full set of rulesets consulted by [`Ignore::is_ignored`].
#[derive(Clone, Debug, Default)]
pub struct Ignore {
    /// Low-priority, unscoped rulesets (`.git/info/exclude`, the global
    /// `git/ignore`), consulted in the order they were added.
    absolute: Vec<Vec<Rule>>,
    /// High-priority rulesets attached to the directory that contains the
    /// `.gitignore` they came from (`""` for the repository root).
    scoped: Vec<(BString, Vec<Rule>)>,
}

impl Ignore {
    pub fn new() -> Self {
        Ignore::default()
    }

    pub fn add_absolute_ruleset(&mut self, rules: Vec<Rule>) {
        self.absolute.push(rules);
    }

    pub fn add_scoped_ruleset(&mut self, dir: impl Into<BString>, rules: Vec<Rule>) {
        self.scoped.push((dir.into(), rules));
    }

    /// Decide whether `path` (repository-relative) is ignored.
    pub fn is_ignored(&self, path: &str) -> Result<bool, Error> {
        if path.starts_with('/') {
            return Err(Error::AbsolutePath(path.to_string()));
        }

        if let Some(decision) = self.check_scoped(path) {
            return Ok(decision);
        }
        Ok(self.check_absolute(path))
    }

    /// Walk ancestor directories from deepest to the repository root,
    /// visiting `""` as an explicit final step rather than relying on a
    /// `dirname()` chain to reach it — the scoped rules for the innermost
    /// directory that has any win, and a matching `!` rule there correctly
    /// stops the search (unlike a truthy check, which would keep walking
    /// past an un-ignore decision).
    fn check_scoped(&self, path: &str) -> Option<bool> {
        for ancestor in ancestors(path) {
            if let Some((_, rules)) = self.scoped.iter().find(|(dir, _)| dir.as_slice() == ancestor.as_bytes()) {
                if let Some(decision) = evaluate_ruleset(rules, path) {
                    return Some(decision);
                }
            }
        }
        None
    }

    /// Across absolute rulesets, the first to produce a positive (ignored)
    /// decision wins; un-ignore decisions and non-matches within one
    /// ruleset don't suppress a later ruleset's match.
    fn check_absolute(&self, path: &str) -> bool {
        for rules in &self.absolute {
            if evaluate_ruleset(rules, path) == Some(true) {
                return true;
            }
        }
        false
    }
}

/// Ancestor directories of `path`, deepest first, always ending with `""`
/// (the repository root).
fn ancestors(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = dirname(path).to_string();
    loop {
        let is_root = current.is_empty();
        out.push(std::mem::take(&mut current));
        if is_root {
            break;
        }
        current = dirname(out.last().unwrap()).to_string();
    }
    out
}

fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..i],
        None => "",
    }
}
