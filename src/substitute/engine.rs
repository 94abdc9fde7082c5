//! Forward and reverse rewriting of a single file's content.
//!
//! A `Rewriter` compiles the store once into a single regex and is then
//! applied to any number of files.
//!
//! Forward replaces literal secret values with placeholder tokens in one
//! left-to-right pass. At each position the longest secret that matches
//! wins (ties go to store order), and text already emitted is never
//! rescanned. Placeholder tokens already present in the content, known or
//! not, are opaque: no secret can match inside them, so forward is
//! idempotent.
//!
//! Reverse puts the literal back for every token whose id the store holds,
//! matching the store's own tokens exactly so any id round-trips. Other
//! well-formed tokens are left alone and reported.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::{Captures, Regex, RegexBuilder};
use tracing::debug;

use crate::errors::{Result, SecretManagerError};
use crate::vault::SecretStore;

/// Which way a substitution runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Secrets become placeholders (`replace`).
    Forward,
    /// Placeholders become secrets (`reverse`).
    Reverse,
}

/// Result of rewriting one piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The rewritten content (identical to the input when nothing changed).
    pub content: String,
    /// Number of individual replacements made.
    pub replacements: usize,
    /// Placeholder ids found during reverse that the store does not hold.
    pub unknown_placeholders: Vec<String>,
}

impl Substitution {
    fn unchanged(content: &str) -> Self {
        Self {
            content: content.to_string(),
            replacements: 0,
            unknown_placeholders: Vec::new(),
        }
    }

    /// `true` if at least one replacement happened.
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Literal start of every placeholder token.
const TOKEN_PREFIX: &str = "<!secret_";

/// A well-formed token whose id has no whitespace, `<`, `>` or `!`.
const GENERIC_TOKEN: &str = r"<!secret_[^\s<>!]+!>";

/// Capture group holding a matched secret (forward) or known token (reverse).
const HIT: &str = "hit";

/// Capture group holding the id of a token the store does not know.
const UNKNOWN: &str = "unknown";

/// A store compiled for one direction.
#[derive(Debug)]
pub struct Rewriter {
    direction: Direction,
    /// `None` when nothing in the store can ever match.
    matcher: Option<Regex>,
    /// Forward: secret -> placeholder. Reverse: placeholder -> secret.
    lookup: HashMap<String, String>,
}

impl Rewriter {
    /// Compile `store` for `direction`.
    pub fn new(direction: Direction, store: &SecretStore) -> Result<Self> {
        let (pattern, lookup) = match direction {
            Direction::Forward => forward_pattern(store),
            Direction::Reverse => reverse_pattern(store),
        };

        let matcher = match pattern {
            Some(pattern) => Some(
                RegexBuilder::new(&pattern)
                    .size_limit(1 << 26)
                    .build()
                    .map_err(|e| {
                        SecretManagerError::CommandFailed(format!(
                            "cannot compile secret matcher: {e}"
                        ))
                    })?,
            ),
            None => None,
        };

        debug!(?direction, needles = lookup.len(), "compiled rewriter");
        Ok(Self {
            direction,
            matcher,
            lookup,
        })
    }

    /// Rewrite `content`.
    pub fn apply(&self, content: &str) -> Substitution {
        let Some(matcher) = &self.matcher else {
            return Substitution::unchanged(content);
        };
        if self.direction == Direction::Reverse && !content.contains(TOKEN_PREFIX) {
            return Substitution::unchanged(content);
        }

        let mut replacements = 0;
        let mut unknown_placeholders: Vec<String> = Vec::new();

        let rewritten = matcher.replace_all(content, |caps: &Captures| {
            if let Some(hit) = caps.name(HIT) {
                if let Some(replacement) = self.lookup.get(hit.as_str()) {
                    replacements += 1;
                    return replacement.clone();
                }
            }
            if let Some(id) = caps.name(UNKNOWN) {
                let id = id.as_str();
                if !unknown_placeholders.iter().any(|u| u == id) {
                    unknown_placeholders.push(id.to_string());
                }
            }
            // Opaque token: emitted as found.
            caps[0].to_string()
        });

        Substitution {
            content: rewritten.into_owned(),
            replacements,
            unknown_placeholders,
        }
    }

    /// Rewrite the file at `path` in place.
    ///
    /// The file is only written when something changed (and never on a dry
    /// run), so untouched files keep their mtime. Content that is not UTF-8
    /// yields `Encoding`.
    pub fn apply_to_file(&self, path: &Path, dry_run: bool) -> Result<Substitution> {
        let bytes = fs::read(path).map_err(|e| SecretManagerError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let content = String::from_utf8(bytes)
            .map_err(|_| SecretManagerError::Encoding(path.to_path_buf()))?;

        let result = self.apply(&content);

        if result.changed() && !dry_run {
            fs::write(path, result.content.as_bytes()).map_err(|e| {
                SecretManagerError::WriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }

        debug!(
            path = %path.display(),
            direction = ?self.direction,
            replacements = result.replacements,
            dry_run,
            "processed file"
        );
        Ok(result)
    }
}

/// Escaped alternation, longest needle first, ties in the given order.
///
/// The regex engine is leftmost-first, so at any position the first
/// alternative that matches wins: with this ordering that is the longest.
fn alternation<'a>(needles: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut needles: Vec<&str> = needles.into_iter().collect();
    if needles.is_empty() {
        return None;
    }
    needles.sort_by(|a, b| b.len().cmp(&a.len()));
    let escaped: Vec<String> = needles.into_iter().map(regex::escape).collect();
    Some(escaped.join("|"))
}

/// Tokens first so an existing placeholder is consumed whole before any
/// secret could start inside it.
fn forward_pattern(store: &SecretStore) -> (Option<String>, HashMap<String, String>) {
    let mut lookup: HashMap<String, String> = HashMap::new();
    let mut secrets: Vec<&str> = Vec::new();
    for entry in store.entries() {
        let secret = entry.record.secret.as_str();
        if secret.is_empty() || lookup.contains_key(secret) {
            continue;
        }
        lookup.insert(secret.to_string(), entry.placeholder());
        secrets.push(secret);
    }

    let Some(secret_alt) = alternation(secrets) else {
        return (None, lookup);
    };

    let tokens: Vec<String> = store.entries().iter().map(|e| e.placeholder()).collect();
    let token_alt = match alternation(tokens.iter().map(String::as_str)) {
        Some(known) => format!("{known}|{GENERIC_TOKEN}"),
        None => GENERIC_TOKEN.to_string(),
    };

    (
        Some(format!("(?:{token_alt})|(?P<{HIT}>{secret_alt})")),
        lookup,
    )
}

/// The store's own tokens, then any other well-formed token.
fn reverse_pattern(store: &SecretStore) -> (Option<String>, HashMap<String, String>) {
    let mut lookup: HashMap<String, String> = HashMap::new();
    for entry in store.entries() {
        lookup
            .entry(entry.placeholder())
            .or_insert_with(|| entry.record.secret.clone());
    }

    let unknown = format!(r"{TOKEN_PREFIX}(?P<{UNKNOWN}>[^\s<>!]+)!>");
    let pattern = match alternation(lookup.keys().map(String::as_str)) {
        Some(known) => format!("(?P<{HIT}>{known})|{unknown}"),
        None => unknown,
    };
    (Some(pattern), lookup)
}

/// Run `direction` over `content`, compiling `store` first.
pub fn apply(direction: Direction, content: &str, store: &SecretStore) -> Result<Substitution> {
    Ok(Rewriter::new(direction, store)?.apply(content))
}

/// Replace every occurrence of every secret with its placeholder.
pub fn forward_apply(content: &str, store: &SecretStore) -> Result<Substitution> {
    apply(Direction::Forward, content, store)
}

/// Replace every known placeholder token with its literal secret.
pub fn reverse_apply(content: &str, store: &SecretStore) -> Result<Substitution> {
    apply(Direction::Reverse, content, store)
}
