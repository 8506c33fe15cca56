//! Gitignore rule compilation and matching

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::MapError;

/// A single compiled line of an ignore file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    /// The line as written, minus trailing whitespace.
    pub pattern: String,
    /// `!pattern`: re-includes a previously ignored path.
    pub negated: bool,
    /// `pattern/`: only matches directories.
    pub dir_only: bool,
    /// Contains a leading or middle `/`, so it only matches relative to the root.
    pub anchored: bool,
}

impl IgnoreRule {
    /// Parse one ignore-file line. Blank lines and comments yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        // An escaped trailing space is significant.
        let trimmed = if line.ends_with("\\ ") {
            line
        } else {
            line.trim_end()
        };
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let (negated, body) = match trimmed.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let body = match body.strip_prefix('\\') {
            Some(rest) if rest.starts_with('!') || rest.starts_with('#') => rest,
            _ => body,
        };
        if body.is_empty() {
            return None;
        }

        let dir_only = body.ends_with('/');
        let stem = body.strip_suffix('/').unwrap_or(body);

        Some(Self {
            pattern: trimmed.to_string(),
            negated,
            dir_only,
            anchored: stem.contains('/'),
        })
    }
}

/// An ordered set of gitignore rules compiled against a root directory.
///
/// Later rules override earlier ones; a path is ignored iff the last rule that
/// matches it is not negated, or any of its ancestor directories is ignored.
#[derive(Debug)]
pub struct IgnoreRuleSet {
    rules: Vec<IgnoreRule>,
    malformed: Vec<String>,
    matcher: Gitignore,
}

impl IgnoreRuleSet {
    /// A rule set that matches nothing.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            malformed: Vec::new(),
            matcher: Gitignore::empty(),
        }
    }

    /// Compile ignore-file lines relative to `root`.
    ///
    /// Never fails: a line the glob compiler rejects is dropped, logged and kept
    /// in [`IgnoreRuleSet::malformed`].
    pub fn compile<I, S>(root: &Path, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new(root);
        let mut rules = Vec::new();
        let mut malformed = Vec::new();

        for line in lines {
            let line = line.as_ref();
            let Some(rule) = IgnoreRule::parse(line) else {
                continue;
            };
            match builder.add_line(None, line) {
                Ok(_) => rules.push(rule),
                Err(e) => {
                    tracing::warn!("skipping malformed ignore rule {:?}: {}", rule.pattern, e);
                    malformed.push(rule.pattern);
                }
            }
        }

        let matcher = match builder.build() {
            Ok(matcher) => matcher,
            Err(e) => {
                tracing::warn!("failed to compile ignore rules, continuing without them: {}", e);
                malformed.extend(rules.drain(..).map(|rule| rule.pattern));
                Gitignore::empty()
            }
        };

        Self {
            rules,
            malformed,
            matcher,
        }
    }

    /// Load rules from an ignore file. A missing file yields the empty set.
    ///
    /// Lines that are not valid UTF-8 are dropped like any other malformed line.
    pub fn from_file(root: &Path, path: &Path) -> Result<Self, MapError> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(
                    "No .gitignore file found at {}. Continuing without it.",
                    path.display()
                );
                return Ok(Self::empty());
            }
            Err(source) => {
                return Err(MapError::IgnoreSource {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        tracing::info!("Loaded .gitignore from {}", path.display());

        let mut lines = Vec::new();
        let mut undecodable = Vec::new();
        for raw in content.split(|&b| b == b'\n') {
            match std::str::from_utf8(raw) {
                Ok(line) => lines.push(line),
                Err(_) => {
                    let line = String::from_utf8_lossy(raw).trim_end().to_string();
                    tracing::warn!("skipping malformed ignore rule {:?}: invalid UTF-8", line);
                    undecodable.push(line);
                }
            }
        }

        let mut set = Self::compile(root, lines);
        set.malformed.extend(undecodable);
        Ok(set)
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// Lines that were dropped because they could not be compiled.
    pub fn malformed(&self) -> &[String] {
        &self.malformed
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check whether a root-relative path is ignored.
    ///
    /// The empty path (the root itself) is never ignored. Every ancestor is
    /// checked as a directory first, so a negation cannot re-include a path
    /// below an excluded directory.
    pub fn matches(&self, relative: &Path, is_dir: bool) -> bool {
        if relative.as_os_str().is_empty() || relative.has_root() || self.rules.is_empty() {
            return false;
        }

        let mut ancestors: Vec<&Path> = relative
            .ancestors()
            .skip(1)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        ancestors.reverse();

        if ancestors
            .into_iter()
            .any(|dir| self.matcher.matched(dir, true).is_ignore())
        {
            return true;
        }

        self.matches_entry(relative, is_dir)
    }

    /// Check only the path itself, not its ancestors.
    ///
    /// Only valid when every ancestor is already known not to be ignored,
    /// as during a walk that prunes ignored directories.
    pub(crate) fn matches_entry(&self, relative: &Path, is_dir: bool) -> bool {
        if relative.as_os_str().is_empty() || relative.has_root() || self.rules.is_empty() {
            return false;
        }
        self.matcher.matched(relative, is_dir).is_ignore()
    }
}

impl Default for IgnoreRuleSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Path of the ignore file consulted for `root`.
pub fn gitignore_path(root: &Path) -> PathBuf {
    root.join(".gitignore")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rules(lines: &[&str]) -> IgnoreRuleSet {
        IgnoreRuleSet::compile(Path::new("/project"), lines.iter().copied())
    }

    #[test]
    fn test_parse_flags() {
        let rule = IgnoreRule::parse("!/build/").unwrap();
        assert!(rule.negated);
        assert!(rule.dir_only);
        assert!(rule.anchored);
        assert_eq!(rule.pattern, "!/build/");

        let rule = IgnoreRule::parse("*.log  ").unwrap();
        assert!(!rule.negated);
        assert!(!rule.dir_only);
        assert!(!rule.anchored);
        assert_eq!(rule.pattern, "*.log");

        let rule = IgnoreRule::parse("docs/*.md").unwrap();
        assert!(rule.anchored);

        let rule = IgnoreRule::parse("\\!important").unwrap();
        assert!(!rule.negated);
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert!(IgnoreRule::parse("").is_none());
        assert!(IgnoreRule::parse("   ").is_none());
        assert!(IgnoreRule::parse("# comment").is_none());
        assert!(IgnoreRule::parse("!").is_none());
    }

    #[test]
    fn test_compile_keeps_order() {
        let set = rules(&["# header", "*.log", "", "!keep.log"]);
        let patterns: Vec<_> = set.rules().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["*.log", "!keep.log"]);
    }

    #[test]
    fn test_wildcards() {
        let set = rules(&["*.log", "file?.txt", "[abc].md"]);
        assert!(set.matches(Path::new("debug.log"), false));
        assert!(set.matches(Path::new("deep/nested/debug.log"), false));
        assert!(set.matches(Path::new("file1.txt"), false));
        assert!(!set.matches(Path::new("file12.txt"), false));
        assert!(set.matches(Path::new("a.md"), false));
        assert!(!set.matches(Path::new("d.md"), false));
        assert!(!set.matches(Path::new("main.rs"), false));
    }

    #[test]
    fn test_double_star_crosses_segments() {
        let set = rules(&["logs/**/*.txt"]);
        assert!(set.matches(Path::new("logs/a/b/c.txt"), false));
        assert!(set.matches(Path::new("logs/c.txt"), false));
        assert!(!set.matches(Path::new("other/c.txt"), false));
    }

    #[test]
    fn test_leading_slash_anchors_to_root() {
        let set = rules(&["/target"]);
        assert!(set.matches(Path::new("target"), true));
        assert!(!set.matches(Path::new("crates/foo/target"), true));

        let unanchored = rules(&["target"]);
        assert!(unanchored.matches(Path::new("crates/foo/target"), true));
    }

    #[test]
    fn test_trailing_slash_matches_directories_only() {
        let set = rules(&["build/"]);
        assert!(set.matches(Path::new("build"), true));
        assert!(!set.matches(Path::new("build"), false));
        assert!(set.matches(Path::new("src/build"), true));
    }

    #[test]
    fn test_negation_last_rule_wins() {
        let set = rules(&["*.log", "!keep.log"]);
        assert!(set.matches(Path::new("debug.log"), false));
        assert!(!set.matches(Path::new("keep.log"), false));

        let set = rules(&["!keep.log", "*.log"]);
        assert!(set.matches(Path::new("keep.log"), false));
    }

    #[test]
    fn test_negation_cannot_reinclude_below_excluded_dir() {
        let set = rules(&["vendor/", "!vendor/keep.txt"]);
        assert!(set.matches(Path::new("vendor"), true));
        assert!(set.matches(Path::new("vendor/keep.txt"), false));
        assert!(set.matches(Path::new("vendor/deep/file.txt"), false));
    }

    #[test]
    fn test_root_path_never_matches() {
        let set = rules(&["*"]);
        assert!(!set.matches(Path::new(""), true));
    }

    #[test]
    fn test_empty_rule_set_matches_nothing() {
        let set = IgnoreRuleSet::empty();
        assert!(set.is_empty());
        assert!(!set.matches(Path::new(".git"), true));
        assert!(!set.matches(Path::new("a/b.txt"), false));
    }

    #[test]
    fn test_malformed_rule_is_dropped() {
        let set = rules(&["*.log", "[z-a].txt", "*.tmp"]);
        assert_eq!(set.malformed(), &["[z-a].txt".to_string()]);
        assert_eq!(set.rules().len(), 2);
        assert!(set.matches(Path::new("x.log"), false));
        assert!(set.matches(Path::new("x.tmp"), false));
    }

    #[test]
    fn test_from_file_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let set = IgnoreRuleSet::from_file(dir.path(), &gitignore_path(dir.path())).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_file_reads_rules() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "# deps\nnode_modules/\n*.pyc\n").unwrap();
        let set = IgnoreRuleSet::from_file(dir.path(), &gitignore_path(dir.path())).unwrap();
        assert_eq!(set.rules().len(), 2);
        assert!(set.matches(Path::new("node_modules"), true));
        assert!(set.matches(Path::new("pkg/mod.pyc"), false));
    }

    #[test]
    fn test_from_file_drops_undecodable_lines() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gitignore"), b"*.log\ncaf\xe9.txt\n*.tmp\n").unwrap();
        let set = IgnoreRuleSet::from_file(dir.path(), &gitignore_path(dir.path())).unwrap();

        let patterns: Vec<_> = set.rules().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["*.log", "*.tmp"]);
        assert_eq!(set.malformed(), &["caf\u{FFFD}.txt".to_string()]);
        assert!(set.matches(Path::new("debug.log"), false));
        assert!(!set.matches(Path::new("notes.txt"), false));
    }

    #[test]
    fn test_matches_entry_skips_ancestor_check() {
        let set = rules(&["vendor/", "!vendor/keep.txt"]);
        assert!(set.matches(Path::new("vendor/keep.txt"), false));
        assert!(!set.matches_entry(Path::new("vendor/keep.txt"), false));
        assert!(set.matches_entry(Path::new("vendor"), true));
        assert!(!set.matches_entry(Path::new(""), true));
    }
}
