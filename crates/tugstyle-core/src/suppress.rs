//! Suppression filters.
//!
//! Suppressions come from two places: a Checkstyle suppressions XML file
//! referenced by a `SuppressionFilter` module, and path globs given on the
//! command line.
//!
//! ```xml
//! <suppressions>
//!     <suppress files="generated[\\/]" />
//!     <suppress files="Legacy\.java" checks="FinalClass|HiddenField" />
//! </suppressions>
//! ```

use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

use crate::error::ConfigError;

/// One `<suppress>` element.
#[derive(Debug, Clone)]
pub struct Suppress {
    files: Regex,
    checks: Option<Regex>,
}

impl Suppress {
    pub fn new(files: &str, checks: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            files: compile(files)?,
            checks: checks.map(compile).transpose()?,
        })
    }

    fn matches_file(&self, path: &str) -> bool {
        self.files.is_match(path)
    }

    fn matches_check(&self, check: &str) -> bool {
        self.checks.as_ref().is_none_or(|re| re.is_match(check))
    }

    /// Whether this entry suppresses every check.
    fn covers_all_checks(&self) -> bool {
        match &self.checks {
            None => true,
            Some(re) => matches!(re.as_str(), "." | ".*" | ".+"),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// The `(path) -> bool` predicate deciding which files get fixed.
#[derive(Debug, Clone, Default)]
pub struct Suppressions {
    entries: Vec<Suppress>,
    excluded_paths: Option<GlobSet>,
}

impl Suppressions {
    /// Accepts everything.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Suppress>) -> Self {
        Self {
            entries,
            excluded_paths: None,
        }
    }

    /// Parse a suppressions XML document.
    pub fn parse(xml: &str) -> Result<Self, ConfigError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(xml, options)?;
        let root = doc.root_element();
        if root.tag_name().name() != "suppressions" {
            return Err(ConfigError::Structure(format!(
                "expected <suppressions>, found <{}>",
                root.tag_name().name()
            )));
        }

        let mut entries = Vec::new();
        for node in root.children().filter(|n| n.has_tag_name("suppress")) {
            let Some(files) = node.attribute("files") else {
                // Entries keyed on other attributes do not select files.
                continue;
            };
            entries.push(Suppress::new(files, node.attribute("checks"))?);
        }
        Ok(Self::from_entries(entries))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let xml = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::parse(&xml)
    }

    /// Add path globs whose matches are never fixed.
    pub fn with_excluded_paths<S: AsRef<str>>(mut self, globs: &[S]) -> Result<Self, ConfigError> {
        if globs.is_empty() {
            return Ok(self);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in globs {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| ConfigError::InvalidGlob {
            pattern: globs
                .iter()
                .map(|g| g.as_ref())
                .collect::<Vec<_>>()
                .join(","),
            message: e.to_string(),
        })?;
        self.excluded_paths = Some(set);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.excluded_paths.is_none()
    }

    /// Whether `path` should be processed at all.
    pub fn accepts(&self, path: &Path) -> bool {
        if self.excluded_paths.as_ref().is_some_and(|set| set.is_match(path)) {
            return false;
        }
        let text = normalized(path);
        !self
            .entries
            .iter()
            .any(|s| s.covers_all_checks() && s.matches_file(&text))
    }

    /// Whether rule `check` may run on `path`.
    pub fn accepts_check(&self, path: &Path, check: &str) -> bool {
        if !self.accepts(path) {
            return false;
        }
        let text = normalized(path);
        !self
            .entries
            .iter()
            .any(|s| s.matches_file(&text) && s.matches_check(check))
    }
}

/// Paths are matched with forward slashes on every platform.
fn normalized(path: &Path) -> String {
    path.to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}
