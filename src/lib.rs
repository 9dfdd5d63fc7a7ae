//! tugstyle: automatic fixes for Checkstyle violations in Java sources.
//!
//! A Checkstyle configuration selects rules and their options. Each Java file
//! is parsed into a formatting-preserving tree, the configured rules are run
//! to a fixpoint, and the tree is printed back. Code that no rule touches is
//! reproduced byte-for-byte.
//!
//! - [`fix_source`] rewrites a string; it does no I/O.
//! - [`fix_file`] rewrites one file on disk, honoring suppressions.
//! - [`runner::run`] processes many files in parallel.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{info, instrument, warn};
use tugstyle_core::Suppressions;
use tugstyle_java::{parse_compilation_unit, Codegen, Outcome, Rule, Scheduler};
use tugstyle_rules::RuleRegistry;

pub mod error;
pub mod report;
pub mod runner;

pub use error::{OutputErrorCode, TugstyleError};
pub use report::{FileReport, FileStatus, RunReport};

/// The rewritten text of one compilation unit.
#[derive(Debug, Clone)]
pub struct FixResult {
    pub source: String,
    /// Rules that changed something, by name.
    pub changed_rules: BTreeSet<String>,
    pub outcome: Outcome,
}

impl FixResult {
    pub fn is_changed(&self) -> bool {
        !self.changed_rules.is_empty()
    }
}

/// Run `rules` over `source` until nothing changes.
pub fn fix_source(
    source: &str,
    rules: &mut [Box<dyn Rule>],
    scheduler: &Scheduler,
) -> Result<FixResult, TugstyleError> {
    let unit =
        parse_compilation_unit(source).map_err(|e| TugstyleError::parse("<source>", e))?;
    let result = scheduler.run(unit, rules)?;
    Ok(FixResult {
        source: result.unit.to_source(),
        changed_rules: result.changed_rules,
        outcome: result.outcome,
    })
}

/// Everything [`fix_file`] needs besides the path.
#[derive(Debug, Clone, Default)]
pub struct FixOptions {
    pub registry: RuleRegistry,
    pub suppressions: Suppressions,
    pub scheduler: Scheduler,
    /// Compute fixes without writing them.
    pub dry_run: bool,
}

impl FixOptions {
    pub fn new(registry: RuleRegistry, suppressions: Suppressions) -> Self {
        FixOptions {
            registry,
            suppressions,
            ..FixOptions::default()
        }
    }
}

/// Fix one file, writing it back when it changed and this is not a dry run.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn fix_file(path: &Path, options: &FixOptions) -> Result<FileReport, TugstyleError> {
    if !options.suppressions.accepts(path) {
        return Ok(FileReport::suppressed(path));
    }
    let source = fs::read_to_string(path).map_err(|e| TugstyleError::io(path, e))?;
    let mut rules = options.registry.instantiate_for(path, &options.suppressions);
    let fixed = fix_source(&source, &mut rules, &options.scheduler).map_err(|e| match e {
        TugstyleError::Parse { source: parse_error, .. } => TugstyleError::parse(path, parse_error),
        other => other,
    })?;

    if let Outcome::NotConverged { passes } = fixed.outcome {
        warn!(passes, "rules did not converge; keeping the last tree");
    }
    if fixed.is_changed() && fixed.source != source {
        info!(rules = ?fixed.changed_rules, dry_run = options.dry_run, "fixed");
        if !options.dry_run {
            fs::write(path, &fixed.source).map_err(|e| TugstyleError::io(path, e))?;
        }
    }
    Ok(FileReport::fixed(path, &fixed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugstyle_core::ModuleConfig;

    #[test]
    fn test_fix_source() {
        let registry = RuleRegistry::build([ModuleConfig::new("EmptyStatement")]);
        let result = fix_source(
            "class A { void f() { g();; } }",
            &mut registry.instantiate(),
            &Scheduler::default(),
        )
        .unwrap();
        assert_eq!(result.source, "class A { void f() { g(); } }");
        assert!(result.is_changed());
        assert!(result.outcome.is_converged());
        assert_eq!(
            result.changed_rules.into_iter().collect::<Vec<_>>(),
            ["EmptyStatement"]
        );
    }

    #[test]
    fn test_fix_source_parse_error() {
        let err = fix_source("class {", &mut [], &Scheduler::default()).unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::ApplyError);
    }
}
