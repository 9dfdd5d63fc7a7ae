//! Parallel batch runner.
//!
//! Files are fixed independently on the rayon thread pool. Each file gets
//! its own rule instances from the shared, read-only registry. A file that
//! fails is logged and reported; the others still run.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, error};

use crate::report::{FileReport, RunReport};
use crate::{fix_file, FixOptions};

/// Fix every file in `files`. Reports come back in input order.
pub fn run(files: &[PathBuf], options: &FixOptions) -> RunReport {
    debug!(
        files = files.len(),
        rules = options.registry.len(),
        dry_run = options.dry_run,
        "starting run"
    );
    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| match fix_file(path, options) {
            Ok(report) => report,
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to fix file");
                FileReport::failed(path, &err)
            }
        })
        .collect();
    RunReport::new(reports, options.dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::FileStatus;
    use std::fs;
    use tugstyle_core::ModuleConfig;
    use tugstyle_rules::RuleRegistry;

    #[test]
    fn test_failures_do_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("Good.java");
        let bad = dir.path().join("Bad.java");
        let missing = dir.path().join("Missing.java");
        fs::write(&good, "class Good { void f() { g();; } }").unwrap();
        fs::write(&bad, "class Bad {").unwrap();

        let registry = RuleRegistry::build([ModuleConfig::new("EmptyStatement")]);
        let options = FixOptions::new(registry, Default::default());
        let report = run(&[good.clone(), bad, missing], &options);

        let statuses: Vec<_> = report.files.iter().map(|f| f.status).collect();
        assert_eq!(
            statuses,
            [FileStatus::Fixed, FileStatus::Failed, FileStatus::Failed]
        );
        assert_eq!(report.summary.failed, 2);
        assert_eq!(
            fs::read_to_string(&good).unwrap(),
            "class Good { void f() { g(); } }"
        );
    }
}
