//! Java source file discovery.
//!
//! Walks one or more roots for `*.java` files, skipping VCS and build
//! output directories. Results are sorted so batch runs are deterministic.

use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobMatcher};
use walkdir::WalkDir;

use crate::error::ConfigError;

/// Directory names never descended into.
const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".gradle",
    ".idea",
    "build",
    "node_modules",
    "out",
    "target",
];

#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Keep only files whose path relative to the root, or whose name,
    /// matches this glob.
    pub glob: Option<String>,
    /// Stop after this many files.
    pub limit: Option<usize>,
    pub follow_links: bool,
}

/// Collect the Java files under `roots`.
///
/// A root that is itself a file is returned as is when it passes the
/// filters, whatever its extension.
pub fn discover_java_files(
    roots: &[PathBuf],
    options: &DiscoveryOptions,
) -> Result<Vec<PathBuf>, ConfigError> {
    let matcher = options
        .glob
        .as_deref()
        .map(|pattern| {
            Glob::new(pattern)
                .map(|g| g.compile_matcher())
                .map_err(|e| ConfigError::InvalidGlob {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })
        })
        .transpose()?;

    let mut files = Vec::new();
    for root in roots {
        if root.is_file() {
            if glob_accepts(matcher.as_ref(), root, root) {
                files.push(root.clone());
            }
            continue;
        }
        if !root.exists() {
            return Err(ConfigError::MissingFile { path: root.clone() });
        }

        for entry in WalkDir::new(root)
            .follow_links(options.follow_links)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !should_exclude(e.path()))
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                ConfigError::Io {
                    path,
                    source: e.into(),
                }
            })?;
            if !entry.file_type().is_file() || !is_java(entry.path()) {
                continue;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if glob_accepts(matcher.as_ref(), entry.path(), relative) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    if let Some(limit) = options.limit {
        files.truncate(limit);
    }
    Ok(files)
}

fn is_java(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "java")
}

fn should_exclude(path: &Path) -> bool {
    match path.components().next_back() {
        Some(Component::Normal(name)) => {
            let name = name.to_string_lossy();
            DEFAULT_EXCLUDE_DIRS.contains(&name.as_ref())
        }
        _ => false,
    }
}

fn glob_accepts(matcher: Option<&GlobMatcher>, path: &Path, relative: &Path) -> bool {
    let Some(matcher) = matcher else {
        return true;
    };
    matcher.is_match(relative) || path.file_name().is_some_and(|name| matcher.is_match(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "class A {}\n").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/main/java/com/acme/App.java");
        touch(dir.path(), "src/main/java/com/acme/Util.java");
        touch(dir.path(), "src/test/java/com/acme/AppTest.java");
        touch(dir.path(), "build/generated/Gen.java");
        touch(dir.path(), ".git/Hook.java");
        touch(dir.path(), "README.md");
        dir
    }

    #[test]
    fn test_walks_java_files_sorted() {
        let dir = fixture();
        let files = discover_java_files(&[dir.path().to_path_buf()], &DiscoveryOptions::default())
            .unwrap();
        assert_eq!(
            names(dir.path(), &files),
            vec![
                "src/main/java/com/acme/App.java",
                "src/main/java/com/acme/Util.java",
                "src/test/java/com/acme/AppTest.java",
            ]
        );
    }

    #[test]
    fn test_glob_and_limit() {
        let dir = fixture();
        let options = DiscoveryOptions {
            glob: Some("src/main/**".to_string()),
            ..Default::default()
        };
        let files = discover_java_files(&[dir.path().to_path_buf()], &options).unwrap();
        assert_eq!(files.len(), 2);

        let options = DiscoveryOptions {
            glob: Some("*Test.java".to_string()),
            ..Default::default()
        };
        let files = discover_java_files(&[dir.path().to_path_buf()], &options).unwrap();
        assert_eq!(names(dir.path(), &files), vec!["src/test/java/com/acme/AppTest.java"]);

        let options = DiscoveryOptions {
            limit: Some(1),
            ..Default::default()
        };
        let files = discover_java_files(&[dir.path().to_path_buf()], &options).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_file_root() {
        let dir = fixture();
        let file = dir.path().join("src/main/java/com/acme/App.java");
        let files = discover_java_files(&[file.clone()], &DiscoveryOptions::default()).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_root_and_bad_glob() {
        let err = discover_java_files(
            &[PathBuf::from("/nonexistent/tugstyle/root")],
            &DiscoveryOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));

        let options = DiscoveryOptions {
            glob: Some("[".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            discover_java_files(&[], &options),
            Err(ConfigError::InvalidGlob { .. })
        ));
    }
}
