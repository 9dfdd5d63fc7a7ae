//! End-to-end tests: a Checkstyle configuration and Java sources on disk,
//! through the library entry points and the `tugstyle` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tugstyle::report::FileStatus;
use tugstyle::{fix_file, runner, FixOptions};
use tugstyle_core::{discover_java_files, CheckstyleConfig, DiscoveryOptions, Properties};
use tugstyle_rules::RuleRegistry;

const CONFIG: &str = r#"<?xml version="1.0"?>
<!DOCTYPE module PUBLIC
    "-//Checkstyle//DTD Checkstyle Configuration 1.3//EN"
    "https://checkstyle.org/dtds/configuration_1_3.dtd">
<module name="Checker">
    <module name="SuppressionFilter">
        <property name="file" value="${config_loc}/suppressions.xml"/>
    </module>
    <module name="TreeWalker">
        <module name="EmptyStatement"/>
        <module name="SimplifyBooleanExpression"/>
        <module name="JavadocMethod"/>
    </module>
</module>
"#;

const SUPPRESSIONS: &str = r#"<?xml version="1.0"?>
<suppressions>
    <suppress files="Generated\.java"/>
    <suppress files="Legacy\.java" checks="EmptyStatement"/>
</suppressions>
"#;

const MESSY: &str = "class C {\n    boolean f(boolean b) {\n        g();;\n        return b == true;\n    }\n}\n";
const TIDY: &str = "class C {\n    boolean f(boolean b) {\n        g();\n        return b;\n    }\n}\n";

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let project = Project { dir };
        project.write("config/checkstyle.xml", CONFIG);
        project.write("config/suppressions.xml", SUPPRESSIONS);
        project.write("src/Messy.java", MESSY);
        project.write("src/Tidy.java", TIDY);
        project.write("src/Generated.java", MESSY);
        project.write("src/Legacy.java", MESSY);
        project
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    fn options(&self, dry_run: bool) -> FixOptions {
        let config =
            CheckstyleConfig::load(&self.path("config/checkstyle.xml"), &Properties::new())
                .unwrap();
        let registry = RuleRegistry::from_config(&config, &[] as &[&str]);
        FixOptions {
            dry_run,
            ..FixOptions::new(registry, config.suppressions)
        }
    }

    fn sources(&self) -> Vec<PathBuf> {
        discover_java_files(&[self.path("src")], &DiscoveryOptions::default()).unwrap()
    }
}

fn status_of(report: &tugstyle::RunReport, name: &str) -> FileStatus {
    report
        .files
        .iter()
        .find(|f| Path::new(&f.path).ends_with(name))
        .map(|f| f.status)
        .unwrap()
}

#[test]
fn fix_writes_changed_files_and_honors_suppressions() {
    let project = Project::new();
    let options = project.options(false);
    assert_eq!(
        options.registry.names().collect::<Vec<_>>(),
        ["EmptyStatement", "SimplifyBooleanExpression"]
    );

    let report = runner::run(&project.sources(), &options);
    assert_eq!(status_of(&report, "Messy.java"), FileStatus::Fixed);
    assert_eq!(status_of(&report, "Tidy.java"), FileStatus::Unchanged);
    assert_eq!(status_of(&report, "Generated.java"), FileStatus::Suppressed);
    assert_eq!(status_of(&report, "Legacy.java"), FileStatus::Fixed);
    assert_eq!(report.summary.files, 4);
    assert_eq!(report.summary.failed, 0);

    assert_eq!(project.read("src/Messy.java"), TIDY);
    assert_eq!(project.read("src/Tidy.java"), TIDY);
    assert_eq!(project.read("src/Generated.java"), MESSY);
    // Only the boolean rule may touch Legacy.java.
    assert_eq!(
        project.read("src/Legacy.java"),
        "class C {\n    boolean f(boolean b) {\n        g();;\n        return b;\n    }\n}\n"
    );
}

#[test]
fn dry_run_reports_without_writing() {
    let project = Project::new();
    let options = project.options(true);
    let report = fix_file(&project.path("src/Messy.java"), &options).unwrap();
    assert_eq!(report.status, FileStatus::Fixed);
    assert_eq!(
        report.changed_rules,
        ["EmptyStatement", "SimplifyBooleanExpression"]
    );
    assert!(report.converged);
    assert_eq!(project.read("src/Messy.java"), MESSY);
}

#[test]
fn second_run_changes_nothing() {
    let project = Project::new();
    let options = project.options(false);
    let files = project.sources();
    runner::run(&files, &options);
    let again = runner::run(&files, &options);
    assert_eq!(again.summary.fixed, 0);
    assert_eq!(again.summary.unchanged, 3);
}

#[test]
fn unparseable_file_is_reported_and_left_alone() {
    let project = Project::new();
    project.write("src/Broken.java", "class Broken {\n");
    let report = runner::run(&project.sources(), &project.options(false));
    assert_eq!(status_of(&report, "Broken.java"), FileStatus::Failed);
    assert_eq!(status_of(&report, "Messy.java"), FileStatus::Fixed);
    assert_eq!(project.read("src/Broken.java"), "class Broken {\n");
}

fn tugstyle(project: &Project, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tugstyle"))
        .current_dir(project.dir.path())
        .env_remove("TUGSTYLE_LOG")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn check_command_exits_one_and_prints_json() {
    let project = Project::new();
    let output = tugstyle(
        &project,
        &["--config", "config/checkstyle.xml", "--json", "check", "src"],
    );
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["dry_run"], true);
    assert_eq!(value["summary"]["fixed"], 2);
    assert_eq!(value["summary"]["suppressed"], 1);
    assert_eq!(project.read("src/Messy.java"), MESSY);
}

#[test]
fn fix_command_exits_zero() {
    let project = Project::new();
    let output = tugstyle(
        &project,
        &[
            "--config",
            "config/checkstyle.xml",
            "--exclude",
            "SimplifyBooleanExpression",
            "fix",
            "src/Messy.java",
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("(EmptyStatement)"), "stdout: {stdout}");
    assert_eq!(
        project.read("src/Messy.java"),
        "class C {\n    boolean f(boolean b) {\n        g();\n        return b == true;\n    }\n}\n"
    );
}

#[test]
fn missing_config_exits_with_config_error() {
    let project = Project::new();
    let output = tugstyle(&project, &["--config", "nope.xml", "--json", "fix"]);
    assert_eq!(output.status.code(), Some(3));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["code"], 3);
}
