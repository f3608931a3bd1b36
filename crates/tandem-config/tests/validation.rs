use std::fs;
use std::path::Path;

use serde_json::json;
use tandem_config::{
    validate_fs, BuildMode, BuildPlan, FsValidator, PlanError, PlanValidator, ProjectConfig, Stage,
};
use tempfile::TempDir;

fn scaffold(root: &Path) {
    let web = root.join("web");
    fs::create_dir_all(&web).unwrap();
    fs::write(web.join("web.tsx"), "import '@/styles.less';\n").unwrap();
    fs::write(web.join("background.ts"), "export {};\n").unwrap();
    fs::write(web.join("worker.ts"), "import init from '@wasm/app';\n").unwrap();
    fs::write(web.join("web.html"), "<!doctype html><div id=\"root\"></div>\n").unwrap();
}

#[test]
fn scaffolded_project_passes_in_both_modes() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path());
    let config = ProjectConfig::at(temp.path());

    for mode in [BuildMode::Development, BuildMode::Production] {
        let plan = BuildPlan::for_mode(mode, &config).unwrap();
        FsValidator.validate(&plan).unwrap();
    }
}

#[test]
fn missing_entry_names_target_and_chunk() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path());
    fs::remove_file(temp.path().join("web/worker.ts")).unwrap();

    let plan = BuildPlan::for_mode(BuildMode::Production, &ProjectConfig::at(temp.path())).unwrap();
    match validate_fs(&plan).unwrap_err() {
        PlanError::EntryNotFound { target, chunk, path } => {
            assert_eq!(target, "worker");
            assert_eq!(chunk, "worker");
            assert_eq!(path, temp.path().join("web/worker.ts"));
        }
        other => panic!("expected EntryNotFound, got {other:?}"),
    }
}

#[test]
fn missing_template_is_reported() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path());
    fs::remove_file(temp.path().join("web/web.html")).unwrap();

    let plan = BuildPlan::for_mode(BuildMode::Development, &ProjectConfig::at(temp.path())).unwrap();
    let err = validate_fs(&plan).unwrap_err();
    assert!(matches!(err, PlanError::TemplateNotFound { .. }));
    assert_eq!(err.stage(), Stage::Validation);
}

#[test]
fn entry_without_transform_rule_is_uncovered() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path());
    fs::write(temp.path().join("web/worker.rs"), "fn main() {}\n").unwrap();

    let mut config = ProjectConfig::from_value(json!({
        "targets": { "worker": { "entries": { "worker": "web/worker.rs" } } }
    }))
    .unwrap();
    config.layout.root = temp.path().to_path_buf();

    let plan = BuildPlan::for_mode(BuildMode::Production, &config).unwrap();
    let err = validate_fs(&plan).unwrap_err();
    assert!(
        matches!(err, PlanError::UncoveredEntry { ref chunk, .. } if chunk == "worker"),
        "got {err:?}"
    );
}

#[test]
fn entry_under_node_modules_is_uncovered() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path());
    let vendored = temp.path().join("node_modules/ui-kit");
    fs::create_dir_all(&vendored).unwrap();
    fs::write(vendored.join("index.ts"), "export {};\n").unwrap();

    let mut config = ProjectConfig::from_value(json!({
        "targets": { "main": { "entries": { "background": "node_modules/ui-kit/index.ts" } } }
    }))
    .unwrap();
    config.layout.root = temp.path().to_path_buf();

    let plan = BuildPlan::for_mode(BuildMode::Production, &config).unwrap();
    assert!(matches!(
        validate_fs(&plan).unwrap_err(),
        PlanError::UncoveredEntry { .. }
    ));
}
