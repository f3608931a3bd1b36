//! Per-target overrides and the composition contract.

use serde_json::json;
use tandem_config::{
    build_base, compose, BuildMode, BuildPlan, PlanError, PluginAssembler, ProjectConfig,
    ProjectLayout, Stage, TargetSpec,
};

fn config_with(targets: serde_json::Value) -> ProjectConfig {
    let mut config = ProjectConfig::from_value(json!({ "targets": targets })).unwrap();
    config.layout.root = "/srv/app".into();
    config
}

fn composition_field(err: &PlanError) -> &str {
    match err {
        PlanError::Composition { field, .. } => field,
        other => panic!("expected composition error, got {other:?}"),
    }
}

#[test]
fn shared_fields_cannot_be_overridden() {
    for field in ["output", "resolution", "transformRules", "plugins", "mode"] {
        let config = config_with(json!({ "main": { field: {} } }));
        let err = BuildPlan::for_mode(BuildMode::Production, &config).unwrap_err();
        assert_eq!(composition_field(&err), field);
        assert!(err.to_string().contains("shadows a shared field"));
        assert_eq!(err.stage(), Stage::TargetComposition);
    }
}

#[test]
fn unlisted_field_is_rejected() {
    let config = config_with(json!({ "worker": { "publicPath": "/static" } }));
    let err = BuildPlan::for_mode(BuildMode::Development, &config).unwrap_err();
    assert_eq!(composition_field(&err), "publicPath");
    assert!(err.to_string().contains("not overridable"));
}

#[test]
fn worker_cannot_move_to_browser() {
    let config = config_with(json!({ "worker": { "runtimeEnvironment": "browser" } }));
    let err = BuildPlan::for_mode(BuildMode::Production, &config).unwrap_err();
    assert_eq!(composition_field(&err), "runtimeEnvironment");
}

#[test]
fn worker_cannot_gain_a_dev_server() {
    let config = config_with(json!({ "worker": { "devServer": { "port": 4000 } } }));
    let err = BuildPlan::for_mode(BuildMode::Development, &config).unwrap_err();
    assert_eq!(composition_field(&err), "devServer");
}

#[test]
fn main_dev_server_cannot_be_removed() {
    for mode in [BuildMode::Development, BuildMode::Production] {
        let config = config_with(json!({ "main": { "devServer": null } }));
        let err = BuildPlan::for_mode(mode, &config).unwrap_err();
        assert_eq!(composition_field(&err), "devServer");
        assert!(err.to_string().contains("required on the main target"));
    }
}

#[test]
fn main_cannot_move_to_worker_scope() {
    let config = config_with(json!({ "main": { "runtimeEnvironment": "isolatedWorker" } }));
    let err = BuildPlan::for_mode(BuildMode::Production, &config).unwrap_err();
    assert_eq!(composition_field(&err), "runtimeEnvironment");
    assert_eq!(err.stage(), Stage::TargetComposition);
}

#[test]
fn isolation_headers_cannot_be_replaced() {
    let config = config_with(json!({
        "main": { "devServer": { "headers": { "Cross-Origin-Opener-Policy": "unsafe-none" } } }
    }));
    let err = BuildPlan::for_mode(BuildMode::Development, &config).unwrap_err();
    assert_eq!(composition_field(&err), "devServer.headers");
}

#[test]
fn extra_chunks_are_rejected() {
    let config = config_with(json!({ "main": { "entries": { "admin": "web/admin.tsx" } } }));
    let err = BuildPlan::for_mode(BuildMode::Production, &config).unwrap_err();
    assert_eq!(composition_field(&err), "entries");
}

#[test]
fn experiments_can_be_switched_per_target() {
    let config = config_with(json!({ "worker": { "experiments": { "asyncWebAssembly": true } } }));
    let plan = BuildPlan::for_mode(BuildMode::Production, &config).unwrap();
    assert!(plan.worker().unwrap().experiments.async_web_assembly);
    assert!(plan.main().unwrap().experiments.async_web_assembly);
}

#[test]
fn absolute_entry_override_is_kept() {
    let config = config_with(json!({ "main": { "entries": { "web": "/opt/ui/index.tsx" } } }));
    let plan = BuildPlan::for_mode(BuildMode::Production, &config).unwrap();
    let main = plan.main().unwrap();
    assert_eq!(main.entries["web"], std::path::PathBuf::from("/opt/ui/index.tsx"));
    assert_eq!(
        main.entries["background"],
        std::path::PathBuf::from("/srv/app/web/background.ts")
    );
}

#[test]
fn compose_rejects_unknown_spec_name() {
    let layout = ProjectLayout::at("/srv/app");
    let base = build_base(&layout).unwrap();
    let mut spec = TargetSpec::worker(&layout);
    spec.name = "service".into();

    let err = compose(&base, BuildMode::Production, spec, &PluginAssembler::new(&layout)).unwrap_err();
    assert!(matches!(
        err,
        PlanError::UnknownTarget { ref name, stage: Stage::TargetComposition } if name == "service"
    ));
}

#[test]
fn devtool_follows_mode() {
    let config = ProjectConfig::at("/srv/app");
    let dev = BuildPlan::for_mode(BuildMode::Development, &config).unwrap();
    let prod = BuildPlan::for_mode(BuildMode::Production, &config).unwrap();
    for target in &dev.targets {
        assert_eq!(target.devtool.as_deref(), Some("eval-source-map"));
        assert_eq!(target.mode, BuildMode::Development);
    }
    for target in &prod.targets {
        assert_eq!(target.devtool, None);
    }
}
