//! End-to-end integration test for the default project layout
//!
//! Exercises the complete flow: config loading -> phase preset -> checks ->
//! written log, using the built-in export and phase locations.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use trace_core::{ConfigResolver, Outcome, RunOverrides, Verifier};
use trace_fs::NormalizedPath;

const APPROVAL_DIR: &str = "analysis/timesheet_process/phases/03-approval";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A project laid out the way the built-in defaults expect.
fn setup_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(
        root,
        &format!("{}/docs/TRACE.md", APPROVAL_DIR),
        "# Approval trace\n\
         \n\
         1. Workflow (567358311) notifies the approver.\n\
         2. WF-07 567358422 escalates after 48h.\n\
         3. The approval module (99999999) renders the grid.\n\
         4. Portal hjpetro-23317211 hosts the workflows.\n",
    );
    write(root, "data/raw/workflows/v4-flow-567358311.json", "{}");
    write(root, "data/raw/workflows/workflow-567358422-v4.json", "{}");

    write(
        root,
        &format!("{}/agents/approval_ui/assets/asset-inventory.json", APPROVAL_DIR),
        r#"{"modules": [{"name": "approval_grid"}], "forms": [{"name": "Approval Request"}]}"#,
    );
    fs::create_dir_all(
        root.join("data/raw/hubspot-cms-assets/Timesheets-Theme/modules/approval_grid"),
    )
    .unwrap();
    write(
        root,
        "data/raw/hubspot-cms-api/forms/cms_forms_data.json",
        r#"{"results": [{"name": "Approval Request"}, {"name": "Timesheet Entry"}]}"#,
    );

    write(
        root,
        &format!("{}/agents/approval_ui/properties/property-mapping.json", APPROVAL_DIR),
        r#"{"objects": {"hj_approvals": {"approval_status": {"type": "enumeration"}, "approver_email": {}}}}"#,
    );
    write(
        root,
        "data/raw/ai-context/ai-context-export/data-model/hj_approvals-schema-2-26103010.json",
        r#"{"schema": {"results": [{"name": "approval_status"}, {"name": "approver_email"}]}}"#,
    );

    temp
}

#[test]
fn test_default_layout_passes() {
    let temp = setup_project();
    let resolver = ConfigResolver::new(NormalizedPath::new(temp.path()));

    let config = resolver.resolve(&RunOverrides::for_phase("approval")).unwrap();
    assert!(config.expect_workflows);

    let summary = Verifier::new(config).run().unwrap();

    assert_eq!(summary.report.outcome(), Outcome::Pass);
    assert_eq!(
        summary.report.reference_ids.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["567358311", "567358422"]
    );
    assert!(summary.warnings.is_empty());

    let relative = summary.log_path.relative_to(resolver.root());
    assert!(
        relative
            .as_str()
            .starts_with(&format!("{}/verification/logs/phase-verification-", APPROVAL_DIR))
    );

    let log = fs::read_to_string(summary.log_path.to_native()).unwrap();
    assert!(log.contains("Workflows referenced in trace: 567358311, 567358422\n"));
    assert!(log.contains("All referenced workflows found."));
    assert!(log.contains("All referenced modules/forms located in exports."));
    assert!(log.contains("All properties from property-mapping files found in schema exports."));
    assert!(log.ends_with("Verification completed successfully.\n"));
}

#[test]
fn test_project_config_overrides_defaults() {
    let temp = setup_project();
    let root = temp.path();
    fs::rename(root.join("data/raw/workflows"), root.join("exports-v2")).unwrap();
    write(
        root,
        "trace-verify.toml",
        "[exports]\nworkflows = \"exports-v2\"\n\n[phases.approval]\nlog_dir = \"logs/approval\"\n",
    );

    let resolver = ConfigResolver::new(NormalizedPath::new(root));
    let summary = Verifier::new(resolver.resolve(&RunOverrides::for_phase("approval")).unwrap())
        .run()
        .unwrap();

    assert_eq!(summary.report.outcome(), Outcome::Pass);
    assert!(
        summary
            .log_path
            .relative_to(resolver.root())
            .as_str()
            .starts_with("logs/approval/phase-verification-")
    );
}

#[test]
fn test_local_config_wins_over_project_config() {
    let temp = setup_project();
    let root = temp.path();
    write(root, "trace-verify.toml", "[exports]\nworkflows = \"nowhere\"\n");
    write(
        root,
        "trace-verify.local.toml",
        "[exports]\nworkflows = \"data/raw/workflows\"\n",
    );

    let resolver = ConfigResolver::new(NormalizedPath::new(root));
    let report = Verifier::new(resolver.resolve(&RunOverrides::for_phase("approval")).unwrap())
        .verify()
        .unwrap();

    assert!(report.workflow_issues.is_empty());
}

#[test]
fn test_drift_in_every_category_fails() {
    let temp = setup_project();
    let root = temp.path();
    fs::remove_file(root.join("data/raw/workflows/workflow-567358422-v4.json")).unwrap();
    write(
        root,
        "data/raw/hubspot-cms-api/forms/cms_forms_data.json",
        r#"{"results": [{"name": "Timesheet Entry"}]}"#,
    );
    write(
        root,
        "data/raw/ai-context/ai-context-export/data-model/hj_approvals-schema-2-26103010.json",
        r#"{"properties": [{"name": "approval_status"}]}"#,
    );

    let resolver = ConfigResolver::new(NormalizedPath::new(root));
    let summary = Verifier::new(resolver.resolve(&RunOverrides::for_phase("approval")).unwrap())
        .run()
        .unwrap();
    let report = &summary.report;

    assert_eq!(report.outcome(), Outcome::Fail);
    assert_eq!(report.outcome().exit_code(), 1);
    assert_eq!(report.total_discrepancies(), 3);
    assert_eq!(report.workflow_issues[0].message, "Workflow 567358422 missing export file.");
    assert_eq!(report.cms_issues[0].message, "Form not found in export: Approval Request");
    assert!(
        report.property_issues[0]
            .message
            .starts_with("Properties missing in schema for hj_approvals: approver_email (source: ")
    );

    let log = fs::read_to_string(summary.log_path.to_native()).unwrap();
    assert!(log.ends_with("Verification completed with discrepancies. See issues above.\n"));
}
