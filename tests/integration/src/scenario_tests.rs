//! Scenario tests for phases spread over several agents
//!
//! Each test builds a phase with [`PhaseFixture`], resolves it through a
//! project config file and checks the findings in the written log.

use std::fs;

use pretty_assertions::assert_eq;
use trace_core::{ConfigResolver, DiscrepancyKind, Outcome, RunOverrides, RunSummary, Verifier};
use trace_fs::NormalizedPath;
use trace_test_utils::PhaseFixture;

/// Point the `demo` phase at the fixture, appending `extra` TOML.
fn configure(fixture: &PhaseFixture, extra: &str) {
    fixture.write(
        "trace-verify.toml",
        &format!(
            "[exports]\n\
             workflows = \"exports/workflows\"\n\
             schemas = \"exports/schemas\"\n\
             cms_modules = \"exports/modules\"\n\
             cms_forms = \"exports/cms_forms_data.json\"\n\
             \n\
             [phases.demo]\n\
             trace = \"phase/docs/TRACE.md\"\n\
             phase_dir = \"phase\"\n\
             {}",
            extra
        ),
    );
}

fn run_demo(fixture: &PhaseFixture) -> RunSummary {
    let resolver = ConfigResolver::new(NormalizedPath::new(fixture.root()));
    let config = resolver.resolve(&RunOverrides::for_phase("demo")).unwrap();
    Verifier::new(config).run().unwrap()
}

fn messages(summary: &RunSummary) -> Vec<String> {
    summary
        .report
        .discrepancies()
        .map(|d| d.message.clone())
        .collect()
}

#[test]
fn test_multi_agent_phase_reports_per_part() {
    let fixture = PhaseFixture::new()
        .with_trace("Workflow (100200300) and workflow 100200301 drive this phase.\n")
        .with_workflow_export("v4-workflow-100200300.json")
        .with_workflow_export("workflow-100200301.json")
        .with_module("entry_grid")
        .with_forms(&["Timesheet Entry"])
        .with_inventory("agents/entry", &["entry_grid"], &["Timesheet Entry"])
        .with_inventory("agents/review/nested", &["review_panel"], &["Review Form"]);
    configure(&fixture, "");

    let summary = run_demo(&fixture);

    assert_eq!(summary.report.outcome(), Outcome::Fail);
    assert!(summary.report.workflow_issues.is_empty());
    assert_eq!(
        messages(&summary),
        vec![
            "CMS module missing: review_panel".to_string(),
            "Form not found in export: Review Form".to_string(),
        ]
    );
}

#[test]
fn test_configured_known_schema_is_used() {
    let fixture = PhaseFixture::new()
        .with_schema("tickets-export-v7.json", &["subject", "priority"])
        .with_forms(&[])
        .with_property_mapping("agents/support", &[("ticket", &["subject", "priority"])]);
    configure(&fixture, "\n[schemas.known]\nticket = \"tickets-export-v7.json\"\n");

    let summary = run_demo(&fixture);

    assert_eq!(summary.report.outcome(), Outcome::Pass, "{:?}", messages(&summary));
}

#[test]
fn test_fallback_scan_finds_plural_schema() {
    let fixture = PhaseFixture::new()
        .with_nested_schema("invoices_schema.json", &["amount", "due_date"])
        .with_property_mapping("agents/billing", &[("invoice", &["amount", "due_date", "currency"])]);
    configure(&fixture, "");

    let summary = run_demo(&fixture);

    let issues = &summary.report.property_issues;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, DiscrepancyKind::PropertyMissingInSchema);
    assert!(
        issues[0]
            .message
            .starts_with("Properties missing in schema for invoice: currency (source: ")
    );
}

#[test]
fn test_configured_portal_prefix_excludes_portal_numbers() {
    let fixture = PhaseFixture::new().with_trace(
        "Workflows live in portal acme-44556677.\n\
         Workflow (567358311) is the only real reference.\n",
    );
    configure(&fixture, "\n[extraction]\nportal_prefixes = [\"acme\"]\n");

    let summary = run_demo(&fixture);

    assert_eq!(
        summary.report.reference_ids.iter().cloned().collect::<Vec<_>>(),
        vec!["567358311".to_string()]
    );
    assert_eq!(messages(&summary)[0], "Workflow 567358311 missing export file.");
}

#[test]
fn test_portal_url_ids_are_not_workflows() {
    let fixture = PhaseFixture::new().with_trace(
        "See https://app.hubspot.com/workflows/23317211/platform/flow/567358311/edit\n",
    );
    configure(&fixture, "");

    let summary = run_demo(&fixture);

    assert!(!summary.report.reference_ids.contains("23317211"));
    assert!(summary.report.reference_ids.contains("567358311"));
}

#[test]
fn test_log_is_complete_even_when_everything_fails_to_load() {
    let fixture = PhaseFixture::new().with_trace("Workflow (100200300)\n");
    fixture.write("phase/a/assets/asset-inventory.json", "not json");
    fixture.write("phase/a/properties/property-mapping.json", "{\"objects\": []}");
    fixture.write("exports/cms_forms_data.json", "{");
    configure(&fixture, "");

    let summary = run_demo(&fixture);

    let kinds: Vec<DiscrepancyKind> = summary.report.discrepancies().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiscrepancyKind::WorkflowMissing,
            DiscrepancyKind::LoadError,
            DiscrepancyKind::LoadError,
            DiscrepancyKind::LoadError,
        ]
    );

    let log = fs::read_to_string(summary.log_path.to_native()).unwrap();
    assert!(log.contains("## Workflow Check"));
    assert!(log.contains("## CMS Asset Check"));
    assert!(log.contains("## Property Schema Check"));
    assert_eq!(log.matches("Failed to load ").count(), 3);
}

#[test]
fn test_repeated_runs_write_separate_identical_reports() {
    let fixture = PhaseFixture::new()
        .with_trace("Workflow (100200300)\n")
        .with_forms(&[]);
    configure(&fixture, "");

    let resolver = ConfigResolver::new(NormalizedPath::new(fixture.root()));
    let verifier = Verifier::new(resolver.resolve(&RunOverrides::for_phase("demo")).unwrap());
    let at = chrono::Utc::now();

    let first = verifier.verify_at(at).unwrap();
    let second = verifier.verify_at(at).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.render_markdown(), second.render_markdown());
    assert!(fixture.log_files().is_empty());
}
