//! CLI integration tests for stackplan
//!
//! These tests drive the binary end to end: load a deployment document,
//! synthesize the stack, and assert on the rendered template and the
//! graph/outputs/validate views.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command instance for the stackplan binary
fn stackplan_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("stackplan"))
}

/// Writes a file into the temp directory and returns its path
fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const BASIC_DOC: &str = r#"
app_name = "mail"
index_name = "mail-events"
"#;

const NETWORKS_FILE: &str = r#"
[[networks]]
name = "core-network"
id = "net-0a1b2c3d"
security_group = "sg-11aa22bb"

[[networks.subnets]]
id = "subnet-egress-1"
class = "private_with_egress"

[[networks.subnets]]
id = "subnet-egress-2"
class = "private_with_egress"
"#;

/// Runs a command and parses its stdout as JSON
fn json_stdout(assert: assert_cmd::assert::Assert) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    serde_json::from_str(&stdout).unwrap()
}

// =============================================================================
// Synth Tests
// =============================================================================

#[test]
fn test_synth_renders_template() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", BASIC_DOC);

    let assert = stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .args(["--format", "json"])
        .assert()
        .success();

    let template = json_stdout(assert);
    assert_eq!(template["app_name"], "mail");
    assert_eq!(template["fingerprint"].as_str().unwrap().len(), 16);
    assert_eq!(template["resources"].as_array().unwrap().len(), 6);
    assert_eq!(template["outputs"].as_array().unwrap().len(), 6);
}

#[test]
fn test_synth_text_prints_pretty_json() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", BASIC_DOC);

    stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"app_name\": \"mail\""))
        .stdout(predicate::str::contains("SearchCluster"));
}

#[test]
fn test_synth_writes_template_file() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", BASIC_DOC);
    let out = dir.path().join("template.json");

    stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote template to"));

    let content = fs::read_to_string(&out).unwrap();
    let template: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(template["app_name"], "mail");
}

#[test]
fn test_synth_cluster_properties() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        &dir,
        "deploy.toml",
        r#"
app_name = "mail"
index_name = "mail-events"
version = "1.2"

[capacity]
data_nodes = 4
"#,
    );

    let assert = stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .args(["--format", "json"])
        .assert()
        .success();

    let template = json_stdout(assert);
    let resources = template["resources"].as_array().unwrap();
    let cluster = resources
        .iter()
        .find(|r| r["id"] == "SearchCluster")
        .unwrap();

    assert_eq!(cluster["properties"]["name"], "mail-search-cluster");
    assert_eq!(cluster["properties"]["version"], "1.2");
    assert_eq!(cluster["properties"]["capacity"]["data_nodes"], 4);
    assert_eq!(cluster["properties"]["enforce_https"], true);
}

#[test]
fn test_synth_event_filters_projected_in_document_order() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        &dir,
        "deploy.toml",
        r#"
app_name = "mail"
index_name = "mail-events"

[event_type_filters]
Bounce = true
Complaint = false
Delivery = true
"#,
    );

    let assert = stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .args(["--format", "json"])
        .assert()
        .success();

    let template = json_stdout(assert);
    let resources = template["resources"].as_array().unwrap();
    let route = resources.iter().find(|r| r["id"] == "EventRoute").unwrap();

    assert_eq!(
        route["properties"]["matching_event_types"],
        serde_json::json!(["Bounce", "Delivery"])
    );
}

// =============================================================================
// Networking Tests
// =============================================================================

#[test]
fn test_synth_with_networking() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        &dir,
        "deploy.toml",
        r#"
app_name = "mail"
index_name = "mail-events"
networking_enabled = true
network_name = "core-network"
"#,
    );
    let networks = write_file(&dir, "networks.toml", NETWORKS_FILE);

    let assert = stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .arg("--networks")
        .arg(&networks)
        .args(["--format", "json"])
        .assert()
        .success();

    let template = json_stdout(assert);
    let resources = template["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 7);

    let cluster = resources
        .iter()
        .find(|r| r["id"] == "SearchCluster")
        .unwrap();
    assert_eq!(
        cluster["properties"]["network"]["subnet_ids"],
        serde_json::json!(["subnet-egress-1", "subnet-egress-2"])
    );
    assert_eq!(
        cluster["depends_on"],
        serde_json::json!(["SearchServiceLinkedRole"])
    );
}

#[test]
fn test_unknown_network_fails() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        &dir,
        "deploy.toml",
        r#"
app_name = "mail"
index_name = "mail-events"
networking_enabled = true
network_name = "ghost-network"
"#,
    );
    let networks = write_file(&dir, "networks.toml", NETWORKS_FILE);

    stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .arg("--networks")
        .arg(&networks)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no virtual network named 'ghost-network'",
        ));
}

#[test]
fn test_missing_network_name_fails() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        &dir,
        "deploy.toml",
        r#"
app_name = "mail"
index_name = "mail-events"
networking_enabled = true
"#,
    );

    stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "missing required option 'network_name'",
        ));
}

// =============================================================================
// Config Resolution Tests
// =============================================================================

#[test]
fn test_missing_app_name_fails() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", "index_name = \"mail-events\"\n");

    stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required option 'app_name'"));
}

#[test]
fn test_invalid_app_name_fails() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        &dir,
        "deploy.toml",
        "app_name = \"Mail\"\nindex_name = \"mail-events\"\n",
    );

    stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "must start with a lowercase letter",
        ));
}

#[test]
fn test_unknown_subnet_class_fails_even_without_networking() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        &dir,
        "deploy.toml",
        r#"
app_name = "mail"
index_name = "mail-events"
subnet_class = "dmz"
"#,
    );

    stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown subnet class 'dmz'"));
}

#[test]
fn test_unknown_version_falls_back_to_latest() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        &dir,
        "deploy.toml",
        r#"
app_name = "mail"
index_name = "mail-events"
version = "9.9"
"#,
    );

    let assert = stackplan_cmd()
        .arg("validate")
        .arg(&doc)
        .args(["--format", "json"])
        .assert()
        .success();

    let report = json_stdout(assert);
    assert_eq!(report["valid"], true);
    assert_eq!(report["version"], "1.3");
}

#[test]
fn test_defaults_file_overrides_baseline() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", BASIC_DOC);
    let defaults = write_file(&dir, "defaults.toml", "logging_enabled = false\n");

    let assert = stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .arg("--defaults")
        .arg(&defaults)
        .args(["--format", "json"])
        .assert()
        .success();

    let template = json_stdout(assert);
    let resources = template["resources"].as_array().unwrap();
    let pipeline = resources
        .iter()
        .find(|r| r["id"] == "DeliveryPipeline")
        .unwrap();
    assert!(pipeline["properties"]["destination"]
        .get("log_sink")
        .is_none());
}

#[test]
fn test_malformed_document_fails_with_context() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", "app_name = [not toml\n");

    stackplan_cmd()
        .arg("synth")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse deployment document"));
}

// =============================================================================
// Graph / Outputs / Validate Views
// =============================================================================

#[test]
fn test_graph_lists_creation_order() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", BASIC_DOC);

    let assert = stackplan_cmd()
        .arg("graph")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 resource(s) in creation order"));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let pos = |needle: &str| stdout.find(needle).unwrap();
    assert!(pos("SearchCluster") < pos("DeliveryPipeline"));
    assert!(pos("DeliveryPipeline") < pos("EventSource"));
    assert!(pos("EventSource") < pos("EventRoute"));
}

#[test]
fn test_graph_json_includes_edges() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", BASIC_DOC);

    let assert = stackplan_cmd()
        .arg("graph")
        .arg(&doc)
        .args(["--format", "json"])
        .assert()
        .success();

    let nodes = json_stdout(assert);
    let pipeline = nodes
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == "DeliveryPipeline")
        .unwrap();
    assert_eq!(
        pipeline["depends_on"],
        serde_json::json!(["SearchCluster", "PipelineAccessRole", "BackupBucket"])
    );
}

#[test]
fn test_outputs_lists_fixed_names() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", BASIC_DOC);

    stackplan_cmd()
        .arg("outputs")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("mail-pipeline-access-urn"))
        .stdout(predicate::str::contains("mail-search-cluster-endpoint"))
        .stdout(predicate::str::contains("${SearchCluster.endpoint}"))
        .stdout(predicate::str::contains("6 output(s)"));
}

#[test]
fn test_validate_reports_effective_settings() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", BASIC_DOC);

    stackplan_cmd()
        .arg("validate")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration valid"))
        .stdout(predicate::str::contains("mail-search-cluster"))
        .stdout(predicate::str::contains("direct_put"));
}

#[test]
fn test_validate_json_reports_counts() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", BASIC_DOC);

    let assert = stackplan_cmd()
        .arg("validate")
        .arg(&doc)
        .args(["--format", "json"])
        .assert()
        .success();

    let report = json_stdout(assert);
    assert_eq!(report["valid"], true);
    assert_eq!(report["app_name"], "mail");
    assert_eq!(report["resources"], 6);
    assert_eq!(report["outputs"], 6);
    assert_eq!(report["networking_enabled"], false);
}

#[test]
fn test_verbose_diagnostics_on_stderr() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(&dir, "deploy.toml", BASIC_DOC);

    stackplan_cmd()
        .arg("--verbose")
        .arg("validate")
        .arg(&doc)
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:synth]"));
}
