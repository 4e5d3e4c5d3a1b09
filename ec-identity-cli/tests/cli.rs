use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;

#[test]
fn valid_cedula_exits_zero() {
    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.arg("ci").arg("2222222222");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2222222222: valid"));
}

#[test]
fn any_invalid_value_exits_one() {
    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.arg("ci").arg("2222222222").arg("2222222223");

    let output_pred = predicate::str::contains("2222222222: valid").and(
        predicate::str::contains("2222222223: invalid (ci: Step 11: Stage 'complement-compare'"),
    );
    cmd.assert().code(1).stdout(output_pred);
}

#[test]
fn ruc_natural_reports_embedded_cedula_failure() {
    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.arg("ruc-natural").arg("2222222222001").arg("1717430101001");

    let output_pred = predicate::str::contains("2222222222001: valid").and(
        predicate::str::contains("1717430101001: invalid (ci: Step 10"),
    );
    cmd.assert().code(1).stdout(output_pred);
}

#[test]
fn json_format_reports_each_value() {
    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.args(["ci", "2222222222", "1", "--format", "json"]);

    let output = cmd.assert().code(1).get_output().stdout.clone();
    let reports: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["profile"], "ci");
    assert_eq!(reports[0]["valid"], true);
    assert!(reports[0]["reason"].is_null());
    assert_eq!(reports[1]["value"], "1");
    assert_eq!(reports[1]["valid"], false);
    assert!(reports[1]["reason"]
        .as_str()
        .unwrap()
        .contains("pattern-match"));
    assert!(reports[1].get("trace").is_none());
}

#[test]
fn trace_prints_final_document() {
    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.args(["ci", "2222222222", "--trace"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("checksum=8 check_digit=2"));
}

#[test]
fn set_override_changes_the_pipeline() {
    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.args(["ci", "2222222222", "--set", "ci.province-list=17"]);

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("region-membership"));
}

#[test]
fn config_file_is_layered_over_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[ci]\nprovince-list = \"17\"").unwrap();

    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.arg("ci")
        .arg("1710034065")
        .arg("2222222222")
        .arg("--config")
        .arg(file.path());

    let output_pred = predicate::str::contains("1710034065: valid")
        .and(predicate::str::contains("2222222222: invalid"));
    cmd.assert().code(1).stdout(output_pred);
}

#[test]
fn malformed_property_exits_two() {
    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.args(["ci", "2222222222", "--set", "ci.index-list=0,one"]);

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("ci.index-list"));
}

#[test]
fn missing_config_file_exits_two() {
    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.args(["ci", "2222222222", "--config", "/nonexistent/ec-identity.toml"]);

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn unknown_profile_exits_two() {
    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.args(["passport", "2222222222"]);

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown profile 'passport'"));
}

#[test]
fn list_profiles() {
    let mut cmd = cargo_bin_cmd!("ec-identity");
    cmd.arg("--list-profiles");

    let output_pred =
        predicate::str::contains("ci").and(predicate::str::contains("ruc-natural"));
    cmd.assert().success().stdout(output_pred);
}
