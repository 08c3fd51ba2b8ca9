use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

const ASSERTIONS: &str = r#"{
  "simulation": "com.acme.load.CheckoutSimulation",
  "assertions": [
    {
      "requestName": "authorize",
      "message": "authorize 95th percentile response time is less than 1000",
      "assertionType": "95th percentile response time",
      "status": false,
      "conditionValues": [1000],
      "values": [1200]
    }
  ]
}"#;

fn nonce() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

fn workspace_with_report() -> PathBuf {
    let ws = std::env::temp_dir().join(format!("loadtrend-ws-{}", nonce()));
    let js = ws.join("target/gatling/checkout-20240101120000/js");
    fs::create_dir_all(&js).unwrap();
    fs::write(js.join("global_stats.json"), "{}").unwrap();
    fs::write(js.join("assertions.json"), ASSERTIONS).unwrap();
    ws
}

fn analyze(ws: &Path, out: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("loadtrend");
    cmd.env_remove("BUILD_START_TIME").args([
        "analyze",
        "--workspace",
        ws.to_str().unwrap(),
        "--build-start",
        "2000-01-01T00:00:00Z",
        "--project-name",
        "Web_Performance_Tests-kappa-checkout",
        "--out",
        out.to_str().unwrap(),
    ]);
    cmd
}

#[test]
fn cli_analyze_writes_reports_and_exits_0() {
    let ws = workspace_with_report();
    let out = ws.join("out");

    analyze(&ws, &out)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "reports=1 assertions=1 failed=1 verdict=PERFORMANCE",
        ));

    assert!(out.join("report.json").exists());
    assert!(out.join("report.md").exists());
    let html = fs::read_to_string(out.join("description.html")).unwrap();
    assert_eq!(
        html,
        "<b>PERFORMANCE</b><br>authorize&nbsp;95th=1200,&nbsp;expect<1000;<br>"
    );

    let _ = fs::remove_dir_all(&ws);
}

#[test]
fn cli_analyze_exits_2_on_failed_verdict_when_asked() {
    let ws = workspace_with_report();
    let out = ws.join("out");

    analyze(&ws, &out).arg("--fail-on-verdict").assert().code(2);

    let _ = fs::remove_dir_all(&ws);
}

#[test]
fn cli_analyze_with_no_reports_archives_nothing() {
    let ws = std::env::temp_dir().join(format!("loadtrend-empty-{}", nonce()));
    fs::create_dir_all(&ws).unwrap();
    let out = ws.join("out");

    analyze(&ws, &out)
        .assert()
        .success()
        .stdout(predicate::str::contains("reports=0"));
    assert!(!out.join("report.json").exists());

    let _ = fs::remove_dir_all(&ws);
}

#[test]
fn cli_analyze_errors_on_missing_workspace() {
    let out = std::env::temp_dir().join(format!("loadtrend-out-{}", nonce()));
    analyze(Path::new("does-not-exist"), &out)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn cli_analyze_errors_without_build_start() {
    let mut cmd = cargo_bin_cmd!("loadtrend");
    cmd.env_remove("BUILD_START_TIME")
        .args(["analyze", "--workspace", "."]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no build start time"));
}

#[test]
fn cli_shift_rewrites_from_parameter() {
    let mut cmd = cargo_bin_cmd!("loadtrend");
    cmd.args([
        "shift",
        "--url",
        "http://g/render?target=a&from=00%3A00_20140101&title=t",
        "--days",
        "7",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("http://g/render?target=a&from="))
        .stdout(predicate::str::contains("00%3A00_20140101").not())
        .stdout(predicate::str::ends_with("&title=t\n"));
}

#[test]
fn cli_shift_invalid_offset_prints_url_unchanged() {
    let url = "http://g/render?target=a&from=00%3A00_20140101&title=t";
    let mut cmd = cargo_bin_cmd!("loadtrend");
    cmd.args(["shift", "--url", url, "--days", "A"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff(format!("{url}\n")));
}
