//! Integration tests for the gbx CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd against
//! the sample catalog that `gbx init` seeds.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get a gbx command isolated from the user's environment
fn gbx(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gbx").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("GBX_DATA_DIR")
        .env_remove("GBX_LOAD_TYPE")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    gbx(tmp.path()).arg("init").assert().success();
    tmp
}

fn stdout_json(tmp: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = gbx(tmp.path()).args(args).args(["-f", "json"]).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    gbx(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("candidates"))
        .stdout(predicate::str::contains("select"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    gbx(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gbx"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    gbx(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gbx"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();
    gbx(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized gbx project"));

    assert!(tmp.path().join(".gbx/config.yaml").is_file());
    assert!(tmp.path().join("data/motors.json").is_file());
    assert!(tmp.path().join("data/reducers.json").is_file());
}

#[test]
fn test_init_twice_suggests_force() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn test_missing_catalog_fails_with_hint() {
    let tmp = TempDir::new().unwrap();
    gbx(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("motors"));
}

#[test]
fn test_explicit_project_must_exist() {
    let tmp = TempDir::new().unwrap();
    gbx(tmp.path())
        .args(["validate", "--project", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a gbx project"));
}

// ============================================================================
// Catalog Browsing Tests
// ============================================================================

#[test]
fn test_validate_reports_counts() {
    let tmp = setup_test_project();
    let summary = stdout_json(&tmp, &["validate"]);
    assert_eq!(summary["motors"], 4);
    assert_eq!(summary["reducers"], 5);
    assert_eq!(summary["bushings"], 2);
}

#[test]
fn test_validate_from_subdirectory() {
    let tmp = setup_test_project();
    let nested = tmp.path().join("work/notes");
    fs::create_dir_all(&nested).unwrap();

    gbx(&nested)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_motor_list_filters_by_brand() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["motor", "list", "--brand", "acme", "--count"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_motor_list_filters_by_category() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["motor", "list", "--category", "ax-s", "--count"])
        .assert()
        .success()
        .stdout("2\n");

    gbx(tmp.path())
        .args(["motor", "list", "-c", "BL-M", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("M0003"))
        .stdout(predicate::str::contains("M0001").not());
}

#[test]
fn test_motor_show_by_model_name() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["motor", "show", "ax-750"])
        .assert()
        .success()
        .stdout(predicate::str::contains("M0001"))
        .stdout(predicate::str::contains("8-30-45-M3"));
}

#[test]
fn test_motor_show_unknown_fails() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["motor", "show", "NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No motor found"));
}

#[test]
fn test_reducer_list_for_motor() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["reducer", "list", "--motor", "M0001", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GPB042"))
        .stdout(predicate::str::contains("bushing B0814"))
        .stdout(predicate::str::contains("GPB090").not())
        .stdout(predicate::str::contains("GHR060").not());
}

#[test]
fn test_ratios_for_motor() {
    let tmp = setup_test_project();
    let options = stdout_json(&tmp, &["ratios", "--motor", "M0001"]);
    let ratios: Vec<f64> = options["ratios"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_f64().unwrap())
        .collect();
    assert_eq!(ratios, vec![5.0, 10.0, 25.0, 50.0]);
}

// ============================================================================
// Selection Tests
// ============================================================================

#[test]
fn test_candidates_ranked_suitable_first() {
    let tmp = setup_test_project();
    let candidates = stdout_json(&tmp, &["candidates", "--motor", "M0001", "--ratio", "10"]);
    let models: Vec<&str> = candidates
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["reducer"]["modelName"].as_str().unwrap())
        .collect();
    assert_eq!(models, vec!["GPB060", "GSG060", "GPB042"]);
    assert_eq!(candidates[0]["suitability"], "suitable");
    assert_eq!(candidates[2]["suitability"], "unsuitable");
}

#[test]
fn test_candidates_table_output() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["candidates", "-m", "M0001", "-r", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("300.0"))
        .stdout(predicate::str::contains("candidate(s) found"));
}

#[test]
fn test_candidates_invalid_ratio() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["candidates", "-m", "M0001", "-r", "ten"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ratio"));
}

#[test]
fn test_select_json_result() {
    let tmp = setup_test_project();
    let result = stdout_json(
        &tmp,
        &["select", "--motor", "M0001", "--reducer", "GPB060", "--ratio", "10"],
    );
    assert_eq!(result["outputRPM"], 300.0);
    assert_eq!(result["suitability"], "suitable");
    assert_eq!(result["bushing"]["code"], "B0814");
    assert_eq!(result["adapter"]["code"], "8-30-45-M3");
    assert_eq!(result["adapter"]["matchedBy"], "exact");
}

#[test]
fn test_select_heavy_shock_downgrades() {
    let tmp = setup_test_project();
    let result = stdout_json(
        &tmp,
        &[
            "select", "-m", "M0001", "-g", "GSG060", "-r", "10", "--load-type", "heavy-shock",
        ],
    );
    assert_eq!(result["loadFactor"], 2.0);
    assert_eq!(result["suitability"], "unsuitable");
}

#[test]
fn test_select_load_type_from_project_config() {
    let tmp = setup_test_project();
    fs::write(tmp.path().join(".gbx/config.yaml"), "load_type: moderate-shock\n").unwrap();

    let result = stdout_json(&tmp, &["select", "-m", "M0001", "-g", "GPB060", "-r", "10"]);
    assert_eq!(result["loadFactor"], 1.5);
}

#[test]
fn test_select_rejects_incompatible_shaft() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["select", "-m", "M0003", "-g", "GPB042", "-r", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not fit"));
}

#[test]
fn test_select_rejects_unoffered_ratio() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["select", "-m", "M0001", "-g", "GPB042", "-r", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not offered"));
}

#[test]
fn test_select_writes_report() {
    let tmp = setup_test_project();
    let report = tmp.path().join("quote.md");

    gbx(tmp.path())
        .args(["select", "-m", "M0001", "-g", "GPB042", "-r", "10", "--report"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("UNSUITABLE"));

    let content = fs::read_to_string(&report).unwrap();
    assert!(content.contains("# Gearbox Quote Request"));
    assert!(content.contains("GPB042"));
    assert!(content.contains("No bushing required"));
    assert!(content.contains("GPB042-L1-(8-30-45-M3).PDF"));
}

// ============================================================================
// Parts Tests
// ============================================================================

#[test]
fn test_adapter_exact_match() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["adapter", "-m", "M0001", "-g", "GPB042"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SV1"))
        .stdout(predicate::str::contains("8-30-45-M3"))
        .stdout(predicate::str::contains("exact"));
}

#[test]
fn test_adapter_servo_fallback_for_untapped_motor() {
    let tmp = setup_test_project();
    let adapter = stdout_json(&tmp, &["adapter", "-m", "M0002", "-g", "GPB060"]);
    assert_eq!(adapter["code"], "14-50-70-M4");
    assert_eq!(adapter["matchedBy"], "servo_preferred");
}

#[test]
fn test_adapter_none_registered() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["adapter", "-m", "M0002", "-g", "GPB042"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No adapter registered"));
}

#[test]
fn test_bushing_lookup() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["bushing", "8", "14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B0814"));

    gbx(tmp.path())
        .args(["bushing", "19", "14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("larger than"));
}

#[test]
fn test_drawings_show() {
    let tmp = setup_test_project();
    gbx(tmp.path())
        .args(["drawings", "show", "-m", "M0001", "-g", "GPB042", "-r", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pdf/GPB/GPB042-L1-(8-30-45-M3).PDF"))
        .stdout(predicate::str::contains("dwg/GPB/GPB042-L1-(8-30-45-M3).STEP"));
}

#[test]
fn test_drawings_index_from_folder() {
    let tmp = setup_test_project();
    let root = tmp.path().join("cad");
    fs::create_dir_all(root.join("pdf/GPB")).unwrap();
    fs::create_dir_all(root.join("dwg/GPB")).unwrap();
    fs::write(root.join("pdf/GPB/GPB042-L1-(8-30-45-M3).PDF"), b"").unwrap();
    fs::write(root.join("dwg/GPB/GPB042-L1-(8-30-45-M3).STEP"), b"").unwrap();
    fs::write(root.join("pdf/GPB/readme.txt"), b"").unwrap();
    let output = tmp.path().join("index.json");

    gbx(tmp.path())
        .args(["drawings", "index"])
        .arg(&root)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 2 file(s)"));

    let index: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        index["GPB|042|L1|8|M3"]["pdf"][0],
        "pdf/GPB/GPB042-L1-(8-30-45-M3).PDF"
    );
}

// ============================================================================
// Import Tests
// ============================================================================

#[test]
fn test_import_template() {
    let tmp = TempDir::new().unwrap();
    gbx(tmp.path())
        .args(["import", "bushings", "--template"])
        .assert()
        .success()
        .stdout("bushing_code,shaft_mm,hole_mm\n");
}

#[test]
fn test_import_bushings_replaces_dataset() {
    let tmp = setup_test_project();
    let csv = tmp.path().join("bushings.csv");
    fs::write(
        &csv,
        "busing_id,bushing_code,shaft_mm,hole_mm,len_mm\n1,B0819,8,19,22\n2,,6,8,10\n",
    )
    .unwrap();

    gbx(tmp.path())
        .args(["import", "bushings"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Records written:  1"))
        .stdout(predicate::str::contains("Skipped:"));

    gbx(tmp.path())
        .args(["bushing", "8", "19"])
        .assert()
        .success()
        .stdout(predicate::str::contains("B0819"));
}

#[test]
fn test_import_dry_run_writes_nothing() {
    let tmp = setup_test_project();
    let before = fs::read_to_string(tmp.path().join("data/bushings.json")).unwrap();
    let csv = tmp.path().join("bushings.csv");
    fs::write(&csv, "bushing_code,shaft_mm,hole_mm\nB0819,8,19\n").unwrap();

    gbx(tmp.path())
        .args(["import", "bushings", "--dry-run"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run complete"));

    let after = fs::read_to_string(tmp.path().join("data/bushings.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_import_duplicate_bushings_fails() {
    let tmp = setup_test_project();
    let csv = tmp.path().join("bushings.csv");
    fs::write(&csv, "bushing_code,shaft_mm,hole_mm\nB1,8,14\nB2,8,14\n").unwrap();

    gbx(tmp.path())
        .args(["import", "bushings"])
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate bushing"));
}
