//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn segmenter() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("explanation_segmenter").unwrap()
}

#[test]
fn extracts_requested_keys_from_text() {
    segmenter()
        .args(["--input", "tests/fixtures/soplos.txt", "--keys", "b,C", "--no-save"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "B: Soplo sistólico eyectivo: Se ausculta en foco aórtico, irradiado al cuello, sin relación con el ductus.",
        ))
        .stdout(predicate::str::contains("C: (no explanation)"))
        .stdout(predicate::str::contains("Típico del ductus").not());
}

#[test]
fn question_bank_feedback_skips_correct_option() {
    segmenter()
        .args(["--input", "tests/fixtures/question_bank.json", "--no-save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ped-017] B (correct): La alimentación complementaria se inicia a los 6 meses."))
        .stdout(predicate::str::contains(
            "[ped-017] D (incorrect): Iniciar la alimentación complementaria después de los 6 meses se asocia a déficit de hierro.",
        ))
        .stdout(predicate::str::contains("[18] B (incorrect): Soplo holosistólico en borde esternal izquierdo bajo."))
        .stdout(predicate::str::contains("[18] C (correct): (no explanation)"))
        .stdout(predicate::str::contains("[18] E (incorrect): (no explanation)"));
}

#[test]
fn writes_reports_and_debug_html() {
    let out = TempDir::new().unwrap();

    segmenter()
        .arg("--input")
        .arg("tests/fixtures/question_bank.json")
        .arg("--output-dir")
        .arg(out.path())
        .arg("--debug")
        .assert()
        .success();

    let report_dir = out.path().join("question_bank");
    let feedback = std::fs::read_to_string(report_dir.join("question_bank_feedback.json")).unwrap();
    let feedback: serde_json::Value = serde_json::from_str(&feedback).unwrap();
    assert_eq!(feedback.as_array().unwrap().len(), 2);
    assert_eq!(feedback[0]["explained"], 4);

    let meta = std::fs::read_to_string(report_dir.join("question_bank_meta.json")).unwrap();
    assert!(meta.contains("\"questions\": 2"));
    assert!(report_dir.join("debug").join("ped-017_annotated.html").exists());
    assert!(report_dir.join("debug").join("18_annotated.html").exists());
}

#[test]
fn min_body_chars_flag_hides_short_bodies() {
    segmenter()
        .args(["--input", "tests/fixtures/soplos.txt", "--keys", "D", "--min-body-chars", "500", "--no-save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("D: (no explanation)"));
}

#[test]
fn invalid_key_is_rejected() {
    segmenter()
        .args(["--input", "tests/fixtures/soplos.txt", "--keys", "Z", "--no-save"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid option key 'Z'"));
}

#[test]
fn text_without_markers_fails() {
    segmenter()
        .args(["--input", "tests/fixtures/sin_marcadores.txt", "--no-save"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No option markers found"));
}

#[test]
fn missing_input_file_fails() {
    segmenter()
        .args(["--input", "tests/fixtures/does_not_exist.txt", "--no-save"])
        .assert()
        .failure();
}
