use std::fs;
use std::path::Path;
use std::process::Command;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_adr-checklist-pdf"))
}

fn output_dir() -> &'static Path {
    Path::new("tests/output")
}

fn setup() {
    fs::create_dir_all(output_dir()).expect("Failed to create output directory");
}

fn cleanup_file(name: &str) {
    let path = output_dir().join(name);
    if path.exists() {
        fs::remove_file(&path).ok();
    }
}

#[test]
fn test_full_record_saves_to_directory() {
    setup();
    let output_file = "SMITH_JANE_ADR_12252025.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "--input", "tests/fixtures/full.json",
            "--dir", "tests/output",
            "--downloads", "tests/output",
            "--date", "2025-12-25",
            "--config", "tests/output/unused-config.json",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Saved to"), "Expected save notification: {}", stdout);

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");

    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small, likely empty or corrupt");
}

#[test]
fn test_empty_record_still_renders() {
    setup();
    let record_path = output_dir().join("empty-record.json");
    fs::write(&record_path, "{}").expect("Failed to write record");
    let output_file = "UNKNOWN_ADR_11302025.pdf";
    cleanup_file(output_file);

    let output = cargo_bin()
        .args([
            "--input", "tests/output/empty-record.json",
            "--dir", "tests/output",
            "--downloads", "tests/output",
            "--date", "2025-11-30",
            "--config", "tests/output/unused-config.json",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pages: 1"), "Empty record should fit one page: {}", stdout);

    let path = output_dir().join(output_file);
    assert!(path.exists(), "PDF file was not created");

    let metadata = fs::metadata(&path).expect("Failed to get file metadata");
    assert!(metadata.len() > 1000, "PDF file is too small");
}

#[test]
fn test_unavailable_directory_falls_back_to_download() {
    setup();
    let downloads = output_dir().join("downloads");
    fs::create_dir_all(&downloads).expect("Failed to create downloads directory");
    let output_file = "SMITH_JANE_ADR_10012025.pdf";
    fs::remove_file(downloads.join(output_file)).ok();

    let output = cargo_bin()
        .args([
            "--input", "tests/fixtures/full.json",
            "--dir", "tests/output/does-not-exist",
            "--downloads", "tests/output/downloads",
            "--date", "2025-10-01",
            "--config", "tests/output/unused-config.json",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Fallback should not fail the run: {:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Downloaded"), "Expected download notification: {}", stdout);

    assert!(downloads.join(output_file).exists(), "Fallback PDF was not created");
}

#[test]
fn test_remembered_directory_is_used_on_later_runs() {
    setup();
    let remembered = output_dir().join("remembered");
    fs::create_dir_all(&remembered).expect("Failed to create remembered directory");
    let config = "tests/output/remember-config.json";
    fs::remove_file(config).ok();

    let first = cargo_bin()
        .args([
            "--input", "tests/fixtures/full.json",
            "--dir", "tests/output/remembered",
            "--remember",
            "--downloads", "tests/output",
            "--date", "2025-09-02",
            "--config", config,
        ])
        .output()
        .expect("Failed to execute command");
    assert!(first.status.success(), "Command failed: {:?}", first);

    // No --dir this time; the remembered preference should route the save.
    let second = cargo_bin()
        .args([
            "--input", "tests/fixtures/full.json",
            "--downloads", "tests/output",
            "--date", "2025-09-03",
            "--config", config,
        ])
        .output()
        .expect("Failed to execute command");
    assert!(second.status.success(), "Command failed: {:?}", second);

    assert!(
        remembered.join("SMITH_JANE_ADR_09032025.pdf").exists(),
        "Remembered directory was not used"
    );
}

#[test]
fn test_invalid_date_format() {
    let output = cargo_bin()
        .args([
            "--input", "tests/fixtures/full.json",
            "--date", "not-a-date",
            "--downloads", "tests/output",
            "--config", "tests/output/unused-config.json",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for invalid date");
}

#[test]
fn test_missing_record_file() {
    let output = cargo_bin()
        .args([
            "--input", "nonexistent.json",
            "--downloads", "tests/output",
            "--config", "tests/output/unused-config.json",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Command should have failed for missing record");
}
