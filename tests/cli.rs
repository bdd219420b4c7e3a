use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stormgrid-cli-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn header_only_track_fails_without_output() {
    let dir = scratch_dir("empty");
    let track = dir.join("al012020.txt");
    fs::write(&track, "AL012020,            ARTHUR,     0,\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_plot-track"))
        .arg(&track)
        .arg("-o")
        .arg(&dir)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No track points found"), "stderr: {}", stderr);
    assert!(!dir.join("al012020.png").exists());
    assert!(!dir.join("al012020.pdf").exists());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_track_file_fails() {
    let dir = scratch_dir("missing");
    let output = Command::new(env!("CARGO_BIN_EXE_plot-track"))
        .arg(dir.join("nope.txt"))
        .arg("-o")
        .arg(&dir)
        .output()
        .unwrap();
    assert!(!output.status.success());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn track_is_written_in_both_formats() {
    let dir = scratch_dir("track");
    let track = dir.join("al092011.txt");
    fs::write(&track,
              "AL092011,              IRENE,     3,\n\
               20110821, 0000,  , TS, 15.0N,  59.0W,  45, 1006,\n\
               20110821, 0600,  , TS, 16.0N,  60.6W,  45, 1006,\n\
               20110821, 1200,  , TS, 16.8N,  62.2W,  45, 1005,\n")
        .unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_plot-track"))
        .arg(&track)
        .args(["--dpi", "40", "-o"])
        .arg(&dir)
        .status()
        .unwrap();
    assert!(status.success());

    let png = fs::read(dir.join("al092011.png")).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
    let pdf = fs::read(dir.join("al092011.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn circle_prints_json_summary() {
    let dir = scratch_dir("circle");
    let output = Command::new(env!("CARGO_BIN_EXE_plot-circle"))
        .args(["--json", "--dpi", "40", "-o"])
        .arg(&dir)
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["k"], 101);
    assert_eq!(summary["cutoff"], 2.0);
    assert_eq!(summary["inside"], 101);
    assert_eq!(summary["outside"], 8);
    // 40 dpi caps the page at 320x240; the square map crops the width.
    let (w, h) = image::image_dimensions(dir.join("example.png")).unwrap();
    assert_eq!(h, 240);
    assert!(w < 320);
    assert!(dir.join("example.pdf").exists());
    fs::remove_dir_all(&dir).unwrap();
}
