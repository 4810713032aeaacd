//! Cassette replay integration tests, zero network I/O.
//!
//! Provider calls are served from `STYLE_STUDIO_REPLAY` cassettes, so the
//! binary never contacts a live API endpoint.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Absolute path to the `test_fixtures` directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures")
}

/// Fresh, empty project directory for one test.
fn project_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("style_studio_replay_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Command bound to `project`, replaying `cassette` when given.
fn cmd(project: &Path, cassette: Option<&str>) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("style-studio");
    cmd.env("STYLE_STUDIO_PROJECT_DIR", project)
        .env("STYLE_STUDIO_CONFIG", project.join("missing-config.toml"))
        .env_remove("GOOGLE_AI_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("STYLE_STUDIO_REC");
    match cassette {
        Some(name) => cmd.env("STYLE_STUDIO_REPLAY", fixtures_dir().join(name)),
        None => cmd.env_remove("STYLE_STUDIO_REPLAY"),
    };
    cmd
}

#[test]
fn brief_prints_treatment_and_progress() {
    let dir = project_dir("brief");

    cmd(&dir, Some("brief_dragon.cassette.yaml"))
        .args(["brief", "Dragon in a sandbox, sad"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kodak Portra 400"))
        .stderr(predicate::str::contains("Treatment generated successfully!"));

    cmd(&dir, None)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dragon in a sandbox, sad"))
        .stdout(predicate::str::contains("Color Grade: Muted teal shadows"));
}

#[test]
fn brief_to_studio_to_render() {
    let dir = project_dir("full_flow");
    let out = dir.join("render.png");

    cmd(&dir, Some("brief_dragon.cassette.yaml"))
        .args(["brief", "Dragon in a sandbox, sad"])
        .assert()
        .success();

    cmd(&dir, None)
        .arg("send-to-studio")
        .assert()
        .success()
        .stderr(predicate::str::contains("Treatment sent to studio."));

    cmd(&dir, Some("studio_render.cassette.yaml"))
        .args(["studio", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Render complete!"))
        .stderr(predicate::str::contains("Saved:"));

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..8], &PNG_MAGIC, "Output should be a valid PNG file");

    cmd(&dir, None)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Studio prompt:      Lighting: Overcast"))
        .stdout(predicate::str::contains("Latest render:      set"));
}

#[test]
fn render_auto_filename_in_working_directory() {
    let dir = project_dir("autofile");
    let work_dir = dir.join("work");
    std::fs::create_dir_all(&work_dir).unwrap();

    cmd(&dir, Some("studio_render.cassette.yaml"))
        .args(["studio", "a ferry at dusk"])
        .current_dir(&work_dir)
        .assert()
        .success();

    let files: Vec<_> = std::fs::read_dir(&work_dir).unwrap().flatten().collect();
    assert_eq!(files.len(), 1, "Exactly one file should be created");
    let name = files[0].file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("style-studio-render-"), "unexpected filename: {name}");
    assert!(name.ends_with(".png"), "unexpected filename: {name}");
}

#[test]
fn gallery_exports_converted_render_and_deletes_it() {
    let dir = project_dir("gallery");
    let exported = dir.join("export.jpg");

    cmd(&dir, Some("studio_render.cassette.yaml"))
        .args(["studio", "--output", dir.join("render.png").to_str().unwrap(), "a ferry at dusk"])
        .assert()
        .success();

    cmd(&dir, None)
        .args(["gallery", "--export", exported.to_str().unwrap(), "--format", "jpeg"])
        .assert()
        .success();
    let data = std::fs::read(&exported).unwrap();
    assert_eq!(&data[..2], &[0xFF, 0xD8], "Export should be a JPEG file");

    cmd(&dir, None)
        .args(["gallery", "--delete"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Render deleted."));
    cmd(&dir, None).arg("gallery").assert().success().stderr(predicate::str::contains("Gallery is empty."));
}

#[test]
fn text_only_image_response_reports_model_reply() {
    let dir = project_dir("no_image");

    cmd(&dir, Some("studio_no_image.cassette.yaml"))
        .args(["studio", "a ferry at dusk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No image was generated"))
        .stderr(predicate::str::contains("unable to draw it"));
}

#[test]
fn quota_error_is_rate_limited() {
    let dir = project_dir("quota");

    cmd(&dir, Some("quota_exceeded.cassette.yaml"))
        .args(["brief", "a lighthouse keeper"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rate limit exceeded. Please try again later."));
}

#[test]
fn rewrite_apply_replaces_studio_prompt() {
    let dir = project_dir("rewrite");

    // Seed the studio prompt; the render itself is not under test here.
    cmd(&dir, Some("studio_render.cassette.yaml"))
        .args(["studio", "--output", dir.join("seed.png").to_str().unwrap(), "a neon street"])
        .assert()
        .success();

    cmd(&dir, Some("rewrite_neon.cassette.yaml"))
        .args(["rewrite", "--apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cinestill 800T"))
        .stderr(predicate::str::contains("Initializing rewriter..."))
        .stderr(predicate::str::contains("Rewrite complete!"))
        .stderr(predicate::str::contains("Studio prompt updated."));

    cmd(&dir, None)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Studio prompt:      Rain-slick asphalt"));
}
