use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn docseg() -> Command {
    Command::cargo_bin("docseg").expect("binary")
}

fn run_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn chunks_markdown_file_by_extension() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("guide.md");
    fs::write(&path, "# Guide\n\nIntro.\n\n## Install\n\nRun it.\n").unwrap();

    let body = run_json(docseg().arg("--quiet").arg("chunk").arg(&path));

    assert_eq!(body["chunker_used"], "markdown");
    assert_eq!(body["total_chunks"], 2);
    let second = &body["chunks"][1];
    assert_eq!(second["metadata"]["details"]["type"], "document");
    assert_eq!(second["metadata"]["details"]["section_path"], "Guide > Install");
    assert_eq!(second["metadata"]["kind"], "markdown");
}

#[test]
fn flat_flag_uses_plain_text_splitting() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("guide.md");
    fs::write(&path, "# Guide\n\nIntro.\n").unwrap();

    let body = run_json(docseg().args(["--quiet", "chunk", "--flat"]).arg(&path));
    assert_eq!(body["chunker_used"], "recursive");
}

#[test]
fn config_file_sets_options() {
    let temp = tempdir().unwrap();
    let doc = temp.path().join("notes.txt");
    fs::write(&doc, "word ".repeat(100)).unwrap();
    let config = temp.path().join("docseg.toml");
    fs::write(&config, "max_chunk_size = 100\noverlap = 0\n").unwrap();

    let body = run_json(
        docseg()
            .args(["--quiet", "chunk", "--config"])
            .arg(&config)
            .arg(&doc),
    );

    let chunks = body["chunks"].as_array().unwrap();
    assert!(chunks.len() >= 5);
    for chunk in chunks {
        assert!(chunk["content"].as_str().unwrap().len() <= 100);
    }
}

#[test]
fn reads_stdin_with_explicit_mime() {
    let body = run_json(
        docseg()
            .args(["--quiet", "chunk", "--mime", "text/x-rst", "-"])
            .write_stdin("Title\n=====\n\nBody.\n"),
    );
    assert_eq!(body["chunker_used"], "rst");
    assert_eq!(body["chunks"][0]["metadata"]["details"]["heading"], "Title");
}

#[test]
fn lists_chunkers_in_priority_order() {
    let body = run_json(docseg().args(["--quiet", "chunkers"]));
    let names: Vec<_> = body["chunkers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["rst", "asciidoc", "latex", "markdown", "recursive"]);
    assert_eq!(body["fallback"], "fallback");
}

#[test]
fn invalid_options_fail_with_message() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("a.txt");
    fs::write(&path, "text").unwrap();

    docseg()
        .args(["chunk", "--max-chunk-size", "0"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_chunk_size"));
}

#[test]
fn overlap_as_large_as_the_chunk_still_chunks() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("notes.txt");
    fs::write(&path, "word ".repeat(40)).unwrap();

    let body = run_json(
        docseg()
            .args(["--quiet", "chunk", "--max-chunk-size", "40", "--overlap", "40"])
            .arg(&path),
    );

    let chunks = body["chunks"].as_array().unwrap();
    assert!(chunks.len() > 1);
    for chunk in chunks {
        assert!(chunk["content"].as_str().unwrap().len() <= 40);
    }
}

#[test]
fn missing_file_is_reported() {
    docseg()
        .args(["--quiet", "chunk", "does-not-exist.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
