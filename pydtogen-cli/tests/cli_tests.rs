//! Command line tests for the pydtogen binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const EVENTS: &str = r#"
MPEvent:
  table: mp_event
  create_only_fields: [topic_name]
  columns:
    id: { type: INTEGER, primary_key: true }
    topic_name: { type: VARCHAR(64), nullable: false }
    message: { type: TEXT, nullable: false }
"#;

fn workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("events.yaml"), EVENTS).unwrap();
    temp_dir
}

fn pydtogen(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pydtogen").unwrap();
    cmd.current_dir(dir.path()).env("RUST_LOG", "error");
    cmd
}

#[test]
fn test_generate_to_stdout() {
    let dir = workspace();
    pydtogen(&dir)
        .args(["generate", "events.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("from pydantic import BaseModel, constr\n"))
        .stdout(predicate::str::contains("class MPEvent(BaseModel):\n    id: int\n"));
}

#[test]
fn test_generate_split_with_flags() {
    let dir = workspace();
    pydtogen(&dir)
        .args(["generate", "events.yaml", "--split", "--restrict", "id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("class MPEventCreate(MPEventBase):\n    topic_name: constr(max_length=64)\n"))
        .stdout(predicate::str::contains("class MPEventUpdate(BaseModel):\n    message: Optional[str] = None\n"));
}

#[test]
fn test_generate_uses_config_file() {
    let dir = workspace();
    fs::write(
        dir.path().join("pydtogen.toml"),
        "strict_types = true\nbase_model = \"app.schemas.Schema\"\n",
    )
    .unwrap();

    pydtogen(&dir)
        .args(["generate", "events.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from app.schemas import Schema\n"))
        .stdout(predicate::str::contains("    topic_name: StrictStr\n"));
}

#[test]
fn test_generate_to_file() {
    let dir = workspace();
    pydtogen(&dir)
        .args(["generate", "events.yaml", "--no-str-length", "-o", "out/models.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 1 table(s)"));

    let written = fs::read_to_string(dir.path().join("out/models.py")).unwrap();
    assert!(written.contains("    topic_name: str\n"));
    assert!(written.ends_with("\n"));
}

#[test]
fn test_unsupported_type_fails() {
    let dir = workspace();
    fs::write(
        dir.path().join("shapes.yaml"),
        "shape:\n  columns:\n    area: { type: GEOMETRY }\n",
    )
    .unwrap();

    pydtogen(&dir)
        .args(["generate", "shapes.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported column type 'GEOMETRY' for column 'shape.area'"));
}

#[test]
fn test_validate_reports_overlap() {
    let dir = workspace();
    pydtogen(&dir)
        .args(["validate", "events.yaml", "--split", "--create-only", "id"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("listed in more than one exclusion set"));

    pydtogen(&dir)
        .args(["validate", "events.yaml", "--split", "--create-only", "id", "--allow-overlap"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All tables are valid"));
}

#[test]
fn test_validate_prints_each_warning_once() {
    let dir = workspace();
    pydtogen(&dir)
        .env("RUST_LOG", "warn")
        .args(["validate", "events.yaml", "--split", "--read-only", "ghost"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lists unknown read-only field 'ghost'").count(1))
        .stderr(predicate::str::contains("ghost").not());
}

#[test]
fn test_validate_rejects_shadowing_class() {
    let dir = workspace();
    fs::write(
        dir.path().join("optional.yaml"),
        "optional:\n  columns:\n    id: { type: INTEGER, primary_key: true }\n    note: { type: TEXT }\n",
    )
    .unwrap();

    pydtogen(&dir)
        .args(["validate", "optional.yaml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Class 'Optional' shadows the 'Optional' imported from 'typing'"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = workspace();
    fs::write(dir.path().join("bad.toml"), "split_models = \"maybe\"\n").unwrap();

    pydtogen(&dir)
        .args(["generate", "events.yaml", "--config", "bad.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_types_lists_dialect() {
    let dir = workspace();
    pydtogen(&dir)
        .args(["types", "--dialect", "postgres"])
        .assert()
        .success()
        .stdout(predicate::str::contains("postgres:"))
        .stdout(predicate::str::contains("JSONB"))
        .stdout(predicate::str::contains("mysql:").not());
}
