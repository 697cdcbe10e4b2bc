use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command; // Run programs
use tempfile::tempdir; // Create temporary directories for testing

fn roads_rule_file() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("rules/roads.ron")
}

// Two interchangeable tiles: every run succeeds without retries.
fn create_loose_rules(dir: &tempfile::TempDir) -> PathBuf {
    let file_path = dir.path().join("loose.ron");
    let rules_content = r#"
        (
            tiles: [
                (name: "alpha", weight: 1.0, edges: (north: "x", east: "x", south: "x", west: "x")),
                (name: "beta", weight: 1.0, edges: (north: "x", east: "x", south: "x", west: "x")),
            ],
        )
        "#;
    fs::write(&file_path, rules_content).expect("Failed to write rule file");
    file_path
}

fn tile_forge() -> Command {
    let mut cmd = Command::cargo_bin("tile-forge").expect("binary is built");
    cmd.env("RUST_LOG", "info").env("NO_COLOR", "1");
    cmd
}

fn read_rows(path: &Path) -> Vec<Vec<usize>> {
    fs::read_to_string(path)
        .expect("output exists")
        .lines()
        .map(|line| {
            line.split(' ')
                .map(|id| id.parse().expect("tile id"))
                .collect()
        })
        .collect()
}

#[test]
fn test_roads_text_output() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let output_file = tmp_dir.path().join("roads.txt");

    tile_forge()
        .arg("--rule-file")
        .arg(roads_rule_file())
        .args(["--width", "6", "--height", "4", "--seed", "3", "--max-attempts", "50"])
        .arg("--output-path")
        .arg(&output_file)
        .assert()
        .success()
        .stderr(predicate::str::contains("Tile Forge App Finished"));

    let rows = read_rows(&output_file);
    assert_eq!(rows.len(), 4);
    for row in rows {
        assert_eq!(row.len(), 6);
        assert!(row.iter().all(|&id| id < 7));
    }
    Ok(())
}

#[test]
fn test_json_output() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let rule_file = create_loose_rules(&tmp_dir);
    let output_file = tmp_dir.path().join("grid.json");

    tile_forge()
        .arg("-r")
        .arg(&rule_file)
        .args(["--width", "3", "--height", "2", "--output-format", "json"])
        .arg("-o")
        .arg(&output_file)
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output_file)?)?;
    assert_eq!(value["width"], 3);
    assert_eq!(value["height"], 2);
    assert_eq!(value["complete"], true);
    assert_eq!(value["rows"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn test_seeded_runs_match() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let first = tmp_dir.path().join("first.txt");
    let second = tmp_dir.path().join("second.txt");

    for output in [&first, &second] {
        tile_forge()
            .arg("-r")
            .arg(roads_rule_file())
            .args(["--width", "8", "--height", "8", "--seed", "77", "--max-attempts", "50"])
            .arg("-o")
            .arg(output)
            .assert()
            .success();
    }

    assert_eq!(fs::read_to_string(first)?, fs::read_to_string(second)?);
    Ok(())
}

#[test]
fn test_environment_overrides_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let rule_file = create_loose_rules(&tmp_dir);
    let output_file = tmp_dir.path().join("env.txt");

    tile_forge()
        .env("TILE_FORGE_WIDTH", "3")
        .env("TILE_FORGE_HEIGHT", "2")
        .env("TILE_FORGE_OUTPUT_PATH", &output_file)
        .env("TILE_FORGE_RULE_FILE", &rule_file)
        .assert()
        .success();

    let rows = read_rows(&output_file);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.len() == 3));
    Ok(())
}

#[test]
fn test_config_file_is_applied() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let rule_file = create_loose_rules(&tmp_dir);
    let output_file = tmp_dir.path().join("from_toml.txt");
    let config_file = tmp_dir.path().join("forge.toml");
    fs::write(
        &config_file,
        format!(
            "width = 5\nheight = 1\noutput_path = {:?}\n",
            output_file.display().to_string()
        ),
    )?;

    tile_forge()
        .arg("-r")
        .arg(&rule_file)
        .arg("--config")
        .arg(&config_file)
        .assert()
        .success();

    let rows = read_rows(&output_file);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 5);
    Ok(())
}

#[test]
fn test_contradictions_exhaust_attempts() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let rule_file = tmp_dir.path().join("stuck.json");
    fs::write(
        &rule_file,
        r#"{"tiles": [{"name": "stuck", "weight": 1.0,
            "edges": {"north": "n", "east": "e", "south": "s", "west": "w"}}]}"#,
    )?;
    let output_file = tmp_dir.path().join("never.txt");

    tile_forge()
        .arg("-r")
        .arg(&rule_file)
        .args(["--width", "1", "--height", "2", "--max-attempts", "2"])
        .arg("-o")
        .arg(&output_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("all 2 attempts ended in a contradiction"));

    assert!(!output_file.exists());
    Ok(())
}

#[test]
fn test_missing_rule_file_fails() {
    tile_forge()
        .args(["-r", "does/not/exist.ron"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load rule file"));
}

#[test]
fn test_terminal_visualization() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let rule_file = create_loose_rules(&tmp_dir);

    tile_forge()
        .arg("-r")
        .arg(&rule_file)
        .args(["--width", "4", "--height", "2", "--visualization-mode", "terminal"])
        .arg("-o")
        .arg(tmp_dir.path().join("viz.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("--- 4x2 grid, 8 of 8 cells collapsed ---"));
    Ok(())
}
