use std::{fs, path::PathBuf};

use tempfile::tempdir;

use railmap_cli::{Args, run};

/// Workspace directory holding the demo documents
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args(input: &PathBuf, output: &PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        region: None,
        config: None,
        pretty: false,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_json_files(demos_dir());
    assert!(!valid_demos.is_empty(), "No demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!(
            "{}.out.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        match run(&args(demo_path, &output_path)) {
            Ok(()) => {
                let written = fs::read_to_string(&output_path).unwrap();
                let value: serde_json::Value = serde_json::from_str(&written).unwrap();
                assert!(value["lines"].is_array(), "{} has no lines", demo_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_json_files(demos_dir().join("errors"));
    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.out.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        if run(&args(demo_path, &output_path)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        assert!(!output_path.exists(), "no output is written for a failed import");
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that succeeded unexpectedly:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) should have failed but succeeded",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_shanghai_demo_content() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_dir().join("shanghai_demo.json");
    let output = temp_dir.path().join("shanghai.json");

    let mut args = args(&input, &output);
    args.region = Some("default".to_string());
    args.pretty = true;
    run(&args).expect("demo should import");

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();

    let lines = value["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["name"], "Line 1");
    assert_eq!(lines[1]["name"], "Line 2");

    let red_names: Vec<&str> = lines[0]["stations"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|station| station["name"].as_str())
        .collect();
    assert_eq!(
        red_names,
        vec!["Harbour", "Market Street", "People's Square", "North Gate"]
    );

    let square = value["stations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|station| station["name"] == "People's Square")
        .unwrap();
    assert_eq!(square["isTransfer"], true);
    assert_eq!(square["lines"].as_array().map(Vec::len), Some(2));
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("absent.json");
    let output = temp_dir.path().join("out.json");

    assert!(run(&args(&input, &output)).is_err());
}
