//! Integration tests for CLI commands.
//!
//! These run the built binary against the fixture stylesheets.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kss-parser"))
        .args(args)
        .current_dir(fixtures())
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run kss-parser")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// ============================================================================
// sections
// ============================================================================

mod sections_command {
    use super::*;

    #[test]
    fn test_lists_sections_in_order() {
        let output = run(&["sections", "css"]);
        assert!(output.status.success());

        let text = stdout(&output);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Base styles."));
        assert!(lines[1].contains("2.1.1"));
        assert!(lines[2].contains("A button suitable for giving stars to someone."));
    }

    #[test]
    fn test_prefix_and_json() {
        let output = run(&["sections", "css", "--prefix", "2", "--format", "json"]);
        assert!(output.status.success());

        let value: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("Invalid JSON");
        let sections = value.as_array().expect("Expected array");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["title"], "Your standard form button.");
    }

    #[test]
    fn test_variable_flag() {
        let output = run(&[
            "show",
            "2.2.1",
            "css",
            "--var",
            "$test-variable=42",
            "--format",
            "json",
        ]);
        assert!(output.status.success());

        let value: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("Invalid JSON");
        assert_eq!(value["description"], "The value of the test variable: 42");
    }
}

// ============================================================================
// show / tree / check
// ============================================================================

mod other_commands {
    use super::*;

    #[test]
    fn test_show_html() {
        let output = run(&["show", "2.1.1", "css", "--format", "html"]);
        assert!(output.status.success());

        let html = stdout(&output);
        assert!(html.contains("<h2>Your standard form button.</h2>"));
        assert!(html.contains("language-html"));
    }

    #[test]
    fn test_show_missing_section_fails() {
        let output = run(&["show", "9.9", "css"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Section not found"));
    }

    #[test]
    fn test_tree_includes_grouping_nodes() {
        let output = run(&["tree", "css"]);
        assert!(output.status.success());

        let text = stdout(&output);
        assert!(text.lines().any(|l| l.trim() == "2 2"));
        assert!(text.contains("2.2.1 1 - A button suitable for giving stars to someone."));
    }

    #[test]
    fn test_check_reports_counts() {
        let output = run(&["check", "merge"]);
        assert!(output.status.success());
        assert_eq!(
            stdout(&output).trim(),
            "OK: 2 sections, 1 extends and 1 replaces merged"
        );
    }

    #[test]
    fn test_check_fails_on_duplicates() {
        let output = run(&["check", "scss", "less"]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Duplicate reference"));
    }

    #[test]
    fn test_extension_flag() {
        let output = run(&["check", "scss", "--ext", "css"]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("OK: 0 sections"));
    }
}
