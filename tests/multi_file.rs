//! Integration tests for assembling sections spread over several files.

use std::fs;
use std::path::Path;

use kss_parser::{KssError, Parser, StyleguideConfig};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create dir");
    }
    fs::write(path, content).expect("Failed to write file");
}

fn kss_block(title: &str, reference: &str) -> String {
    format!("// {}\n//\n// Styleguide {}\n.x {{}}\n\n", title, reference)
}

#[test]
fn test_alphabetic_references_sort_within_groups() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(
        temp_dir.path(),
        "buttons.scss",
        &[
            kss_block("Link button", "buttons.link"),
            kss_block("Buttons", "buttons"),
            kss_block("Fancy button", "buttons.fancy"),
        ]
        .concat(),
    );
    write(
        temp_dir.path(),
        "lists.scss",
        &[
            kss_block("Fancy list", "lists.fancy"),
            kss_block("Bullet list", "lists.bullet"),
        ]
        .concat(),
    );

    let document = Parser::new([temp_dir.path()])
        .parse()
        .expect("Failed to parse");
    let references: Vec<_> = document
        .iter_sorted_sections(None)
        .iter()
        .map(|s| s.reference().unwrap_or_default().to_string())
        .collect();

    assert_eq!(
        references,
        vec![
            "buttons",
            "buttons.fancy",
            "buttons.link",
            "lists.bullet",
            "lists.fancy"
        ]
    );
}

#[test]
fn test_tree_rebuild_is_stable() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(
        temp_dir.path(),
        "a.css",
        &[
            kss_block("Ten", "1.10"),
            kss_block("Two", "1.2"),
            kss_block("Named", "1.3:named"),
            kss_block("Other", "2.other"),
        ]
        .concat(),
    );

    let document = Parser::new([temp_dir.path()])
        .parse()
        .expect("Failed to parse");

    let numbering = || {
        let tree = document.tree();
        tree.iter_sorted_nodes()
            .into_iter()
            .map(|id| {
                (
                    tree.node(id).expect("Node missing").reference(),
                    tree.dotted_numbered_path(id),
                )
            })
            .collect::<Vec<_>>()
    };

    let first = numbering();
    assert_eq!(first, numbering());
    assert_eq!(
        first,
        vec![
            ("1".to_string(), "1".to_string()),
            ("1.2".to_string(), "1.1".to_string()),
            ("1.named".to_string(), "1.2".to_string()),
            ("1.10".to_string(), "1.3".to_string()),
            ("2".to_string(), "2".to_string()),
            ("2.other".to_string(), "2.1".to_string()),
        ]
    );
}

#[test]
fn test_duplicate_reference_across_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "a.css", &kss_block("First", "forms.input"));
    write(temp_dir.path(), "b.css", &kss_block("Second", "forms.5:input"));

    let result = Parser::new([temp_dir.path()]).parse();

    assert!(matches!(
        result,
        Err(KssError::DuplicateReference { reference, .. }) if reference == "forms.input"
    ));
}

#[test]
fn test_extend_target_missing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "a.css", &kss_block("Kept", "forms"));
    write(
        temp_dir.path(),
        "b.css",
        "// Extra\n//\n// StyleguideExtendBefore tables\n",
    );

    let result = Parser::new([temp_dir.path()]).parse();

    assert!(matches!(
        result,
        Err(KssError::ExtendTargetMissing { reference, filename })
            if reference == "tables" && filename == "b.css"
    ));
}

#[test]
fn test_malformed_reference_aborts() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "a.css", &kss_block("Bad", "Forms.Input"));

    let result = Parser::new([temp_dir.path()]).parse();
    assert!(matches!(result, Err(KssError::MalformedReference { .. })));
}

#[test]
fn test_pattern_selects_extra_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "a.css", &kss_block("Css", "1"));
    write(temp_dir.path(), "_b.styl", &kss_block("Stylus", "2"));
    write(temp_dir.path(), "c.styl", &kss_block("Ignored", "3"));

    let document = Parser::new([temp_dir.path()])
        .with_patterns(["_*.styl"])
        .parse()
        .expect("Failed to parse");

    assert_eq!(document.len(), 2);
    assert!(document.section("3").is_err());
}

#[test]
fn test_hidden_and_unsupported_files_are_skipped() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "a.css", &kss_block("Visible", "1"));
    write(temp_dir.path(), ".cache/b.css", &kss_block("Hidden", "2"));
    write(temp_dir.path(), "notes.md", &kss_block("Markdown", "3"));

    let document = Parser::new([temp_dir.path()])
        .parse()
        .expect("Failed to parse");

    assert_eq!(document.len(), 1);
}

#[test]
fn test_parse_from_config_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let styles = temp_dir.path().join("styles");
    write(
        &styles,
        "theme.scss",
        "// $brand buttons\n//\n// Styleguide 1\n",
    );
    write(
        temp_dir.path(),
        ".kss.yml",
        &format!(
            "paths:\n  - {}\nextensions: [scss]\nvariables:\n  $brand: Acme\n",
            styles.display()
        ),
    );

    let config = StyleguideConfig::discover(temp_dir.path())
        .expect("Failed to read config")
        .expect("Config missing");
    let document = Parser::from_config(&config)
        .parse()
        .expect("Failed to parse");

    assert_eq!(
        document.section("1").expect("Section missing").title.as_deref(),
        Some("Acme buttons")
    );
}

#[test]
fn test_in_memory_sources_match_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let base = "/*\nBase\n\nStyleguide a\n*/\n";
    let extend = "// More\n// StyleguideExtendAfter a\n";
    write(temp_dir.path(), "1.css", base);
    write(temp_dir.path(), "2.css", extend);

    let from_files = Parser::new([temp_dir.path()])
        .parse()
        .expect("Failed to parse");
    let from_memory = Parser::new(Vec::<&Path>::new())
        .parse_sources(&[("1.css", base), ("2.css", extend)])
        .expect("Failed to parse");

    assert_eq!(from_files.section_map(), from_memory.section_map());
    assert_eq!(
        from_memory.section("a").expect("Section missing").description,
        "More"
    );
}
