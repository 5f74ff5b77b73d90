//! Integration tests over the stylesheet fixtures.
//!
//! Each syntax directory under `tests/fixtures` documents the same button and
//! form sections using that syntax's comment styles.

use std::path::PathBuf;

use kss_parser::{KssError, Parser, StyleguideDocument};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn parse(name: &str) -> StyleguideDocument {
    Parser::new([fixture(name)])
        .parse()
        .expect("Failed to parse fixtures")
}

fn title(document: &StyleguideDocument, reference: &str) -> String {
    document
        .section(reference)
        .expect("Section missing")
        .title
        .clone()
        .unwrap_or_default()
}

fn references(sections: &[&kss_parser::Section]) -> Vec<String> {
    sections
        .iter()
        .map(|s| s.reference().unwrap_or_default().to_string())
        .collect()
}

// ============================================================================
// Comment syntaxes
// ============================================================================

mod syntaxes {
    use super::*;

    #[test]
    fn test_parses_kss_comments_in_scss() {
        assert_eq!(title(&parse("scss"), "2.1.1"), "Your standard form button.");
    }

    #[test]
    fn test_parses_kss_comments_in_less() {
        assert_eq!(title(&parse("less"), "2.1.1"), "Your standard form button.");
    }

    #[test]
    fn test_parses_kss_multi_line_comments_in_sass() {
        assert_eq!(title(&parse("sass"), "2.1.1"), "Your standard form button.");
    }

    #[test]
    fn test_parses_kss_single_line_comments_in_sass() {
        assert_eq!(
            title(&parse("sass"), "2.2.1"),
            "A button suitable for giving stars to someone."
        );
    }

    #[test]
    fn test_parses_kss_comments_in_css() {
        assert_eq!(title(&parse("css"), "2.1.1"), "Your standard form button.");
    }

    #[test]
    fn test_parses_nested_documents() {
        for syntax in ["scss", "less", "sass"] {
            let document = parse(syntax);
            assert_eq!(title(&document, "3.0.0"), "Your standard form element.");
            assert_eq!(title(&document, "3.0.1"), "Your standard text input box.");
        }
    }

    #[test]
    fn test_gutter_comment_modifiers() {
        let document = parse("sass");
        let section = document.section("2.1.1").expect("Section missing");

        let names: Vec<_> = section.modifiers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec![":hover", ":disabled", ".primary", ".smaller"]);
        assert_eq!(
            section.modifiers[2].description,
            "Indicates button is the primary action."
        );
    }
}

// ============================================================================
// Section content
// ============================================================================

mod content {
    use super::*;

    #[test]
    fn test_markup_modifier_variants() {
        let document = parse("css");
        let section = document.section("2.1.1").expect("Section missing");

        assert_eq!(
            section.markups[0].text,
            "<button class=\"button\">Button</button>"
        );

        let primary = section
            .modifiers
            .iter()
            .find(|m| m.name == ".primary")
            .expect("Modifier missing");
        assert_eq!(
            primary.markups[0].text,
            "<button class=\"button primary\">Button</button>"
        );

        let hover = &section.modifiers[0];
        assert_eq!(
            hover.markups[0].text,
            "<button class=\"button pseudo-class-hover\">Button</button>"
        );
    }

    #[test]
    fn test_example_keyword() {
        let document = parse("scss");
        let section = document.section("2.1.1").expect("Section missing");

        assert!(section.has_examples());
        assert!(!section.has_markups());
        assert_eq!(section.examples[0].source_filename, "buttons.scss");
        assert_eq!(section.examples[0].syntax(), "html");
    }

    #[test]
    fn test_markup_argument_string() {
        let document = parse("less");
        let markup = &document.section("2.1.1").expect("Section missing").markups[0];

        assert_eq!(markup.argument_string.as_deref(), Some("(html) Button"));
        assert_eq!(markup.title(), "Button");
        assert_eq!(markup.syntax(), "html");
        assert_eq!(markup.snippet_type(), "embedded");
    }

    #[test]
    fn test_source_filename_is_base_name() {
        let document = parse("css");
        assert_eq!(
            document.section("1").expect("Section missing").source_filename,
            "buttons.css"
        );
    }

    #[test]
    fn test_variable() {
        let document = Parser::new([fixture("css")])
            .with_variables(vec![(
                "$test-variable".to_string(),
                "\"The test variable value\"".to_string(),
            )])
            .parse()
            .expect("Failed to parse fixtures");

        assert_eq!(
            document.section("2.2.1").expect("Section missing").description,
            "The value of the test variable: \"The test variable value\""
        );
    }
}

// ============================================================================
// Document queries
// ============================================================================

mod queries {
    use super::*;

    #[test]
    fn test_parse_returns_all_sections() {
        assert_eq!(parse("css").len(), 3);
    }

    #[test]
    fn test_get_sections() {
        let document = parse("css");
        assert_eq!(
            references(&document.sections(None)),
            vec!["1", "2.1.1", "2.2.1"]
        );
    }

    #[test]
    fn test_get_sections_with_prefix() {
        let document = parse("css");
        assert_eq!(
            references(&document.sections(Some("2"))),
            vec!["2.1.1", "2.2.1"]
        );
    }

    #[test]
    fn test_iter_sorted_sections() {
        let document = parse("css");
        assert_eq!(
            references(&document.iter_sorted_sections(None)),
            vec!["1", "2.1.1", "2.2.1"]
        );
        assert_eq!(
            references(&document.iter_sorted_sections(Some("2"))),
            vec!["2.1.1", "2.2.1"]
        );
    }

    #[test]
    fn test_section_not_found() {
        let document = parse("css");
        assert!(matches!(
            document.section("9.9"),
            Err(KssError::SectionNotFound(_))
        ));
    }

    #[test]
    fn test_tree_numbering() {
        let document = parse("css");
        let tree = document.tree();

        let star = tree.find("2.2.1").expect("Node missing");
        assert_eq!(tree.dotted_numbered_path(star), "2.2.1");
        assert!(tree.node(tree.find("2.2").expect("Node missing")).unwrap().is_grouping());
    }
}

// ============================================================================
// Discovery
// ============================================================================

mod discovery {
    use super::*;

    #[test]
    fn test_parse_ext_mismatch() {
        let document = Parser::new([fixture("scss")])
            .with_extensions([".css"])
            .parse()
            .expect("Failed to parse fixtures");

        assert!(document.is_empty());
    }

    #[test]
    fn test_same_references_in_two_roots_are_duplicates() {
        let result = Parser::new([fixture("scss"), fixture("less")]).parse();

        match result {
            Err(KssError::DuplicateReference {
                reference,
                first_file,
                second_file,
            }) => {
                assert_eq!(reference, "2.1.1");
                assert_eq!(first_file, "buttons.scss");
                assert_eq!(second_file, "buttons.less");
            }
            other => panic!("expected duplicate reference, got {:?}", other.map(|d| d.len())),
        }
    }

    #[test]
    fn test_missing_root() {
        let result = Parser::new([fixture("does-not-exist")]).parse();
        assert!(matches!(result, Err(KssError::Walk(_))));
    }
}

// ============================================================================
// Merges
// ============================================================================

mod merges {
    use super::*;

    #[test]
    fn test_extend_after_across_files() {
        let document = parse("merge");
        let buttons = document
            .section("components.buttons")
            .expect("Section missing");

        assert_eq!(buttons.title.as_deref(), Some("Buttons Dark theme"));
        assert_eq!(
            buttons.description,
            "Clickable things.\n\nButtons invert on dark backgrounds."
        );
        let sources: Vec<_> = buttons
            .markups
            .iter()
            .map(|m| m.source_filename.as_str())
            .collect();
        assert_eq!(sources, vec!["base.scss", "theme.scss"]);
    }

    #[test]
    fn test_replace_across_files() {
        let document = parse("merge");
        let links = document.section("components.links").expect("Section missing");

        assert_eq!(links.title.as_deref(), Some("Themed links"));
        assert_eq!(links.description, "Links are underlined in the theme.");
        assert_eq!(links.sort_key(), Some(2));
        assert_eq!(links.source_filename, "base.scss");
    }

    #[test]
    fn test_consumed_blocks_are_recorded() {
        let document = parse("merge");

        assert_eq!(document.len(), 2);
        assert_eq!(document.consumed_extends().len(), 1);
        assert_eq!(document.consumed_replaces().len(), 1);
        assert_eq!(document.consumed_replaces()[0].source_filename, "theme.scss");
    }

    #[test]
    fn test_sort_key_prefix_orders_tree() {
        let document = parse("merge");
        assert_eq!(
            references(&document.iter_sorted_sections(None)),
            vec!["components.buttons", "components.links"]
        );
    }
}
