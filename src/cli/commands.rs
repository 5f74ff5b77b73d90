use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use kss_parser::config::parse_variable_arg;
use kss_parser::{
    CommonMarkRenderer, MarkdownRenderer, Parser as StyleguideParser, ReferenceTree, Result,
    Section, Snippet, StyleguideConfig, StyleguideDocument,
};

#[derive(Parser)]
#[command(name = "kss-parser")]
#[command(about = "Extract KSS style guide sections from stylesheet comments")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # List every section under ./styles
    kss-parser sections styles

    # Only sections below reference 2
    kss-parser sections styles --prefix 2

    # Show one section as HTML
    kss-parser show forms.buttons styles --format html

    # Print the reference hierarchy as JSON
    kss-parser tree styles --format json

    # Validate without printing sections, substituting a variable
    kss-parser check styles --var '$brand=Acme'
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// YAML config file (defaults to ./.kss.yml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// File extension to scan, replaces the defaults (repeatable)
    #[arg(long = "ext", global = true)]
    pub extensions: Vec<String>,

    /// Glob pattern matched against file names (repeatable)
    #[arg(long = "pattern", global = true)]
    pub patterns: Vec<String>,

    /// Literal substitution applied to comment text (repeatable)
    #[arg(long = "var", global = true, value_name = "KEY=VALUE", value_parser = parse_variable_arg)]
    pub variables: Vec<(String, String)>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List sections in tree order
    Sections {
        /// Files or directories to scan
        paths: Vec<PathBuf>,

        /// Only sections at or below this reference
        #[arg(long)]
        prefix: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ListFormat,
    },

    /// Show a single section
    Show {
        /// Section reference, e.g. 2.1.1 or forms.buttons
        reference: String,

        /// Files or directories to scan
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ShowFormat,
    },

    /// Print the reference hierarchy, grouping nodes included
    Tree {
        /// Files or directories to scan
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ListFormat,
    },

    /// Parse and report counts; fails on structural errors
    Check {
        /// Files or directories to scan
        paths: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    Text,
    Json,
    Html,
}

/// Global flags shared by every command
pub struct SourceOptions {
    pub config: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub patterns: Vec<String>,
    pub variables: Vec<(String, String)>,
}

impl SourceOptions {
    /// Config file first, then command-line overrides
    pub fn resolve(&self, paths: &[PathBuf]) -> Result<StyleguideConfig> {
        let mut config = match &self.config {
            Some(path) => StyleguideConfig::load(path)?,
            None => StyleguideConfig::discover(Path::new("."))?.unwrap_or_default(),
        };

        if !paths.is_empty() {
            config.paths = paths.to_vec();
        }
        if config.paths.is_empty() {
            config.paths.push(PathBuf::from("."));
        }
        if !self.extensions.is_empty() {
            config.extensions = self.extensions.clone();
        }
        config.patterns.extend(self.patterns.iter().cloned());
        for (token, replacement) in &self.variables {
            config.variables.insert(token.clone(), replacement.clone());
        }

        Ok(config)
    }

    fn parse(&self, paths: &[PathBuf]) -> Result<StyleguideDocument> {
        let config = self.resolve(paths)?;
        StyleguideParser::from_config(&config).parse()
    }
}

pub fn list_sections(
    options: &SourceOptions,
    paths: &[PathBuf],
    prefix: Option<&str>,
    format: ListFormat,
) -> Result<()> {
    let document = options.parse(paths)?;
    let sections = document.iter_sorted_sections(prefix);

    if format == ListFormat::Json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    if sections.is_empty() {
        println!("No sections found");
        return Ok(());
    }

    let tree = document.tree();
    for section in sections {
        let reference = section.reference().unwrap_or_default();
        let number = tree
            .find(reference)
            .map(|id| tree.dotted_numbered_path(id))
            .unwrap_or_default();
        println!(
            "{:<10} {:<30} {}",
            number,
            reference,
            section.title.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

pub fn show_section(
    options: &SourceOptions,
    reference: &str,
    paths: &[PathBuf],
    format: ShowFormat,
) -> Result<()> {
    let document = options.parse(paths)?;
    let section = document.section(reference)?;

    match format {
        ShowFormat::Json => println!("{}", serde_json::to_string_pretty(section)?),
        ShowFormat::Html => print!("{}", render_section_html(section, &CommonMarkRenderer)),
        ShowFormat::Text => print_section(section),
    }

    Ok(())
}

pub fn print_tree(options: &SourceOptions, paths: &[PathBuf], format: ListFormat) -> Result<()> {
    let document = options.parse(paths)?;
    let tree = document.tree();

    if format == ListFormat::Json {
        println!("{}", serde_json::to_string_pretty(&tree.outline())?);
        return Ok(());
    }

    if tree.is_empty() {
        println!("No sections found");
        return Ok(());
    }

    print_tree_text(&tree);
    Ok(())
}

pub fn check(options: &SourceOptions, paths: &[PathBuf]) -> Result<()> {
    let document = options.parse(paths)?;

    println!(
        "OK: {} sections, {} extends and {} replaces merged",
        document.len(),
        document.consumed_extends().len(),
        document.consumed_replaces().len()
    );

    Ok(())
}

fn print_tree_text(tree: &ReferenceTree<'_>) {
    for id in tree.iter_sorted_nodes() {
        let Some(node) = tree.node(id) else { continue };
        let indent = "  ".repeat(node.depth().saturating_sub(1));
        let label = match node.section().and_then(|s| s.title.as_deref()) {
            Some(title) => format!("{} - {}", node.segment_text().unwrap_or(""), title),
            None => node.segment_text().unwrap_or("").to_string(),
        };
        println!("{}{} {}", indent, tree.dotted_numbered_path(id), label);
    }
}

fn print_section(section: &Section) {
    println!(
        "{} {}",
        section.reference().unwrap_or_default(),
        section.title.as_deref().unwrap_or("")
    );
    println!("  Source: {}", section.source_filename);

    if !section.description.is_empty() {
        println!();
        for line in section.description.lines() {
            println!("  {}", line);
        }
    }

    if !section.modifiers.is_empty() {
        println!("\nModifiers:");
        for modifier in &section.modifiers {
            println!("  {:<20} {}", modifier.name, modifier.description);
        }
    }

    print_snippets("Examples", &section.examples);
    print_snippets("Markups", &section.markups);
}

fn print_snippets(heading: &str, snippets: &[Snippet]) {
    if snippets.is_empty() {
        return;
    }

    println!("\n{}:", heading);
    for snippet in snippets {
        let title = snippet.title();
        if title.is_empty() {
            println!("  ({})", snippet.syntax());
        } else {
            println!("  {} ({})", title, snippet.syntax());
        }
        for line in snippet.text.lines() {
            println!("    {}", line);
        }
    }
}

/// Standalone HTML fragment for one section
pub fn render_section_html(section: &Section, renderer: &dyn MarkdownRenderer) -> String {
    let mut html = String::new();
    let reference = section.reference().unwrap_or_default();

    html.push_str(&format!(
        "<section class=\"kss-section\" id=\"kss-{}\">\n",
        reference.replace('.', "-")
    ));
    if let Some(title) = &section.title {
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(title)));
    }
    html.push_str(&section.description_html(renderer));

    if !section.modifiers.is_empty() {
        html.push_str("<ul class=\"kss-modifiers\">\n");
        for modifier in &section.modifiers {
            html.push_str(&format!(
                "<li><code>{}</code> {}</li>\n",
                escape_html(&modifier.name),
                modifier.description_html(renderer).trim()
            ));
        }
        html.push_str("</ul>\n");
    }

    for snippet in section.examples.iter().chain(&section.markups) {
        html.push_str(&snippet.to_html(renderer));
    }

    html.push_str("</section>\n");
    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "kss-parser",
            "sections",
            "styles",
            "--ext",
            "scss",
            "--var",
            "$a=1",
            "--prefix",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.extensions, vec!["scss"]);
        assert_eq!(cli.variables, vec![("$a".to_string(), "1".to_string())]);
        match cli.command {
            Commands::Sections { paths, prefix, format } => {
                assert_eq!(paths, vec![PathBuf::from("styles")]);
                assert_eq!(prefix.as_deref(), Some("2"));
                assert_eq!(format, ListFormat::Text);
            }
            _ => panic!("expected sections command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_variable() {
        assert!(Cli::try_parse_from(["kss-parser", "check", "--var", "oops"]).is_err());
    }

    #[test]
    fn test_render_section_html() {
        let section = Section::from_comment(
            "Button <b>\n\nA *button*.\n\n.primary - Main\n\nMarkup:\n  <a class=\"btn$modifier_class\"></a>\n\nStyleguide 1.2",
            "buttons.css",
        )
        .unwrap();

        let html = render_section_html(&section, &CommonMarkRenderer);
        assert!(html.starts_with("<section class=\"kss-section\" id=\"kss-1-2\">"));
        assert!(html.contains("<h2>Button &lt;b&gt;</h2>"));
        assert!(html.contains("<em>button</em>"));
        assert!(html.contains("<code>.primary</code>"));
        assert!(html.contains("language-html"));
    }
}
