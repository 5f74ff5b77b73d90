mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, SourceOptions};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kss_parser=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let options = SourceOptions {
        config: cli.config,
        extensions: cli.extensions,
        patterns: cli.patterns,
        variables: cli.variables,
    };

    match cli.command {
        Commands::Sections {
            paths,
            prefix,
            format,
        } => {
            cli::list_sections(&options, &paths, prefix.as_deref(), format)?;
        }
        Commands::Show {
            reference,
            paths,
            format,
        } => {
            cli::show_section(&options, &reference, &paths, format)?;
        }
        Commands::Tree { paths, format } => {
            cli::print_tree(&options, &paths, format)?;
        }
        Commands::Check { paths } => {
            cli::check(&options, &paths)?;
        }
    }

    Ok(())
}
