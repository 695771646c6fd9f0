mod widget;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::widget::PackSourceArg;

#[derive(Debug, Parser)]
#[command(name = "packview-cli")]
#[command(about = "Resolve product variants and render pack widget views")]
struct Cli {
    /// Product catalog JSON file
    #[arg(long, global = true, env = "PACKVIEW_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// Widget options YAML file; `PACKVIEW_*` env vars are used when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a selection to one variant
    Resolve {
        /// Option choice as `Name=Value` or `index=Value`; repeatable
        #[arg(long = "select", value_name = "OPTION=VALUE")]
        select: Vec<String>,
        /// Preview the variant for this pack size without changing the selection
        #[arg(long)]
        pack: Option<u32>,
    },
    /// Print the full derived view after applying the given interactions
    View {
        #[arg(long = "select", value_name = "OPTION=VALUE")]
        select: Vec<String>,
        /// Pack size to choose after the option selections
        #[arg(long)]
        pack: Option<u32>,
        /// Control that changed the pack size
        #[arg(long, value_enum, default_value_t = PackSourceArg::Radio)]
        source: PackSourceArg,
        /// Gallery item to activate last
        #[arg(long)]
        media: Option<String>,
    },
    /// Print the offer cards for the current selection
    Offers {
        #[arg(long = "select", value_name = "OPTION=VALUE")]
        select: Vec<String>,
        #[arg(long)]
        pack: Option<u32>,
    },
    /// Evaluate sticky summary visibility
    Sticky {
        #[arg(long)]
        hero: bool,
        #[arg(long)]
        form: bool,
        #[arg(long)]
        footer: bool,
        /// Viewport width in CSS pixels
        #[arg(long)]
        width: u32,
    },
    /// Format an amount in minor units through the money chain
    Format {
        cents: u64,
        /// Overrides the configured currency code
        #[arg(long)]
        currency: Option<String>,
        /// Overrides the configured locale
        #[arg(long)]
        locale: Option<String>,
    },
}

fn init_tracing() -> anyhow::Result<()> {
    let level = std::env::var("PACKVIEW_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    let config = widget::load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Resolve { select, pack }) => {
            let catalog = widget::load_catalog(cli.catalog.as_deref())?;
            widget::run_resolve(catalog, config, &select, pack)?;
        }
        Some(Commands::View {
            select,
            pack,
            source,
            media,
        }) => {
            let catalog = widget::load_catalog(cli.catalog.as_deref())?;
            widget::run_view(catalog, config, &select, pack, source, media.as_deref())?;
        }
        Some(Commands::Offers { select, pack }) => {
            let catalog = widget::load_catalog(cli.catalog.as_deref())?;
            widget::run_offers(catalog, config, &select, pack)?;
        }
        Some(Commands::Sticky {
            hero,
            form,
            footer,
            width,
        }) => widget::run_sticky(&config, hero, form, footer, width)?,
        Some(Commands::Format {
            cents,
            currency,
            locale,
        }) => widget::run_format(&config, cents, currency, locale),
        None => println!("packview-cli: no command given (try --help)"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
