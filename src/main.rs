use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use class_dump::{
    dump_classes,
    DocumentLayout,
    DumpConfig,
    KeylessPolicy,
    DEFAULT_CATALOG_PATH,
    DEFAULT_SECTION_MARKER,
};

/// Collect unique object definitions from Havok packfile XML into a class catalog
#[derive(Debug, Parser)]
#[command(name = "class_dump", version, about)]
struct Cli {
    /// Source packfiles, or directories searched for *.xml files
    sources: Vec<PathBuf>,

    /// Catalog file to extend
    #[arg(long, default_value = DEFAULT_CATALOG_PATH)]
    catalog: PathBuf,

    /// Name of the section holding the objects
    #[arg(long, default_value = DEFAULT_SECTION_MARKER)]
    section: String,

    /// Handling of objects without a class attribute
    #[arg(long, value_enum, default_value_t = KeylessPolicy::KeepFirst)]
    keyless: KeylessPolicy,

    /// Merge and report without writing the catalog
    #[arg(long)]
    dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> DumpConfig {
        DumpConfig {
            sources: self.sources,
            catalog_path: self.catalog,
            layout: DocumentLayout {
                section_marker: self.section,
                ..Default::default()
            },
            keyless: self.keyless,
            dry_run: self.dry_run,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let json = cli.json;
    let config = cli.into_config();
    let summary = dump_classes(&config)
        .with_context(|| format!("Failed to update catalog {}", config.catalog_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
    }

    Ok(())
}
