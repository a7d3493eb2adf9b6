//! Categories command for listing the active vocabulary.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use fh_core::ServiceClass;

use crate::Config;

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &CategoriesArgs, config: &Config) -> Result<()> {
    if args.json {
        writeln!(
            writer,
            "{}",
            serde_json::to_string_pretty(&config.categories)?
        )?;
        return Ok(());
    }

    for class in ServiceClass::ALL {
        writeln!(writer, "{class}:")?;
        for category in config.categories.categories(class) {
            writeln!(writer, "  {category}")?;
        }
    }

    Ok(())
}
