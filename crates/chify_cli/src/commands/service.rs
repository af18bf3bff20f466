//! Service command - Show one service in detail.

use anyhow::Result;
use clap::Args;

use chify_core::ServiceCatalog;

#[derive(Args)]
pub struct ServiceArgs {
    /// Service slug or title
    name: String,

    /// Print the record as JSON
    #[arg(long)]
    json: bool,
}

pub fn execute(args: &ServiceArgs) -> Result<()> {
    let record = ServiceCatalog::builtin().find(&args.name)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(record.as_ref())?);
        return Ok(());
    }

    println!("{}", record.title);
    println!("{}\n", "=".repeat(record.title.len()));
    println!("{}\n", record.description);
    println!("Key features:");
    for feature in &record.features {
        println!("  - {}", feature);
    }
    println!("\nImage: {}", record.image_url);
    Ok(())
}
