//! Services command - List the service catalog.

use anyhow::Result;
use clap::Args;

use chify_core::ServiceCatalog;

#[derive(Args)]
pub struct ServicesArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    json: bool,
}

pub fn execute(args: &ServicesArgs) -> Result<()> {
    let catalog = ServiceCatalog::builtin();

    if args.json {
        let records: Vec<_> = catalog.iter().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("Our Specialized Services\n");
    for record in catalog.iter() {
        println!("  {:<22} {}", record.slug, record.title);
        println!("  {:<22} {}", "", record.summary);
        for feature in record.preview_features() {
            println!("  {:<22} - {}", "", feature);
        }
        let more = record.features.len().saturating_sub(record.preview_features().len());
        if more > 0 {
            println!("  {:<22} + {} more", "", more);
        }
        println!();
    }
    Ok(())
}
