use anyhow::Result;
use chrono::Utc;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub async fn run(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    app.load().await?;
    let items = app.store.source_vocabulary();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("No vocabulary yet.");
                return Ok(());
            }

            let now = Utc::now();
            for item in items {
                println!("{}", terminal::item_line(item, now, use_color));
            }
            println!("\n{} items total", items.len());
        }
    }

    Ok(())
}
