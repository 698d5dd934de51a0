use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use phrasebook_lib::vocabulary::VocabularyItem;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub async fn run(
    app: &mut App,
    file: Option<&Path>,
    show_items: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    match file {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let items: Vec<VocabularyItem> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid vocabulary list in {}", path.display()))?;
            app.store.replace_vocabulary(items);
        }
        None => app.load().await?,
    }

    let now = Utc::now();
    let buckets = app.store.vocabulary_at(now);

    match format {
        OutputFormat::Json => {
            let output = if show_items {
                serde_json::to_value(&buckets)?
            } else {
                serde_json::to_value(buckets.counts())?
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::counts_summary(&buckets.counts(), use_color));

            if show_items {
                let sections = [
                    ("New", &buckets.new),
                    ("Review", &buckets.review),
                    ("Rest", &buckets.rest),
                    ("Learned", &buckets.learned),
                    ("Started today", &buckets.started_today),
                    ("Reviewed today", &buckets.reviewed_today),
                ];
                for (title, bucket) in sections {
                    if bucket.is_empty() {
                        continue;
                    }
                    println!("\n{}", terminal::header(title, use_color));
                    for item in bucket.iter() {
                        println!("{}", terminal::item_line(item, now, use_color));
                    }
                }
            }
        }
    }

    Ok(())
}
