//! Review scheduling commands: review, delay, reset, restart, delete

use anyhow::{Context, Result};

use phrasebook_lib::vocabulary::{VocabularyId, VocabularyItem};

use crate::app::App;
use crate::OutputFormat;

/// Print the touched items after a confirmed mutation
fn report(app: &App, ids: &[VocabularyId], format: &OutputFormat) -> Result<()> {
    let touched: Vec<&VocabularyItem> = app
        .store
        .source_vocabulary()
        .iter()
        .filter(|item| ids.contains(&item.id))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&touched)?);
        }
        OutputFormat::Plain => {
            for item in touched {
                println!(
                    "{:>6}  stage {}  next review {}",
                    item.id,
                    item.sr_stage,
                    item.review_date.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }
    Ok(())
}

pub async fn run_review(app: &mut App, id: VocabularyId, format: &OutputFormat) -> Result<()> {
    app.load().await?;
    let result = app.store.review(id).await;
    app.flush_notifications();
    result.with_context(|| format!("Failed to review {}", id))?;
    report(app, &[id], format)
}

pub async fn run_delay(app: &mut App, ids: &[VocabularyId], days: i64, format: &OutputFormat) -> Result<()> {
    app.load().await?;
    let result = app.store.delay(ids, days).await;
    app.flush_notifications();
    result.context("Failed to delay vocabulary")?;
    report(app, ids, format)
}

pub async fn run_reset(app: &mut App, ids: &[VocabularyId], format: &OutputFormat) -> Result<()> {
    app.load().await?;
    let result = app.store.reset(ids).await;
    app.flush_notifications();
    result.context("Failed to reset vocabulary")?;
    report(app, ids, format)
}

pub async fn run_restart(app: &mut App, ids: &[VocabularyId], format: &OutputFormat) -> Result<()> {
    app.load().await?;
    let result = app.store.restart(ids).await;
    app.flush_notifications();
    result.context("Failed to restart vocabulary")?;
    report(app, ids, format)
}

pub async fn run_delete(app: &mut App, ids: &[VocabularyId], format: &OutputFormat) -> Result<()> {
    let result = app.store.delete(ids).await;
    app.flush_notifications();
    result.context("Failed to delete vocabulary")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "deleted": ids }));
        }
        OutputFormat::Plain => {
            println!("{}", deleted_line(ids));
        }
    }
    Ok(())
}

fn deleted_line(ids: &[VocabularyId]) -> String {
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Deleted {} item(s): {}", ids.len(), joined)
}
