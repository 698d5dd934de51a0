use chrono::{DateTime, Utc};

use phrasebook_lib::vocabulary::{BucketCounts, VocabularyItem};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Bold section header
pub fn header(title: &str, use_color: bool) -> String {
    paint(title, Color::BOLD, use_color)
}

/// Relative due date: "due", "in 3d", "3d overdue"
pub fn due_label(review_date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (review_date.date_naive() - now.date_naive()).num_days();
    match days {
        0 if review_date <= now => "due".to_string(),
        0 => "later today".to_string(),
        d if d > 0 => format!("in {}d", d),
        d => format!("{}d overdue", -d),
    }
}

/// One table row for an item
pub fn item_line(item: &VocabularyItem, now: DateTime<Utc>, use_color: bool) -> String {
    let audio = if item.has_audio() { "\u{266a}" } else { " " };
    let stage = if item.learned {
        paint("learned", Color::GREEN, use_color)
    } else {
        format!("stage {}", item.sr_stage)
    };
    let due = due_label(item.review_date, now);
    let due = if due.ends_with("overdue") || due == "due" {
        paint(&due, Color::YELLOW, use_color)
    } else {
        paint(&due, Color::GRAY, use_color)
    };

    format!(
        "{:>6} {} {} \u{2192} {}  [{}, {}]",
        item.id, audio, item.original.text, item.translated.text, stage, due
    )
}

/// Bucket counts as a compact summary block
pub fn counts_summary(counts: &BucketCounts, use_color: bool) -> String {
    let rows = [
        ("New", counts.new, Color::CYAN),
        ("Review", counts.review, Color::YELLOW),
        ("Rest", counts.rest, Color::GRAY),
        ("Learned", counts.learned, Color::GREEN),
        ("Started today", counts.started_today, Color::BLUE),
        ("Reviewed today", counts.reviewed_today, Color::BLUE),
    ];

    rows.iter()
        .map(|(label, count, color)| {
            format!("{:<15} {}", label, paint(&count.to_string(), color, use_color))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
