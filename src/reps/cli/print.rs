use chrono::NaiveDate;
use colored::Colorize;
use reps::api::{CmdMessage, MessageLevel, RankedItem};
use reps::clock::days_between;
use reps::commands::summary::Summary;
use reps::config::{RepsConfig, KEYS};
use reps::model::{Importance, ReviewItem};
use std::time::Duration;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 6;
const DUE_WIDTH: usize = 16;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// One line per item: id, url (and note), importance, when it is due.
pub(super) fn print_ranked(items: &[RankedItem], today: NaiveDate) {
    for ranked in items {
        let item = &ranked.item;
        let id = format!("{:>width$}. ", item.id, width = ID_WIDTH - 2);
        let importance = format!("{:<9}", item.importance.name());
        let due = format!("{:>width$}", due_label(item.next_review, today), width = DUE_WIDTH);

        let text = if item.note.is_empty() {
            item.url.clone()
        } else {
            format!("{}  {}", item.url, item.note.replace('\n', " "))
        };
        let fixed = id.width() + importance.width() + 1 + DUE_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let text = truncate_to_width(&text, available);
        let padding = available.saturating_sub(text.width());

        println!(
            "{}{}{} {}{}",
            id.yellow(),
            text,
            " ".repeat(padding),
            color_importance(&importance, item.importance),
            color_due(&due, item.next_review, today),
        );
    }
}

pub(super) fn print_item(item: &ReviewItem, today: NaiveDate) {
    println!("{} {}", format!("#{}", item.id).yellow(), item.url.bold());
    if !item.note.is_empty() {
        println!("{}", item.note);
    }
    println!("--------------------------------");
    println!("importance     {}", color_importance(item.importance.name(), item.importance));
    println!("familiarity    {}", item.familiarity);
    println!("ease factor    {:.2}", item.ease_factor);
    println!("reviews        {}", item.review_count);
    println!(
        "last reviewed  {} ({})",
        item.last_reviewed,
        format_days_ago(item.last_reviewed, today)
    );
    println!(
        "next review    {} ({})",
        item.next_review,
        color_due(&due_label(item.next_review, today), item.next_review, today)
    );
    println!("tracked since  {}", item.created_at);
}

pub(super) fn print_summary(summary: &Summary) {
    println!("{} problems tracked", summary.total.to_string().bold());
    println!(
        "{} due, {} overdue",
        summary.due.to_string().yellow(),
        summary.overdue.to_string().red()
    );

    let importance: Vec<String> = summary
        .by_importance
        .iter()
        .map(|(i, n)| format!("{} {}", i, n))
        .collect();
    println!("{}", format!("importance:  {}", importance.join(", ")).dimmed());
    let familiarity: Vec<String> = summary
        .by_familiarity
        .iter()
        .map(|(f, n)| format!("{} {}", f, n))
        .collect();
    println!("{}", format!("familiarity: {}", familiarity.join(", ")).dimmed());

    if let Some(ease) = summary.mean_ease {
        println!("{}", format!("mean ease:   {:.2}", ease).dimmed());
    }
    println!(
        "{}",
        format!("undo:        {}/{}", summary.undo_depth, summary.undo_window).dimmed()
    );
}

pub(super) fn print_config(config: &RepsConfig) {
    for key in KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn due_label(next_review: NaiveDate, today: NaiveDate) -> String {
    match days_between(today, next_review) {
        0 => "due today".to_string(),
        1 => "due tomorrow".to_string(),
        n if n > 0 => format!("in {} days", n),
        -1 => "1 day overdue".to_string(),
        n => format!("{} days overdue", -n),
    }
}

fn color_due(label: &str, next_review: NaiveDate, today: NaiveDate) -> colored::ColoredString {
    if next_review < today {
        label.red()
    } else if next_review == today {
        label.yellow()
    } else {
        label.dimmed()
    }
}

fn color_importance(label: &str, importance: Importance) -> colored::ColoredString {
    match importance {
        Importance::Critical => label.red().bold(),
        Importance::High => label.yellow(),
        Importance::Medium => label.normal(),
        Importance::Low => label.dimmed(),
    }
}

fn format_days_ago(day: NaiveDate, today: NaiveDate) -> String {
    let days = days_between(day, today);
    if days <= 0 {
        return "today".to_string();
    }
    let formatter = Formatter::new();
    formatter.convert(Duration::from_secs(days as u64 * SECS_PER_DAY))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
