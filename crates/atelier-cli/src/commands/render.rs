//! Terminal rendering for messages, artifacts and gallery views.

use atelier_core::gallery::{GalleryPage, GalleryStats};
use atelier_core::{Artifact, ErrorDescriptor, ErrorKind, Message, MessageRole};
use colored::Colorize;

pub fn message(message: &Message) {
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.content).green()),
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

pub fn artifact(artifact: &Artifact) {
    println!(
        "{} {}",
        "[design]".bright_magenta(),
        artifact.title.bold()
    );
    println!("  {}", artifact.description);
    println!("  {}", artifact.image_ref.underline());
}

pub fn error(error: &ErrorDescriptor) {
    println!("{}", format!("Error: {}", error.message).red());
    if error.kind.needs_credentials() {
        println!(
            "{}",
            "Set OPENROUTER_API_KEY or run `atelier config init` and edit secret.json.".yellow()
        );
    } else if error.kind.suggests_retry() {
        println!("{}", "Check your connection and resend the message.".yellow());
    } else if error.kind == ErrorKind::Upstream {
        println!("{}", "The service rejected the request.".yellow());
    }
}

pub fn page(page: &GalleryPage) {
    if page.total_count == 0 {
        println!("{}", "No designs found.".bright_black());
        return;
    }
    for (offset, artifact) in page.items.iter().enumerate() {
        println!(
            "{:>4}. {}  {}",
            page.window.start + offset + 1,
            artifact.title.bold(),
            artifact.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
        );
        println!("      {}", artifact.description);
        println!("      {}", artifact.image_ref.bright_black());
    }
    println!(
        "{}",
        format!(
            "Showing {}-{} of {}",
            page.window.start + 1,
            page.window.end,
            page.total_count
        )
        .bright_black()
    );
}

pub fn stats(stats: &GalleryStats) {
    println!("{}", "Gallery statistics".bright_magenta().bold());
    println!("  Designs in range:  {}", stats.total_designs);
    println!("  Created today:     {}", stats.today_designs);
    println!("  Weekly growth:     {:+.1}%", stats.weekly_growth);

    if !stats.popular_terms.is_empty() {
        let terms: Vec<String> = stats
            .popular_terms
            .iter()
            .map(|t| format!("{} ({})", t.term, t.count))
            .collect();
        println!("  Popular terms:     {}", terms.join(", "));
    }

    println!("  Last 7 days:");
    let peak = stats
        .daily_activity
        .iter()
        .map(|d| d.count)
        .max()
        .unwrap_or(0)
        .max(1);
    for day in &stats.daily_activity {
        let bar = "#".repeat(day.count * 20 / peak);
        println!("    {}  {:>3} {}", day.date.format("%m-%d"), day.count, bar.cyan());
    }
}
