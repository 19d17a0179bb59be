//! # chatstat CLI
//!
//! Command-line interface for the chatstat library.

use std::process;

use clap::Parser as ClapParser;

use chatstat::cli::Args;
use chatstat::config::ParserConfig;
use chatstat::{ChatIndex, ChatStatError, DayMetric, SenderFilter, WordQuery};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatStatError> {
    let args = <Args as ClapParser>::parse();

    let mut config = ParserConfig::new();
    if let Some(locale) = args.locale {
        config = config.with_locale(locale.into());
    }

    let index = ChatIndex::from_path_with_config(&args.input, config)?;

    #[cfg(feature = "json-output")]
    if args.json {
        return print_json(&index, &args);
    }

    print_report(&index, &args)
}

fn print_report(index: &ChatIndex, args: &Args) -> Result<(), ChatStatError> {
    println!("📊 chatstat v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if let Some(title) = &index.meta().title {
        println!("💬 Chatroom: {}", title);
    }
    if let Some(saved) = &index.meta().date_saved {
        println!("💾 Saved:    {}", saved);
    }
    println!("🌐 Locale:   {}", index.locale());
    println!("📂 Input:    {}", args.input);
    println!();

    let filter = if args.senders.is_empty() {
        SenderFilter::all()
    } else {
        SenderFilter::only(args.senders.iter().cloned())
    };

    println!("Messages:  {}", index.count_messages(&filter));
    println!("Words:     {}", index.word_count());
    println!("Letters:   {}", index.letter_count());
    println!("Days:      {} ({} active)", index.span_days(), index.buckets().len());
    if let Ok(last) = index.last_date() {
        println!("Last day:  {}", last);
    }

    if !args.words.is_empty() {
        println!();
        let mut query = WordQuery::new(args.words.iter().cloned());
        // Word scoping takes a single sender; use the first one given.
        if let Some(sender) = args.senders.first() {
            query = query.with_sender(sender.clone());
        }
        println!(
            "🔤 Occurrences of {:?}: {}",
            args.words,
            index.count_word_occurrences(&query)
        );
    }

    let tally = index.tally_rich_content();
    if !tally.is_empty() {
        println!();
        println!("🖼️  Rich content:");
        for (kind, count) in &tally {
            println!("   {:<13} {}", kind.label(), count);
        }
    }

    println!();
    println!("👥 Per sender:");
    for (sender, avg) in index.per_sender_averages() {
        println!(
            "   {}: {} messages, {:.1} words/msg, {:.1} msgs/day",
            sender,
            index.count_messages(&SenderFilter::only([sender.as_str()])),
            avg.words_per_message,
            avg.messages_per_day,
        );
    }

    if let Some(metric) = args.top {
        let metric: DayMetric = metric.into();
        println!();
        println!("🏆 Top day(s): {}", index.top_days_by(metric).join(", "));
    }

    if let Some(key) = &args.date {
        println!();
        println!("📅 {}:", key);
        for msg in index.date_data(key)? {
            let sender = if msg.sender.is_empty() { "(system)" } else { &msg.sender };
            println!("   [{}] {}: {}", msg.kind, sender, msg.body);
        }
    }

    let unparsed = index.unparsed_lines();
    if !unparsed.is_empty() {
        println!();
        println!("⚠️  {} line(s) could not be classified:", unparsed.len());
        for line in unparsed.iter().take(5) {
            println!("   line {}: {}", line.line_no, line.text);
        }
        if unparsed.len() > 5 {
            println!("   ... and {} more", unparsed.len() - 5);
        }
    }

    Ok(())
}

#[cfg(feature = "json-output")]
fn print_json(index: &ChatIndex, args: &Args) -> Result<(), ChatStatError> {
    let tally: std::collections::BTreeMap<String, usize> = index
        .tally_rich_content()
        .into_iter()
        .map(|(kind, count)| (kind.label().to_string(), count))
        .collect();

    let report = serde_json::json!({
        "meta": index.meta(),
        "locale": index.locale(),
        "message_count": index.message_count(),
        "word_count": index.word_count(),
        "letter_count": index.letter_count(),
        "span_days": index.span_days(),
        "last_date": index.last_date().ok(),
        "senders": index.senders().collect::<Vec<_>>(),
        "rich_content": tally,
        "per_sender": index.per_sender_averages(),
        "hourly": index.hourly_histogram().to_vec(),
        "weekday": index.weekday_histogram().to_vec(),
        "top_days": args.top.map(|m| index.top_days_by(m.into())),
        "unparsed_lines": index.unparsed_lines(),
    });

    println!("{}", serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?);
    Ok(())
}
