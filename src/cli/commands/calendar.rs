//! Calendar command: the simulated schedule for a day.

use crate::calendar::CalendarClient;
use crate::error::Result;
use crate::model::CalendarEvent;
use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;

use super::{block_on, parse_date, print_json};

#[derive(Serialize)]
struct CalendarOutput {
    date: NaiveDate,
    events: Vec<CalendarEvent>,
    count: usize,
}

/// Execute the calendar command.
pub fn execute(date: Option<&str>, json: bool) -> Result<()> {
    let date = parse_date(date)?;

    let events = block_on(async {
        let mut client = CalendarClient::new();
        client.connect().await;
        client.fetch_events(date).await
    })?;

    if crate::is_csv() {
        println!("id,title,start,end");
        for e in &events {
            println!(
                "{},{},{},{}",
                e.id,
                crate::csv_escape(&e.title),
                e.start.format("%H:%M"),
                e.end.format("%H:%M")
            );
        }
        return Ok(());
    }

    if json {
        return print_json(&CalendarOutput {
            date,
            count: events.len(),
            events,
        });
    }

    println!("{}", date.format("%A, %B %-d").to_string().bold());
    if events.is_empty() {
        println!("  No events scheduled for this day.");
    }
    for e in &events {
        println!(
            "  {} - {}  {}",
            e.start.format("%-I:%M %p"),
            e.end.format("%-I:%M %p"),
            e.title
        );
    }
    Ok(())
}
