//! Subcommand handlers.
//!
//! Rendering is split from I/O so the output lines can be checked against a
//! fixed "now".

use agecounter_core::{AgeCalculator, Birthdate, BirthdayStore, SettingsRepository};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use log::info;
use serde_json::json;
use std::io::Write;
use std::time::Duration;

const PROMPT_HINT: &str = "Birthday not set yet. Run `agecounter set YYYY-MM-DD` to save it.";

/// Menu-bar title followed by the two menu lines.
pub fn render_show<Tz: TimeZone>(calculator: &AgeCalculator<Tz>, now: DateTime<Utc>) -> String {
    format!(
        "{}\n{}\n{}",
        calculator.format_age(now),
        calculator.format_breakdown(now),
        calculator.format_birthday()
    )
}

pub fn render_show_json<Tz: TimeZone>(
    calculator: &AgeCalculator<Tz>,
    now: DateTime<Utc>,
) -> serde_json::Value {
    json!({
        "age": calculator.format_age(now),
        "age_years": calculator
            .has_been_set()
            .then(|| calculator.compute_age_in_years(now)),
        "breakdown": calculator.breakdown(now),
        "birthday": calculator.format_birthday(),
        "birthdate": calculator.birthdate().map(|date| date.to_string()),
    })
}

pub fn show<R: SettingsRepository>(store: &BirthdayStore<R>, as_json: bool) -> Result<()> {
    let prompt = store.should_prompt_for_birthday();
    let calculator = AgeCalculator::new(store);
    let now = Utc::now();

    if as_json {
        let rendered = serde_json::to_string_pretty(&render_show_json(&calculator, now))
            .context("failed to encode output")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{}", render_show(&calculator, now));
    if prompt {
        eprintln!("{PROMPT_HINT}");
    }
    Ok(())
}

/// Validates picker input: dates after `today` are not selectable.
pub fn check_selectable(date: Birthdate, today: NaiveDate) -> Result<Birthdate> {
    if date.is_after(today) {
        bail!("birthday {date} is in the future");
    }
    Ok(date)
}

pub fn set<R: SettingsRepository>(store: &BirthdayStore<R>, date: Birthdate) -> Result<()> {
    let date = check_selectable(date, Local::now().date_naive())?;
    let calculator = AgeCalculator::new(store);

    store.set(date).context("failed to save birthday")?;
    println!("{}", calculator.format_birthday());
    Ok(())
}

/// Rewrites one terminal line with the age every `interval`.
///
/// Runs until `ticks` refreshes were written, or forever when `None`.
pub fn watch<R: SettingsRepository>(
    store: &BirthdayStore<R>,
    interval: Duration,
    ticks: Option<u64>,
) -> Result<()> {
    let calculator = AgeCalculator::new(store);
    let mut stdout = std::io::stdout().lock();
    info!(
        "event=watch_start module=cli status=ok interval_ms={}",
        interval.as_millis()
    );

    let mut written = 0u64;
    loop {
        let now = Utc::now();
        write!(
            stdout,
            "\r{}  {:<28}",
            calculator.format_age(now),
            calculator.format_breakdown(now)
        )?;
        stdout.flush()?;

        written += 1;
        if ticks.is_some_and(|limit| written >= limit) {
            break;
        }
        std::thread::sleep(interval);
    }

    writeln!(stdout)?;
    Ok(())
}

pub fn launch_at_login<R: SettingsRepository>(
    store: &BirthdayStore<R>,
    enabled: Option<bool>,
) -> Result<()> {
    if let Some(enabled) = enabled {
        store
            .set_launch_at_login(enabled)
            .context("failed to save launch-at-login preference")?;
    }
    let state = if store.launch_at_login() { "on" } else { "off" };
    println!("launch at login: {state}");
    Ok(())
}
