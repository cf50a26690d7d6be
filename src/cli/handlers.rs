use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use std::io;
use std::path::PathBuf;

use crate::ai::{provider_from_config, AiProvider};
use crate::config::{mask_key, Config};
use crate::entity::{Item, ItemUpdate, ReviewOptions, ReviewResult, Summary};
use crate::error::{LifelogError, Result};
use crate::storage::JsonStore;

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Runtime::new()?)
}

pub fn handle_problem(data_dir: PathBuf, text: Vec<String>, no_ai: bool) -> Result<()> {
    let text = text.join(" ");
    let config = Config::load(data_dir)?;
    let store = JsonStore::new(&config.data_dir);

    let problem = store.add_problem(&text)?;
    println!(
        "Logged problem {} - {}",
        &problem.id.to_string()[..8],
        problem.title
    );

    if no_ai || !config.ai.enabled {
        return Ok(());
    }

    // AI failures never lose the logged problem; warn and move on.
    match analyze_problem(&config, &store, &problem) {
        Ok(()) => {}
        Err(e) => eprintln!("Warning: AI analysis failed: {}", e),
    }
    Ok(())
}

fn analyze_problem(config: &Config, store: &JsonStore, problem: &Item) -> Result<()> {
    let provider = provider_from_config(&config.ai)?;
    let context: Vec<Item> = store
        .list_problems()?
        .into_iter()
        .filter(|p| p.id != problem.id)
        .take(5)
        .collect();

    let analysis = runtime()?.block_on(provider.analyze(problem, &context))?;

    println!("\nAnalysis: {}", analysis.summary);
    if let Some(category) = &analysis.category {
        println!("Category: {}", category);
    }
    for solution in &analysis.suggested_solutions {
        println!("  - {}", solution);
    }

    store.update_item(
        problem.id,
        ItemUpdate {
            ai_analysis: Some(analysis),
            ..Default::default()
        },
    )?;
    Ok(())
}

pub fn handle_list(data_dir: PathBuf) -> Result<()> {
    let store = JsonStore::new(&data_dir);
    let problems = store.list_problems()?;

    if problems.is_empty() {
        println!("No problems logged yet. Add one with: lifelog p <text>");
        return Ok(());
    }

    println!("{} problem(s):\n", problems.len());
    for (i, problem) in problems.iter().enumerate() {
        print_problem_line(i + 1, problem);
    }
    Ok(())
}

pub fn handle_today(data_dir: PathBuf) -> Result<()> {
    let store = JsonStore::new(&data_dir);
    let problems = store.today_problems()?;

    if problems.is_empty() {
        println!("No problems logged today.");
        return Ok(());
    }

    println!("Today ({} problem(s)):\n", problems.len());
    for (i, problem) in problems.iter().enumerate() {
        print_problem_line(i + 1, problem);
    }
    Ok(())
}

pub fn handle_search(data_dir: PathBuf, query: Vec<String>) -> Result<()> {
    let query = query.join(" ");
    let store = JsonStore::new(&data_dir);
    let matches = store.search_problems(&query)?;

    if matches.is_empty() {
        println!("No problems matching \"{}\"", query);
        return Ok(());
    }

    println!("{} match(es) for \"{}\":\n", matches.len(), query);
    for (i, problem) in matches.iter().enumerate() {
        print_problem_line(i + 1, problem);
    }
    Ok(())
}

pub fn handle_delete(data_dir: PathBuf, query: String, force: bool) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(LifelogError::Validation("search text must not be empty".into()));
    }

    let store = JsonStore::new(&data_dir);
    let mut matches = store.search_problems(query)?;

    let problem = match matches.len() {
        0 => {
            return Err(LifelogError::Validation(format!(
                "no problems match \"{}\"",
                query
            )))
        }
        1 => matches.remove(0),
        n => {
            // Multiple matches: interactive pick, or bail when not a tty.
            if !atty::is(atty::Stream::Stdin) {
                return Err(LifelogError::Validation(format!(
                    "{} problems match \"{}\"; narrow the search text",
                    n, query
                )));
            }
            println!("Found {} matching problems:\n", n);
            for (i, p) in matches.iter().enumerate() {
                print_problem_line(i + 1, p);
            }
            eprint!("\nDelete which one? [1-{}] ", n);
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let pick: usize = input
                .trim()
                .parse()
                .map_err(|_| LifelogError::Validation("not a number, cancelled".into()))?;
            matches
                .into_iter()
                .nth(pick.wrapping_sub(1))
                .ok_or_else(|| LifelogError::Validation("selection out of range".into()))?
        }
    };

    if !force {
        eprintln!(
            "Delete problem {} - {}? [y/N] ",
            &problem.id.to_string()[..8],
            problem.title
        );
        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(LifelogError::Validation(
                "use --force to delete in non-interactive mode".into(),
            ));
        }
    }

    store.delete_problem(problem.id)?;
    println!("Deleted: {}", problem.title);
    Ok(())
}

pub fn handle_review(
    data_dir: PathBuf,
    all: bool,
    last: Option<u32>,
    from: Option<String>,
    to: Option<String>,
    topic: Option<String>,
) -> Result<()> {
    let config = Config::load(data_dir)?;
    let store = JsonStore::new(&config.data_dir);

    let problems = if all {
        store.list_problems()?
    } else if let Some(n) = last {
        store.list_problems()?.into_iter().take(n as usize).collect()
    } else if let (Some(from), Some(to)) = (from.as_deref(), to.as_deref()) {
        let (from, to) = (parse_day_start(from)?, parse_day_end(to)?);
        store
            .list_problems()?
            .into_iter()
            .filter(|p| p.created_at >= from && p.created_at <= to)
            .collect()
    } else if let Some(topic) = topic.as_deref() {
        store.search_problems(topic)?
    } else {
        store.today_problems()?
    };

    if problems.is_empty() {
        println!("No problems found for the specified criteria.");
        return Ok(());
    }

    println!("Analyzing {} problem(s)...", problems.len());
    let provider = provider_from_config(&config.ai)?;
    let options = ReviewOptions {
        all,
        last,
        from,
        to,
        topic,
    };
    let review = runtime()?.block_on(provider.review(&problems, &options))?;
    print_review(&review);
    Ok(())
}

pub fn handle_summary(data_dir: PathBuf, period: String) -> Result<()> {
    let config = Config::load(data_dir)?;
    let store = JsonStore::new(&config.data_dir);

    let days = match period.as_str() {
        "daily" => 1,
        "weekly" => 7,
        _ => 30,
    };
    let cutoff = Utc::now() - Duration::days(days);
    let problems: Vec<Item> = store
        .list_problems()?
        .into_iter()
        .filter(|p| p.created_at >= cutoff)
        .collect();

    if problems.is_empty() {
        println!("No problems in the last {} day(s).", days);
        return Ok(());
    }

    let provider = provider_from_config(&config.ai)?;
    let summary = runtime()?.block_on(provider.summarize(&problems, &period))?;
    print_summary(&summary);
    Ok(())
}

pub fn handle_config_show(data_dir: PathBuf) -> Result<()> {
    let config = Config::load(data_dir)?;
    println!("provider:  {}", config.ai.provider);
    println!(
        "apiKey:    {}",
        config.ai.api_key.as_deref().map(mask_key).unwrap_or_else(|| "(not set)".into())
    );
    println!(
        "model:     {}",
        config.ai.model.as_deref().unwrap_or("(default)")
    );
    println!(
        "baseUrl:   {}",
        config.ai.base_url.as_deref().unwrap_or("(default)")
    );
    println!("enabled:   {}", config.ai.enabled);
    println!("maxTokens: {}", config.ai.max_tokens);
    Ok(())
}

pub fn handle_config_set(data_dir: PathBuf, key: String, value: String) -> Result<()> {
    let mut config = Config::load(data_dir)?;
    match key.as_str() {
        "provider" => config.ai.provider = value.parse()?,
        "apiKey" | "api-key" => config.ai.api_key = Some(value.clone()),
        "model" => config.ai.model = Some(value.clone()),
        "baseUrl" | "base-url" => config.ai.base_url = Some(value.clone()),
        "enabled" => {
            config.ai.enabled = value.parse().map_err(|_| {
                LifelogError::Validation("enabled must be 'true' or 'false'".into())
            })?
        }
        "maxTokens" | "max-tokens" => {
            config.ai.max_tokens = value.parse().map_err(|_| {
                LifelogError::Validation("maxTokens must be a positive integer".into())
            })?
        }
        other => {
            return Err(LifelogError::Validation(format!(
                "unknown config key '{}' (expected provider, apiKey, model, baseUrl, enabled or maxTokens)",
                other
            )))
        }
    }
    config.save()?;
    println!("Set {}.", key);
    Ok(())
}

pub fn handle_config_path(data_dir: PathBuf) -> Result<()> {
    let config = Config::load(data_dir)?;
    let store = JsonStore::new(&config.data_dir);
    println!("config:  {}", config.config_path().display());
    println!("storage: {}", store.path().display());
    Ok(())
}

pub fn handle_serve(data_dir: PathBuf, port: u16) -> Result<()> {
    runtime()?.block_on(crate::server::run(data_dir, port))
}

fn print_problem_line(index: usize, problem: &Item) {
    println!(
        "{:>3}. {} ({}) [{}]",
        index,
        problem.title,
        format_time_ago(problem.created_at, Utc::now()),
        problem.status
    );
}

fn print_review(review: &ReviewResult) {
    if !review.patterns.is_empty() {
        println!("\nPatterns:");
        for pattern in &review.patterns {
            match &pattern.description {
                Some(d) => println!("  - {} ({} problems): {}", pattern.name, pattern.count, d),
                None => println!("  - {} ({} problems)", pattern.name, pattern.count),
            }
        }
    }
    if !review.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &review.suggestions {
            println!("  - {}", suggestion);
        }
    }
    if !review.resources.is_empty() {
        println!("\nResources:");
        for resource in &review.resources {
            println!("  - {} ({})", resource.title, resource.url);
        }
    }
}

fn print_summary(summary: &Summary) {
    println!("\n{} summary:", summary.period);
    println!("  {} problem(s) total", summary.overview.total_problems);
    if !summary.overview.categories.is_empty() {
        let mut categories: Vec<_> = summary.overview.categories.iter().collect();
        categories.sort_by(|a, b| b.1.cmp(a.1));
        for (name, count) in categories {
            println!("    {}: {}", name, count);
        }
    }
    if let Some(time) = &summary.overview.most_active_time {
        println!("  Most active: {}", time);
    }
    for (label, lines) in [
        ("Patterns", &summary.patterns),
        ("Trends", &summary.trends),
        ("Meta-learning", &summary.meta_learning),
        ("Recommendations", &summary.recommendations),
    ] {
        if !lines.is_empty() {
            println!("\n{}:", label);
            for line in lines {
                println!("  - {}", line);
            }
        }
    }
}

fn parse_day_start(s: &str) -> Result<DateTime<Utc>> {
    parse_day(s)?
        .and_hms_opt(0, 0, 0)
        .and_then(|dt| dt.and_local_timezone(Local).single())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| LifelogError::Validation(format!("invalid date '{}'", s)))
}

fn parse_day_end(s: &str) -> Result<DateTime<Utc>> {
    parse_day(s)?
        .and_hms_opt(23, 59, 59)
        .and_then(|dt| dt.and_local_timezone(Local).single())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| LifelogError::Validation(format!("invalid date '{}'", s)))
}

fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| LifelogError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", s)))
}

/// "Just now", "5 minutes ago", "3 hours ago", "Yesterday at 2:15 PM",
/// then an absolute date.
fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - then;
    let mins = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if mins < 1 {
        return "Just now".to_string();
    }
    if mins < 60 {
        return format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" });
    }
    if hours < 24 {
        return format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" });
    }
    let local = then.with_timezone(&Local);
    if days == 1 {
        return format!("Yesterday at {}", local.format("%l:%M %p").to_string().trim());
    }
    local.format("%b %e, %l:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now, now), "Just now");
        assert_eq!(
            format_time_ago(now - Duration::minutes(1), now),
            "1 minute ago"
        );
        assert_eq!(
            format_time_ago(now - Duration::minutes(45), now),
            "45 minutes ago"
        );
        assert_eq!(format_time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert!(format_time_ago(now - Duration::days(1), now).starts_with("Yesterday at "));
    }

    #[test]
    fn test_parse_day_bounds() {
        let start = parse_day_start("2026-08-30").unwrap();
        let end = parse_day_end("2026-08-30").unwrap();
        assert!(start < end);
        assert!(parse_day_start("08/30/2026").is_err());
    }
}
