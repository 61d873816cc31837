use std::io::Read;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use reflookup::{
    Lookup, Query, Resolver, callback, config::Config, counter::UsageCounter, fetch::HttpFetcher,
};

use crate::cli::{Cli, Command, Input};

mod cli;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let color = std::env::var_os("NO_COLOR").is_none();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reflookup=warn")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(color),
        )
        .init();

    let args = Cli::parse();
    match args.command {
        Command::Fetch { kind, id, template } => {
            run_lookup(&args.config, Query::new(&kind, &id, &template)?, color)
        }
        Command::Query { query } => {
            run_lookup(&args.config, Query::from_query_string(&query)?, color)
        }
        Command::Normalize {
            source,
            input,
            template,
        } => {
            let body = read_input(&input)?;
            let record = source
                .build(&args.config)
                .normalize(&body, &template)?
                .finalize();
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
    }
}

fn run_lookup(config: &Config, query: Query, color: bool) -> anyhow::Result<()> {
    let resolver = Resolver::new(config, HttpFetcher::new(config.timeout()))?;
    let lookup = resolver.lookup(query);

    if lookup.succeeded
        && let Some(path) = &config.counter
        && let Err(e) =
            UsageCounter::new(path).record(lookup.query.kind, chrono::Local::now().date_naive())
    {
        warn!(error = %e, "failed to update usage counter");
    }

    let payload = callback::render(
        &config.callback,
        &lookup.record,
        &lookup.query.template,
        lookup.query.kind,
    )?;
    println!("{payload}");
    report(&lookup, color);
    Ok(())
}

fn read_input(input: &Input) -> anyhow::Result<String> {
    match input {
        Input::Stdin => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("failed to read stdin")?;
            Ok(body)
        }
        Input::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
    }
}

/// One-line summary on stderr so stdout stays a clean payload.
fn report(lookup: &Lookup, color: bool) {
    let found = usize::from(!lookup.record.is_empty());
    let (ok, missed) = (format!("✓ {found}"), format!("✗ {}", 1 - found));
    let (kind, id) = (lookup.query.kind, &lookup.query.id);
    if color {
        eprintln!("{} {}  {kind} {id}", ok.green(), missed.red());
    } else {
        eprintln!("{ok} {missed}  {kind} {id}");
    }
}
