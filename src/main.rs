mod cli;

use clap::Parser;
use tabled::{Table, Tabled, settings::Style};
use tracing::info;

use weighcast::allocation::AllocationMap;
use weighcast::fixture::Fixture;

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Fraction")]
    fraction: String,
}

fn rows(map: &AllocationMap) -> Vec<Row> {
    map.iter()
        .map(|(ticker, weight)| Row {
            ticker: ticker.to_string(),
            fraction: format!("{:.4}", weight.value()),
        })
        .collect()
}

fn print_table(title: &str, map: &AllocationMap) {
    let mut table = Table::new(rows(map));
    table.with(Style::sharp());
    println!("{title}");
    println!("{table}");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let opts = cli::Cli::parse();

    let policy = opts.strategy.policy()?;
    println!(
        "{} ({} tickers, evaluated every {})",
        policy.name(),
        policy.universe().len(),
        policy.interval()
    );

    let feeds = Fixture::load_from_file(&opts.fixture)?.into_feed_set();

    let raw = policy.weigh_raw(&feeds);
    if opts.raw {
        print_table("Raw weights", &raw);
    }
    let target = raw.normalized(policy.zero_sum());
    info!(
        policy = policy.name(),
        total = target.total().value(),
        "cycle evaluated"
    );
    print_table("Target allocation", &target);
    Ok(())
}
