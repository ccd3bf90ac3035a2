//! The five shipped strategies, each a `Policy` configuration value.
//! Thresholds and weights are the strategies' published parameters,
//! not tunables of the engine.

use crate::allocation::{Weight, ZeroSumFallback};
use crate::feed::{FeedKey, FeedSource, Interval, Ticker};
use crate::policy::{Branch, Policy, PolicyError};

/// Crude above this is read as a strong-demand regime.
const WTI_BULL_THRESHOLD: f64 = 60.0;
const TECH_PE_CEILING: f64 = 25.0;
const PAYOUT_RATIO_CEILING: f64 = 0.6;
const RSI_OVERBOUGHT: f64 = 70.0;

pub const SMA_SHORT_DAYS: u32 = 20;
pub const SMA_LONG_DAYS: u32 = 50;
pub const RSI_PERIOD_DAYS: u32 = 14;

/// Outdoor-recreation names screened on balance-sheet health and
/// combined social sentiment, with a bump for dividend payers.
/// Dividend data is welcome but not required; sentiment and financial
/// statements are.
pub fn outdoor_recreation() -> Result<Policy, PolicyError> {
    let tickers = ["CAB", "YETI", "JOUT"];
    let feeds = tickers
        .iter()
        .flat_map(|&symbol| {
            let ticker = Ticker::from(symbol);
            [
                FeedKey::SocialSentiment(ticker.clone()),
                FeedKey::FinancialStatement(ticker.clone()),
                FeedKey::Dividend(ticker),
            ]
        })
        .collect();
    Policy::builder("outdoor-recreation")
        .universe(tickers)
        .interval(Interval::Daily)
        .feeds(feeds)
        .required(|ticker| {
            vec![
                FeedKey::SocialSentiment(ticker.clone()),
                FeedKey::FinancialStatement(ticker.clone()),
            ]
        })
        .branch(Branch::new(
            "healthy books, upbeat sentiment, pays a dividend",
            Weight::new(0.4),
            |ticker, feeds| {
                healthy_and_upbeat(ticker, feeds)
                    && feeds
                        .latest_dividend(ticker)
                        .is_some_and(|record| record.dividend > 0.0)
            },
        ))
        .branch(Branch::new(
            "healthy books, upbeat sentiment",
            Weight::new(0.3),
            healthy_and_upbeat,
        ))
        .default_weight(Weight::new(0.2))
        .missing_weight(Weight::new(0.1))
        .zero_sum(ZeroSumFallback::Uniform)
        .build()
}

fn healthy_and_upbeat(ticker: &Ticker, feeds: &dyn FeedSource) -> bool {
    let healthy = feeds
        .latest_financials(ticker)
        .is_some_and(|record| record.net_income > 0.0 && record.operating_cash_flow > 0.0);
    let upbeat = feeds
        .latest_sentiment(ticker)
        .is_some_and(|record| record.combined() > 1.0);
    healthy && upbeat
}

/// Energy/tech barbell: XLE rides crude strength, AAPL stands in for
/// tech whenever the NYSE Technology sector looks cheap on P/E.
pub fn oil_tech_balance() -> Result<Policy, PolicyError> {
    Policy::builder("oil-tech-balance")
        .universe(["XLE", "AAPL"])
        .interval(Interval::Daily)
        .feeds(vec![
            FeedKey::WestTexasIntermediate,
            FeedKey::SectorPe("NYSE".into()),
        ])
        .required(|ticker| match ticker.as_str() {
            "XLE" => vec![FeedKey::WestTexasIntermediate],
            _ => vec![FeedKey::SectorPe("NYSE".into())],
        })
        .branch(Branch::new(
            "energy: crude above $60",
            Weight::new(0.6),
            |ticker, feeds| {
                ticker.as_str() == "XLE"
                    && feeds
                        .latest_wti()
                        .is_some_and(|record| record.value > WTI_BULL_THRESHOLD)
            },
        ))
        .branch(Branch::new(
            "tech: sector P/E under 25",
            Weight::new(0.4),
            |ticker, feeds| {
                ticker.as_str() == "AAPL"
                    && latest_sector_pe(feeds, "NYSE", "Technology")
                        .is_some_and(|pe| pe < TECH_PE_CEILING)
            },
        ))
        .zero_sum(ZeroSumFallback::LeaveZero)
        .build()
}

/// Latest P/E row for one sector inside an exchange-scoped snapshot.
fn latest_sector_pe(feeds: &dyn FeedSource, exchange: &str, sector: &str) -> Option<f64> {
    feeds
        .sector_pe(exchange)?
        .iter()
        .rev()
        .find(|row| row.name == sector)
        .map(|row| row.pe)
}

/// Single-ticker energy proxy: all-in on XLE when crude trades above
/// $60, a token position otherwise, flat when the feed is missing.
pub fn crude_oil_proxy() -> Result<Policy, PolicyError> {
    Policy::builder("crude-oil-proxy")
        .universe(["XLE"])
        .interval(Interval::Daily)
        .feeds(vec![FeedKey::WestTexasIntermediate])
        .required(|_| vec![FeedKey::WestTexasIntermediate])
        .branch(Branch::new(
            "crude above $60",
            Weight::new(1.0),
            |_, feeds| {
                feeds
                    .latest_wti()
                    .is_some_and(|record| record.value > WTI_BULL_THRESHOLD)
            },
        ))
        .default_weight(Weight::new(0.1))
        .zero_sum(ZeroSumFallback::LeaveZero)
        .build()
}

/// Aging-demographics income screen: equal weight to names that pay a
/// dividend and keep the payout ratio sustainable. The payout ratio is
/// taken from the first ratios row that reports one; a snapshot with
/// no such row fails the screen.
pub fn dividend_health() -> Result<Policy, PolicyError> {
    let tickers = ["JNJ", "PFE", "PG", "MDT"];
    let feeds = tickers
        .iter()
        .flat_map(|&symbol| {
            let ticker = Ticker::from(symbol);
            [
                FeedKey::FinancialStatement(ticker.clone()),
                FeedKey::Ratios(ticker.clone()),
                FeedKey::Dividend(ticker),
            ]
        })
        .collect();
    Policy::builder("dividend-health")
        .universe(tickers)
        .interval(Interval::Daily)
        .feeds(feeds)
        .required(|ticker| {
            vec![
                FeedKey::Dividend(ticker.clone()),
                FeedKey::Ratios(ticker.clone()),
            ]
        })
        .branch(Branch::new(
            "sustainable dividend",
            Weight::new(0.25),
            |ticker, feeds| {
                let pays = feeds
                    .latest_dividend(ticker)
                    .is_some_and(|record| record.dividend > 0.0);
                let sustainable = feeds
                    .ratios(ticker)
                    .and_then(|rows| rows.iter().find_map(|row| row.payout_ratio))
                    .is_some_and(|payout| payout < PAYOUT_RATIO_CEILING);
                pays && sustainable
            },
        ))
        .zero_sum(ZeroSumFallback::Uniform)
        .build()
}

/// Robotics/semiconductor momentum: full share on a bullish signal
/// stack (golden cross, MACD above signal, RSI not overbought), a
/// tenth of that otherwise. Sector and industry P/E are requested as
/// context but never gate a ticker.
pub fn smart_manufacturing() -> Result<Policy, PolicyError> {
    let tickers = ["ROBO", "BOTZ", "XSD", "SOXX"];
    let bullish = Weight::new(1.0 / tickers.len() as f64);
    let mut feeds = vec![
        FeedKey::SectorPe("Industrials".into()),
        FeedKey::IndustryPe("Technology".into()),
    ];
    for &symbol in &tickers {
        let ticker = Ticker::from(symbol);
        feeds.extend([
            FeedKey::Sma(ticker.clone(), SMA_SHORT_DAYS),
            FeedKey::Sma(ticker.clone(), SMA_LONG_DAYS),
            FeedKey::Macd(ticker.clone()),
            FeedKey::Rsi(ticker, RSI_PERIOD_DAYS),
        ]);
    }
    Policy::builder("smart-manufacturing")
        .universe(tickers)
        .interval(Interval::Daily)
        .feeds(feeds)
        .required(|ticker| {
            vec![
                FeedKey::Sma(ticker.clone(), SMA_SHORT_DAYS),
                FeedKey::Sma(ticker.clone(), SMA_LONG_DAYS),
                FeedKey::Macd(ticker.clone()),
                FeedKey::Rsi(ticker.clone(), RSI_PERIOD_DAYS),
            ]
        })
        .branch(Branch::new("bullish momentum", bullish, |ticker, feeds| {
            let golden_cross = match (
                feeds.latest_sma(ticker, SMA_SHORT_DAYS),
                feeds.latest_sma(ticker, SMA_LONG_DAYS),
            ) {
                (Some(short), Some(long)) => short.value > long.value,
                _ => false,
            };
            let macd_up = feeds
                .latest_macd(ticker)
                .is_some_and(|record| record.macd > record.signal);
            let not_overbought = feeds
                .latest_rsi(ticker, RSI_PERIOD_DAYS)
                .is_some_and(|record| record.value < RSI_OVERBOUGHT);
            golden_cross && macd_up && not_overbought
        }))
        .default_weight(bullish * 0.1)
        .zero_sum(ZeroSumFallback::LeaveZero)
        .build()
}
