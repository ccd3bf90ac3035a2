use std::collections::HashMap;

use chrono::NaiveDate;
use derive_more::{Display, From};
use serde::Deserialize;

/// Symbol of a tradable instrument. Opaque to the policy engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
pub struct Ticker(String);

impl Ticker {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ticker {
    fn from(symbol: &str) -> Self {
        Self(symbol.to_string())
    }
}

/// Evaluation cadence the scheduler is asked for. Rendered with the
/// platform's interval identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Interval {
    #[display("1day")]
    Daily,
}

/// One (feed kind, scope) a strategy can request for a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedKey {
    SocialSentiment(Ticker),
    FinancialStatement(Ticker),
    Dividend(Ticker),
    Ratios(Ticker),
    WestTexasIntermediate,
    /// Per-sector P/E rows, scoped by exchange or sector name.
    SectorPe(String),
    IndustryPe(String),
    /// Simple moving average over the given period, in days.
    Sma(Ticker, u32),
    Macd(Ticker),
    Rsi(Ticker, u32),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentRecord {
    pub date: NaiveDate,
    pub twitter_sentiment: f64,
    pub stocktwits_sentiment: f64,
}

impl SentimentRecord {
    pub fn combined(&self) -> f64 {
        self.twitter_sentiment + self.stocktwits_sentiment
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialsRecord {
    pub date: NaiveDate,
    pub net_income: f64,
    pub operating_cash_flow: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DividendRecord {
    pub date: NaiveDate,
    pub dividend: f64,
}

/// The platform omits `payoutRatio` on some rows, hence the Option.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatiosRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub payout_ratio: Option<f64>,
}

/// Single-value series point: commodity prices, SMA, RSI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValueRecord {
    pub date: NaiveDate,
    pub value: f64,
}

/// One sector (or industry) P/E row. Snapshots scoped by exchange mix
/// rows for every sector, so `name` identifies which one a row is for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeRecord {
    pub date: NaiveDate,
    pub name: String,
    pub pe: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MacdRecord {
    pub date: NaiveDate,
    #[serde(rename = "MACD")]
    pub macd: f64,
    pub signal: f64,
}

/// Records for one feed key, time-ordered oldest to newest by the
/// platform. An empty snapshot counts as absent for decision purposes.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSnapshot {
    Sentiment(Vec<SentimentRecord>),
    Financials(Vec<FinancialsRecord>),
    Dividends(Vec<DividendRecord>),
    Ratios(Vec<RatiosRecord>),
    Values(Vec<ValueRecord>),
    PeRatios(Vec<PeRecord>),
    Macd(Vec<MacdRecord>),
}

impl FeedSnapshot {
    pub fn len(&self) -> usize {
        match self {
            Self::Sentiment(r) => r.len(),
            Self::Financials(r) => r.len(),
            Self::Dividends(r) => r.len(),
            Self::Ratios(r) => r.len(),
            Self::Values(r) => r.len(),
            Self::PeRatios(r) => r.len(),
            Self::Macd(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sentiment(&self) -> Option<&[SentimentRecord]> {
        match self {
            Self::Sentiment(r) => Some(r),
            _ => None,
        }
    }

    pub fn financials(&self) -> Option<&[FinancialsRecord]> {
        match self {
            Self::Financials(r) => Some(r),
            _ => None,
        }
    }

    pub fn dividends(&self) -> Option<&[DividendRecord]> {
        match self {
            Self::Dividends(r) => Some(r),
            _ => None,
        }
    }

    pub fn ratios(&self) -> Option<&[RatiosRecord]> {
        match self {
            Self::Ratios(r) => Some(r),
            _ => None,
        }
    }

    pub fn values(&self) -> Option<&[ValueRecord]> {
        match self {
            Self::Values(r) => Some(r),
            _ => None,
        }
    }

    pub fn pe_ratios(&self) -> Option<&[PeRecord]> {
        match self {
            Self::PeRatios(r) => Some(r),
            _ => None,
        }
    }

    pub fn macd(&self) -> Option<&[MacdRecord]> {
        match self {
            Self::Macd(r) => Some(r),
            _ => None,
        }
    }
}

/// The one capability the policy engine consumes from the platform:
/// a per-cycle snapshot lookup. All data is materialized before the
/// policy runs; nothing here blocks.
pub trait FeedSource {
    fn get(&self, key: &FeedKey) -> Option<&FeedSnapshot>;

    /// Present and non-empty.
    fn has(&self, key: &FeedKey) -> bool {
        self.get(key).is_some_and(|snapshot| !snapshot.is_empty())
    }

    fn latest_sentiment(&self, ticker: &Ticker) -> Option<&SentimentRecord> {
        self.get(&FeedKey::SocialSentiment(ticker.clone()))?
            .sentiment()?
            .last()
    }

    fn latest_financials(&self, ticker: &Ticker) -> Option<&FinancialsRecord> {
        self.get(&FeedKey::FinancialStatement(ticker.clone()))?
            .financials()?
            .last()
    }

    fn latest_dividend(&self, ticker: &Ticker) -> Option<&DividendRecord> {
        self.get(&FeedKey::Dividend(ticker.clone()))?
            .dividends()?
            .last()
    }

    fn ratios(&self, ticker: &Ticker) -> Option<&[RatiosRecord]> {
        self.get(&FeedKey::Ratios(ticker.clone()))?.ratios()
    }

    fn latest_wti(&self) -> Option<&ValueRecord> {
        self.get(&FeedKey::WestTexasIntermediate)?.values()?.last()
    }

    fn sector_pe(&self, label: &str) -> Option<&[PeRecord]> {
        self.get(&FeedKey::SectorPe(label.to_string()))?.pe_ratios()
    }

    fn industry_pe(&self, label: &str) -> Option<&[PeRecord]> {
        self.get(&FeedKey::IndustryPe(label.to_string()))?.pe_ratios()
    }

    fn latest_sma(&self, ticker: &Ticker, period: u32) -> Option<&ValueRecord> {
        self.get(&FeedKey::Sma(ticker.clone(), period))?
            .values()?
            .last()
    }

    fn latest_macd(&self, ticker: &Ticker) -> Option<&MacdRecord> {
        self.get(&FeedKey::Macd(ticker.clone()))?.macd()?.last()
    }

    fn latest_rsi(&self, ticker: &Ticker, period: u32) -> Option<&ValueRecord> {
        self.get(&FeedKey::Rsi(ticker.clone(), period))?
            .values()?
            .last()
    }
}

/// In-memory feed snapshots for one evaluation cycle.
#[derive(Debug, Clone, Default)]
pub struct FeedSet {
    snapshots: HashMap<FeedKey, FeedSnapshot>,
}

impl FeedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FeedKey, snapshot: FeedSnapshot) {
        self.snapshots.insert(key, snapshot);
    }

    pub fn with(mut self, key: FeedKey, snapshot: FeedSnapshot) -> Self {
        self.insert(key, snapshot);
        self
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl FeedSource for FeedSet {
    fn get(&self, key: &FeedKey) -> Option<&FeedSnapshot> {
        self.snapshots.get(key)
    }
}
