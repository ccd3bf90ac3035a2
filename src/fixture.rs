use std::{collections::HashMap, fs::File, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::feed::{
    DividendRecord, FeedKey, FeedSet, FeedSnapshot, FinancialsRecord, MacdRecord, PeRecord,
    RatiosRecord, SentimentRecord, ValueRecord,
};

/// Feed snapshots for one evaluation cycle, as the harness loads them
/// from a YAML file. Record fields carry the platform's camelCase wire
/// names; SMA and RSI series are nested under their period in days.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fixture {
    pub sentiment: HashMap<String, Vec<SentimentRecord>>,
    pub financials: HashMap<String, Vec<FinancialsRecord>>,
    pub dividends: HashMap<String, Vec<DividendRecord>>,
    pub ratios: HashMap<String, Vec<RatiosRecord>>,
    pub wti: Option<Vec<ValueRecord>>,
    pub sector_pe: HashMap<String, Vec<PeRecord>>,
    pub industry_pe: HashMap<String, Vec<PeRecord>>,
    pub sma: HashMap<String, HashMap<u32, Vec<ValueRecord>>>,
    pub macd: HashMap<String, Vec<MacdRecord>>,
    pub rsi: HashMap<String, HashMap<u32, Vec<ValueRecord>>>,
}

impl Fixture {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open fixture {path:?}"))?;
        let fixture = serde_yaml::from_reader(file)
            .with_context(|| format!("Failed to parse fixture {path:?}"))?;
        Ok(fixture)
    }

    pub fn into_feed_set(self) -> FeedSet {
        let mut feeds = FeedSet::new();
        for (ticker, records) in self.sentiment {
            feeds.insert(
                FeedKey::SocialSentiment(ticker.into()),
                FeedSnapshot::Sentiment(records),
            );
        }
        for (ticker, records) in self.financials {
            feeds.insert(
                FeedKey::FinancialStatement(ticker.into()),
                FeedSnapshot::Financials(records),
            );
        }
        for (ticker, records) in self.dividends {
            feeds.insert(
                FeedKey::Dividend(ticker.into()),
                FeedSnapshot::Dividends(records),
            );
        }
        for (ticker, records) in self.ratios {
            feeds.insert(FeedKey::Ratios(ticker.into()), FeedSnapshot::Ratios(records));
        }
        if let Some(records) = self.wti {
            feeds.insert(FeedKey::WestTexasIntermediate, FeedSnapshot::Values(records));
        }
        for (label, records) in self.sector_pe {
            feeds.insert(FeedKey::SectorPe(label), FeedSnapshot::PeRatios(records));
        }
        for (label, records) in self.industry_pe {
            feeds.insert(FeedKey::IndustryPe(label), FeedSnapshot::PeRatios(records));
        }
        for (ticker, by_period) in self.sma {
            for (period, records) in by_period {
                feeds.insert(
                    FeedKey::Sma(ticker.clone().into(), period),
                    FeedSnapshot::Values(records),
                );
            }
        }
        for (ticker, records) in self.macd {
            feeds.insert(FeedKey::Macd(ticker.into()), FeedSnapshot::Macd(records));
        }
        for (ticker, by_period) in self.rsi {
            for (period, records) in by_period {
                feeds.insert(
                    FeedKey::Rsi(ticker.clone().into(), period),
                    FeedSnapshot::Values(records),
                );
            }
        }
        feeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedSource;

    #[test]
    fn parses_camel_case_wire_fields() {
        let yaml = r#"
sentiment:
  YETI:
    - { date: 2026-08-19, twitterSentiment: 0.4, stocktwitsSentiment: 0.3 }
    - { date: 2026-08-20, twitterSentiment: 0.7, stocktwitsSentiment: 0.6 }
financials:
  YETI:
    - { date: 2026-06-30, netIncome: 52000000.0, operatingCashFlow: 81000000.0 }
wti:
  - { date: 2026-08-20, value: 65.0 }
"#;
        let fixture: Fixture = serde_yaml::from_str(yaml).unwrap();
        let feeds = fixture.into_feed_set();
        let sentiment = feeds.latest_sentiment(&"YETI".into()).unwrap();
        assert!((sentiment.combined() - 1.3).abs() < 1e-12);
        let financials = feeds.latest_financials(&"YETI".into()).unwrap();
        assert!(financials.operating_cash_flow > financials.net_income);
        assert_eq!(feeds.latest_wti().map(|r| r.value), Some(65.0));
    }

    #[test]
    fn indicator_series_keyed_by_period() {
        let yaml = r#"
sma:
  ROBO:
    20:
      - { date: 2026-08-20, value: 105.0 }
    50:
      - { date: 2026-08-20, value: 100.0 }
macd:
  ROBO:
    - { date: 2026-08-20, MACD: 1.2, signal: 0.8 }
rsi:
  ROBO:
    14:
      - { date: 2026-08-20, value: 55.0 }
"#;
        let feeds = serde_yaml::from_str::<Fixture>(yaml).unwrap().into_feed_set();
        assert_eq!(
            feeds.latest_sma(&"ROBO".into(), 20).map(|r| r.value),
            Some(105.0)
        );
        assert_eq!(
            feeds.latest_sma(&"ROBO".into(), 50).map(|r| r.value),
            Some(100.0)
        );
        let macd = feeds.latest_macd(&"ROBO".into()).unwrap();
        assert!(macd.macd > macd.signal);
        assert_eq!(
            feeds.latest_rsi(&"ROBO".into(), 14).map(|r| r.value),
            Some(55.0)
        );
    }

    #[test]
    fn ratios_rows_may_omit_payout_ratio() {
        let yaml = r#"
ratios:
  JNJ:
    - { date: 2026-03-31 }
    - { date: 2026-06-30, payoutRatio: 0.42 }
"#;
        let feeds = serde_yaml::from_str::<Fixture>(yaml).unwrap().into_feed_set();
        let rows = feeds.ratios(&"JNJ".into()).unwrap();
        assert_eq!(rows[0].payout_ratio, None);
        assert_eq!(rows[1].payout_ratio, Some(0.42));
    }

    #[test]
    fn unknown_top_level_sections_are_rejected() {
        let yaml = "prices:\n  XLE: []\n";
        assert!(serde_yaml::from_str::<Fixture>(yaml).is_err());
    }

    #[test]
    fn empty_fixture_yields_empty_feed_set() {
        let feeds = serde_yaml::from_str::<Fixture>("{}").unwrap().into_feed_set();
        assert!(feeds.is_empty());
    }
}
