use std::fmt;

use tracing::debug;

use crate::allocation::{AllocationMap, Weight, ZeroSumFallback};
use crate::feed::{FeedKey, FeedSource, Interval, Ticker};

/// Predicate over the current cycle's feeds for one ticker.
pub type BranchTest = Box<dyn Fn(&Ticker, &dyn FeedSource) -> bool + Send + Sync>;

/// Feeds that must be present (non-empty) for a ticker before any
/// branch is evaluated.
pub type RequiredFeeds = Box<dyn Fn(&Ticker) -> Vec<FeedKey> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("policy `{0}` has an empty ticker universe")]
    EmptyUniverse(String),
    #[error("policy `{policy}` lists ticker {ticker} more than once")]
    DuplicateTicker { policy: String, ticker: Ticker },
    #[error("policy `{policy}` declares no data feeds")]
    NoFeeds { policy: String },
    #[error("policy `{policy}` has a negative weight for `{slot}`")]
    NegativeWeight { policy: String, slot: &'static str },
}

/// One decision rule: when `test` holds for a ticker, that ticker gets
/// `weight`. Branches are tried in declaration order; first match wins.
pub struct Branch {
    label: &'static str,
    weight: Weight,
    test: BranchTest,
}

impl Branch {
    pub fn new(
        label: &'static str,
        weight: Weight,
        test: impl Fn(&Ticker, &dyn FeedSource) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            label,
            weight,
            test: Box::new(test),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }
}

/// One strategy as a configuration value: a fixed ticker universe, the
/// feeds it wants materialized, ordered branch rules, and the fallback
/// weights. Evaluation is a pure function of the cycle's snapshots;
/// nothing is cached across cycles and nothing here can fail.
pub struct Policy {
    name: String,
    universe: Vec<Ticker>,
    interval: Interval,
    feeds: Vec<FeedKey>,
    required: RequiredFeeds,
    branches: Vec<Branch>,
    default_weight: Weight,
    missing_weight: Weight,
    zero_sum: ZeroSumFallback,
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("name", &self.name)
            .field("universe", &self.universe)
            .field("interval", &self.interval)
            .field(
                "branches",
                &self.branches.iter().map(Branch::label).collect::<Vec<_>>(),
            )
            .field("zero_sum", &self.zero_sum)
            .finish_non_exhaustive()
    }
}

impl Policy {
    pub fn builder(name: impl Into<String>) -> PolicyBuilder {
        PolicyBuilder::new(name.into())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &[Ticker] {
        &self.universe
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Every feed the scheduler should materialize for a cycle.
    pub fn feeds(&self) -> &[FeedKey] {
        &self.feeds
    }

    pub fn zero_sum(&self) -> ZeroSumFallback {
        self.zero_sum
    }

    /// Raw per-ticker weights plus normalization: the target
    /// allocation handed back to the platform.
    pub fn evaluate(&self, feeds: &dyn FeedSource) -> AllocationMap {
        self.weigh_raw(feeds).normalized(self.zero_sum)
    }

    /// Per-ticker weights before normalization, one entry per universe
    /// ticker.
    pub fn weigh_raw(&self, feeds: &dyn FeedSource) -> AllocationMap {
        let mut raw = AllocationMap::new();
        for ticker in &self.universe {
            raw.set(ticker.clone(), self.weigh(ticker, feeds));
        }
        raw
    }

    fn weigh(&self, ticker: &Ticker, feeds: &dyn FeedSource) -> Weight {
        if let Some(key) = (self.required)(ticker)
            .into_iter()
            .find(|key| !feeds.has(key))
        {
            debug!(
                %ticker,
                missing = ?key,
                weight = self.missing_weight.value(),
                "required feed absent, assigning fallback weight"
            );
            return self.missing_weight;
        }
        for branch in &self.branches {
            if (branch.test)(ticker, feeds) {
                debug!(
                    %ticker,
                    branch = branch.label,
                    weight = branch.weight.value(),
                    "branch matched"
                );
                return branch.weight;
            }
        }
        debug!(
            %ticker,
            weight = self.default_weight.value(),
            "no branch matched, assigning default weight"
        );
        self.default_weight
    }
}

pub struct PolicyBuilder {
    name: String,
    universe: Vec<Ticker>,
    interval: Interval,
    feeds: Vec<FeedKey>,
    required: RequiredFeeds,
    branches: Vec<Branch>,
    default_weight: Weight,
    missing_weight: Weight,
    zero_sum: ZeroSumFallback,
}

impl PolicyBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            universe: Vec::new(),
            interval: Interval::Daily,
            feeds: Vec::new(),
            required: Box::new(|_| Vec::new()),
            branches: Vec::new(),
            default_weight: Weight::ZERO,
            missing_weight: Weight::ZERO,
            zero_sum: ZeroSumFallback::LeaveZero,
        }
    }

    pub fn universe<I>(mut self, tickers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Ticker>,
    {
        self.universe = tickers.into_iter().map(Into::into).collect();
        self
    }

    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    pub fn feeds(mut self, feeds: Vec<FeedKey>) -> Self {
        self.feeds = feeds;
        self
    }

    pub fn required(
        mut self,
        required: impl Fn(&Ticker) -> Vec<FeedKey> + Send + Sync + 'static,
    ) -> Self {
        self.required = Box::new(required);
        self
    }

    pub fn branch(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn default_weight(mut self, weight: Weight) -> Self {
        self.default_weight = weight;
        self
    }

    pub fn missing_weight(mut self, weight: Weight) -> Self {
        self.missing_weight = weight;
        self
    }

    pub fn zero_sum(mut self, fallback: ZeroSumFallback) -> Self {
        self.zero_sum = fallback;
        self
    }

    pub fn build(self) -> Result<Policy, PolicyError> {
        if self.universe.is_empty() {
            return Err(PolicyError::EmptyUniverse(self.name));
        }
        for (i, ticker) in self.universe.iter().enumerate() {
            if self.universe[..i].contains(ticker) {
                return Err(PolicyError::DuplicateTicker {
                    policy: self.name,
                    ticker: ticker.clone(),
                });
            }
        }
        if self.feeds.is_empty() {
            return Err(PolicyError::NoFeeds { policy: self.name });
        }
        for branch in &self.branches {
            if branch.weight < Weight::ZERO {
                return Err(PolicyError::NegativeWeight {
                    policy: self.name,
                    slot: branch.label,
                });
            }
        }
        if self.default_weight < Weight::ZERO {
            return Err(PolicyError::NegativeWeight {
                policy: self.name,
                slot: "default",
            });
        }
        if self.missing_weight < Weight::ZERO {
            return Err(PolicyError::NegativeWeight {
                policy: self.name,
                slot: "missing",
            });
        }
        Ok(Policy {
            name: self.name,
            universe: self.universe,
            interval: self.interval,
            feeds: self.feeds,
            required: self.required,
            branches: self.branches,
            default_weight: self.default_weight,
            missing_weight: self.missing_weight,
            zero_sum: self.zero_sum,
        })
    }
}
