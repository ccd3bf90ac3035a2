use std::collections::BTreeMap;

use derive_more::{Add, AddAssign, From, Mul, Sum};

use crate::feed::Ticker;

/// Fraction of capital assigned to one ticker. Raw weights may sum
/// above 1.0; normalization rescales the whole map, never clamps.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Add, AddAssign, Sum, Mul, From)]
pub struct Weight(f64);

impl Weight {
    pub const ZERO: Weight = Weight(0.0);

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

/// What to do when every raw weight in a cycle comes out zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroSumFallback {
    /// Split 1/N across the universe.
    Uniform,
    /// Pass the all-zero map through: stay out of the market.
    LeaveZero,
}

/// Target allocation returned to the platform: ticker to fraction of
/// capital, in deterministic ticker order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationMap {
    weights: BTreeMap<Ticker, Weight>,
}

impl AllocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, ticker: Ticker, weight: Weight) {
        self.weights.insert(ticker, weight);
    }

    pub fn get(&self, ticker: &Ticker) -> Option<Weight> {
        self.weights.get(ticker).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, Weight)> {
        self.weights.iter().map(|(ticker, weight)| (ticker, *weight))
    }

    pub fn total(&self) -> Weight {
        self.weights.values().copied().sum()
    }

    /// Rescale so the map sums to exactly 1.0, or apply the configured
    /// fallback when the raw sum is zero. Rescaling can push a weight
    /// above its raw value (a single 0.1 becomes 1.0); that is part of
    /// the contract.
    pub fn normalized(self, fallback: ZeroSumFallback) -> AllocationMap {
        let total = self.total().value();
        if total > 0.0 {
            let weights = self
                .weights
                .into_iter()
                .map(|(ticker, weight)| (ticker, Weight::new(weight.value() / total)))
                .collect();
            return AllocationMap { weights };
        }
        match fallback {
            ZeroSumFallback::LeaveZero => self,
            ZeroSumFallback::Uniform => {
                if self.weights.is_empty() {
                    return self;
                }
                let share = Weight::new(1.0 / self.weights.len() as f64);
                let weights = self
                    .weights
                    .into_keys()
                    .map(|ticker| (ticker, share))
                    .collect();
                AllocationMap { weights }
            }
        }
    }
}
