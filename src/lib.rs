pub mod allocation;
pub mod feed;
pub mod fixture;
pub mod policy;
pub mod strategies;

pub use allocation::{AllocationMap, Weight, ZeroSumFallback};
pub use feed::{FeedKey, FeedSet, FeedSnapshot, FeedSource, Interval, Ticker};
pub use policy::{Branch, Policy, PolicyBuilder, PolicyError};
