use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use weighcast::policy::{Policy, PolicyError};
use weighcast::strategies;

#[derive(Parser, Debug)]
pub(crate) struct Cli {
    #[arg(help = "YAML fixture holding this cycle's feed snapshots")]
    pub fixture: PathBuf,
    #[arg(short, long, value_enum, help = "Strategy to evaluate")]
    pub strategy: StrategyKind,
    #[arg(long, help = "Also print the raw weights before normalization")]
    pub raw: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum StrategyKind {
    OutdoorRecreation,
    OilTechBalance,
    CrudeOilProxy,
    DividendHealth,
    SmartManufacturing,
}

impl StrategyKind {
    pub(crate) fn policy(self) -> Result<Policy, PolicyError> {
        match self {
            Self::OutdoorRecreation => strategies::outdoor_recreation(),
            Self::OilTechBalance => strategies::oil_tech_balance(),
            Self::CrudeOilProxy => strategies::crude_oil_proxy(),
            Self::DividendHealth => strategies::dividend_health(),
            Self::SmartManufacturing => strategies::smart_manufacturing(),
        }
    }
}
