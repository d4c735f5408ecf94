pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::cli::LocalStorage;
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{engine::draw, pipeline::SantaPipeline, runner::ExchangeRunner};
pub use crate::domain::model::{
    Assignment, Draw, DryRunSummary, Outcome, Participant, PriorRound, Roster,
};
pub use crate::utils::error::{Result, SantaError};
