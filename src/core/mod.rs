pub mod engine;
pub mod pipeline;
pub mod runner;

pub use crate::domain::model::{DrawResult, ExchangeInput};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
