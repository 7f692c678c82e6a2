#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod host;
pub mod html;
pub mod models;
pub mod revisioner;

pub use config::ReviseConfig;
pub use html::{BUST_ATTRIBUTE, HtmlDocument};
pub use models::{LifecycleOutcome, PurgeOutcome, PurgeReport, RunResult};
pub use revisioner::AssetRevisioner;
