pub mod classifier;
pub mod driver;
pub mod engine;
pub mod prompt;
pub mod segmenter;

pub use crate::domain::model::{ComparisonResult, Provision, ProvisionMap, Verdict};
pub use crate::domain::ports::{ConfigProvider, ModelClient, ProgressObserver, Storage};
pub use crate::utils::error::Result;
