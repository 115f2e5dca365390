pub mod aggregator;
pub mod dispatch;
pub mod etl;
pub mod extractor;
pub mod formatter;
pub mod locator;
pub mod pipeline;

pub use crate::domain::model::{DeviceRecord, Group, TransformResult};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
