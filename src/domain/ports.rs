use crate::domain::model::{DeviceRecord, TaskPayload, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<DeviceRecord>>;
    async fn transform(&self, data: Vec<DeviceRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}

/// Chat channel that delivers one text message to one recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Task tracker that starts one replacement workflow; returns the HTTP status.
#[async_trait]
pub trait TaskTracker: Send + Sync {
    async fn start_task(&self, payload: &TaskPayload) -> Result<u16>;
}
