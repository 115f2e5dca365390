use crate::config::{AppConfig, ReadErrorPolicy};
use crate::core::dispatch::{create_tasks, notify_groups};
use crate::core::{aggregator, extractor, formatter, locator};
use crate::core::{DeviceRecord, Pipeline, Storage, TransformResult};
use crate::domain::model::GroupBy;
use crate::domain::ports::{Notifier, TaskTracker};
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::path::Path;

/// Pipeline that finds next month's expiring drives and orders replacements.
///
/// extract: locate and parse export files; transform: group and render the
/// summary; load: write the summary file, then notify and start tasks.
pub struct FnOrderPipeline<S: Storage> {
    storage: S,
    config: AppConfig,
    today: NaiveDate,
    notifier: Option<Box<dyn Notifier>>,
    recipients: Vec<String>,
    task_tracker: Option<(Box<dyn TaskTracker>, i64)>,
}

impl<S: Storage> FnOrderPipeline<S> {
    pub fn new(storage: S, config: AppConfig) -> Self {
        Self {
            storage,
            config,
            today: chrono::Local::now().date_naive(),
            notifier: None,
            recipients: Vec::new(),
            task_tracker: None,
        }
    }

    /// Date the "next month" file pattern is computed from.
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>, recipients: Vec<String>) -> Self {
        self.notifier = Some(notifier);
        self.recipients = recipients;
        self
    }

    pub fn with_task_tracker(mut self, tracker: Box<dyn TaskTracker>, user_id: i64) -> Self {
        self.task_tracker = Some((tracker, user_id));
        self
    }

    pub fn group_by(&self) -> GroupBy {
        self.config.local.group_by
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for FnOrderPipeline<S> {
    async fn extract(&self) -> Result<Vec<DeviceRecord>> {
        let pattern = locator::pattern_for(self.today);
        let root = Path::new(self.config.root_path());
        tracing::info!("Searching {} for {}", root.display(), pattern);

        let files = locator::find_files(root, &pattern)?;
        tracing::info!("Found {} export files", files.len());

        let mut records = Vec::with_capacity(files.len());
        for path in files {
            match extractor::parse_file(&path) {
                Ok(record) => {
                    tracing::debug!("Parsed {:?}", record);
                    records.push(record);
                }
                Err(e) => match self.config.local.on_read_error {
                    ReadErrorPolicy::Skip => tracing::warn!("Skipping file: {}", e),
                    ReadErrorPolicy::Abort => return Err(e),
                },
            }
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<DeviceRecord>) -> Result<TransformResult> {
        let record_count = data.len();
        let groups = aggregator::aggregate(data, self.group_by());
        let summary_text = formatter::render_summary(&groups);

        tracing::info!(
            "Aggregated {} records into {} groups by {:?}",
            record_count,
            groups.len(),
            self.group_by()
        );

        Ok(TransformResult {
            record_count,
            groups,
            summary_text,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self
            .storage
            .write_file(&self.config.local.summary_file, result.summary_text.as_bytes())
            .await?;
        tracing::info!(
            "Wrote {} lines to {}",
            result.groups.len(),
            output_path
        );

        if let Some(notifier) = &self.notifier {
            let report = notify_groups(notifier.as_ref(), &self.recipients, &result.groups).await;
            tracing::info!(
                "Chat notifications: {} sent, {} failed",
                report.succeeded,
                report.failed
            );
        }

        if let Some((tracker, user_id)) = &self.task_tracker {
            let report = create_tasks(tracker.as_ref(), *user_id, &result.groups).await;
            tracing::info!(
                "Workflow tasks: {} created, {} failed",
                report.succeeded,
                report.failed
            );
        }

        Ok(output_path)
    }
}
