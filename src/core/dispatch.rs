use crate::core::formatter::{chat_message, format_line};
use crate::domain::model::{Group, TaskPayload};
use crate::domain::ports::{Notifier, TaskTracker};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Sends one message per group to every recipient.
///
/// A failed delivery is logged and counted; the remaining recipients and
/// groups are still processed.
pub async fn notify_groups(
    notifier: &dyn Notifier,
    recipients: &[String],
    groups: &[Group],
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for group in groups {
        let text = chat_message(&format_line(group));
        for chat_id in recipients {
            match notifier.send_message(chat_id, &text).await {
                Ok(()) => {
                    tracing::debug!("Sent group {} to {}", group.key, chat_id);
                    report.succeeded += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to notify {} about {}: {}", chat_id, group.key, e);
                    report.failed += 1;
                }
            }
        }
    }

    report
}

/// Starts one workflow task per group. Failures do not stop the batch.
pub async fn create_tasks(
    tracker: &dyn TaskTracker,
    user_id: i64,
    groups: &[Group],
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for group in groups {
        let payload = TaskPayload::for_group(user_id, group);
        match tracker.start_task(&payload).await {
            Ok(status) => {
                tracing::info!("Task '{}' created (HTTP {})", payload.title_task, status);
                report.succeeded += 1;
            }
            Err(e) => {
                tracing::error!("Task '{}' failed: {}", payload.title_task, e);
                tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
                report.failed += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GroupKey;
    use crate::utils::error::{FnOrderError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        failing_chat: Option<String>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
            if self.failing_chat.as_deref() == Some(chat_id) {
                return Err(FnOrderError::ChatApiError {
                    status: 403,
                    body: "bot was blocked by the user".to_string(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push((chat_id.to_string(), text.to_string()));
            Ok(())
        }
    }

    struct FlakyTracker {
        titles: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TaskTracker for FlakyTracker {
        async fn start_task(&self, payload: &TaskPayload) -> Result<u16> {
            self.titles.lock().unwrap().push(payload.title_task.clone());
            if payload.title_task.ends_with("KH") {
                return Err(FnOrderError::WebhookStatusError {
                    status: 500,
                    body: String::new(),
                });
            }
            Ok(200)
        }
    }

    fn group(prefix: &str, adresses: &[&str]) -> Group {
        Group {
            key: GroupKey::Prefix(prefix.to_string()),
            inn: "123".to_string(),
            org: "A".to_string(),
            count: adresses.len(),
            adresses: adresses.iter().map(|a| a.to_string()).collect(),
            serials: vec![],
            deadlines: vec![],
            paths: vec![],
        }
    }

    fn recipients() -> Vec<String> {
        vec!["111".to_string(), "222".to_string()]
    }

    #[tokio::test]
    async fn test_notify_sends_to_every_recipient() {
        let notifier = RecordingNotifier::default();
        let groups = vec![group("KH", &["Addr1", "Addr2"]), group("PM", &["Perm"])];

        let report = notify_groups(&notifier, &recipients(), &groups).await;

        assert_eq!(report, DispatchReport { succeeded: 4, failed: 0 });
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent[0].0, "111");
        assert_eq!(sent[1].0, "222");
        assert_eq!(sent[0].1, "<b>заказ ФН:\n123, A, 2 шт., KH, Addr1; Addr2</b>");
    }

    #[tokio::test]
    async fn test_notify_failure_does_not_stop_batch() {
        let notifier = RecordingNotifier {
            failing_chat: Some("111".to_string()),
            ..Default::default()
        };
        let groups = vec![group("KH", &["a"]), group("PM", &["b"])];

        let report = notify_groups(&notifier, &recipients(), &groups).await;

        assert_eq!(report, DispatchReport { succeeded: 2, failed: 2 });
        assert_eq!(notifier.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_notify_group_without_addresses_is_still_sent() {
        let notifier = RecordingNotifier::default();
        let groups = vec![group("KH", &[])];

        let report = notify_groups(&notifier, &recipients(), &groups).await;

        assert_eq!(report.succeeded, 2);
        assert_eq!(
            notifier.sent.lock().unwrap()[0].1,
            "<b>заказ ФН:\n123, A, 0 шт., KH</b>"
        );
    }

    #[tokio::test]
    async fn test_create_tasks_continues_after_failure() {
        let tracker = FlakyTracker {
            titles: Mutex::new(Vec::new()),
        };
        let groups = vec![group("KH", &["a"]), group("PM", &["b"])];

        let report = create_tasks(&tracker, 7, &groups).await;

        assert_eq!(report, DispatchReport { succeeded: 1, failed: 1 });
        assert_eq!(
            *tracker.titles.lock().unwrap(),
            vec!["замена ФН KH".to_string(), "замена ФН PM".to_string()]
        );
    }
}
