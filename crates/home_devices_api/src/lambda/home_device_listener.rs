use crate::domain::device_rules::{validate_device_id, validate_home_id};
use crate::domain::{DeviceService, UpdateDeviceRequest};
use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use common::garde::FieldOrder;
use garde::Validate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Queue message asking to move a device to another home
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HomeDeviceUpdateMessage {
    #[serde(default)]
    #[garde(custom(validate_device_id))]
    pub id: String,
    #[serde(default, rename = "homeId")]
    #[garde(custom(validate_home_id))]
    pub home_id: String,
}

impl FieldOrder for HomeDeviceUpdateMessage {
    const FIELDS: &'static [&'static str] = &["id", "home_id"];
}

/// Counts of updated and skipped messages in one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerReport {
    pub updated: usize,
    pub skipped: usize,
}

/// Applies homeId updates from a batch of queue messages.
///
/// Messages are handled one at a time in delivery order. A message that cannot
/// be parsed, fails validation or fails to update is logged and skipped; the
/// rest of the batch is still attempted and nothing is retried here.
pub struct HomeDeviceListener {
    domain_service: Arc<DeviceService>,
}

impl HomeDeviceListener {
    pub fn new(domain_service: Arc<DeviceService>) -> Self {
        Self { domain_service }
    }

    #[instrument(name = "HomeDeviceListener", skip(self, event), fields(records = event.records.len()))]
    pub async fn handle_event(&self, event: SqsEvent) -> ListenerReport {
        let mut report = ListenerReport::default();

        for record in event.records {
            if self.handle_record(record).await {
                report.updated += 1;
            } else {
                report.skipped += 1;
            }
        }

        info!(
            updated = report.updated,
            skipped = report.skipped,
            "processed queue batch"
        );
        report
    }

    async fn handle_record(&self, record: SqsMessage) -> bool {
        let message_id = record.message_id.unwrap_or_default();

        let Some(body) = record.body else {
            warn!(message_id = %message_id, "queue message has no body");
            return false;
        };

        let message: HomeDeviceUpdateMessage = match serde_json::from_str(&body) {
            Ok(message) => message,
            Err(e) => {
                warn!(message_id = %message_id, error = %e, "failed to parse queue message");
                return false;
            }
        };

        if let Err(e) = common::garde::validate(&message) {
            warn!(message_id = %message_id, error = %e, "queue message failed validation");
            return false;
        }

        let request = UpdateDeviceRequest {
            device_id: message.id.clone(),
            home_id: Some(message.home_id.clone()),
            ..Default::default()
        };

        match self.domain_service.update_device(request).await {
            Ok(()) => {
                info!(device_id = %message.id, home_id = %message.home_id, "device homeId updated");
                true
            }
            Err(e) => {
                error!(
                    device_id = %message.id,
                    home_id = %message.home_id,
                    error = %e,
                    "failed to update device from queue message"
                );
                false
            }
        }
    }
}
