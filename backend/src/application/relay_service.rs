use crate::application::attachment;
use crate::application::pipeline::DeliveryPipeline;
use crate::application::report::build_report;
use crate::domain::delivery::{DeliveryOutcome, DeliveryReport, DeliveryRequest, ResolvedMessage};
use crate::domain::ports::{ChatCapability, ReportSinkPort};
use chrono::Local;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct RelayResult {
    pub delivery_id: Uuid,
    pub request: DeliveryRequest,
    pub resolved: ResolvedMessage,
    pub outcome: DeliveryOutcome,
    pub report: DeliveryReport,
}

/// Resolve, deliver, report. Exactly one outcome per request.
#[derive(Clone)]
pub struct RelayService {
    capability: Arc<dyn ChatCapability>,
    pipeline: DeliveryPipeline,
    reports: Arc<dyn ReportSinkPort>,
}

impl RelayService {
    pub fn new(
        capability: Arc<dyn ChatCapability>,
        pipeline: DeliveryPipeline,
        reports: Arc<dyn ReportSinkPort>,
    ) -> Self {
        Self {
            capability,
            pipeline,
            reports,
        }
    }

    pub fn host_name(&self) -> &'static str {
        self.capability.name()
    }

    pub async fn relay(&self, request: DeliveryRequest) -> RelayResult {
        let delivery_id = Uuid::new_v4();
        let span = tracing::info_span!("delivery", delivery_id = %delivery_id);
        self.relay_inner(delivery_id, request).instrument(span).await
    }

    async fn relay_inner(&self, delivery_id: Uuid, request: DeliveryRequest) -> RelayResult {
        tracing::info!(
            host = self.capability.name(),
            message_chars = request.text.chars().count(),
            has_attachment = request.file_path.is_some(),
            "relay request"
        );

        let resolved = attachment::resolve(&request).await;
        let outcome = self
            .pipeline
            .deliver(&resolved.final_text, self.capability.as_ref())
            .await;

        let report = build_report(&request, &resolved, &outcome, Local::now());
        if let Err(error) = self.reports.publish(&report).await {
            tracing::warn!(sink = self.reports.sink(), error = %error, "delivery report publish failed");
        }

        tracing::info!(
            result = outcome.result_code.as_str(),
            chat_opened = outcome.chat_opened,
            message_sent = outcome.message_sent,
            attachment = resolved.attachment_status.as_str(),
            "relay completed"
        );

        RelayResult {
            delivery_id,
            request,
            resolved,
            outcome,
            report,
        }
    }
}
