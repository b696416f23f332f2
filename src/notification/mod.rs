//! Best-effort push notification for approvers.
//!
//! Dispatch never fails the operation that triggered it. Everything that goes
//! wrong is logged and summarized in a [`DeliveryReport`].

pub mod fcm;
pub mod gateway;
pub mod payload;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::model::leave_request::LeaveRequest;
use crate::repository::DeviceTokenStore;
use crate::workflow::ApproverPair;

pub use fcm::FcmGateway;
pub use gateway::PushGateway;
use payload::{new_leave_message, recipients};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct DeliveryReport {
    /// Approver emp ids the message was meant for.
    pub recipients: Vec<String>,
    pub success_count: usize,
    pub failure_count: usize,
    /// Tokens reported as permanently invalid and cleared from storage.
    pub invalid_tokens: Vec<String>,
}

impl DeliveryReport {
    fn for_recipients(recipients: Vec<String>) -> Self {
        Self {
            recipients,
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct Notifier {
    tokens: Arc<dyn DeviceTokenStore>,
    /// `None` when push delivery is not configured.
    gateway: Option<Arc<dyn PushGateway>>,
}

impl Notifier {
    pub fn new(tokens: Arc<dyn DeviceTokenStore>, gateway: Option<Arc<dyn PushGateway>>) -> Self {
        Self { tokens, gateway }
    }

    #[instrument(
        name = "notify_new_leave",
        skip(self, leave, approvers),
        fields(leave_id = leave.id, applicant = %leave.employee_id)
    )]
    pub async fn notify_new_leave(
        &self,
        leave: &LeaveRequest,
        approvers: Option<&ApproverPair>,
    ) -> DeliveryReport {
        let Some(approvers) = approvers else {
            warn!("No approvers found for applicant; notification skipped");
            return DeliveryReport::default();
        };

        let recipients = recipients(approvers);
        if recipients.is_empty() {
            warn!("Approver pair has no usable emp ids; notification skipped");
            return DeliveryReport::default();
        }
        debug!(?recipients, "Resolved approver recipients");

        let tokens = match self.tokens.device_tokens_for(&recipients).await {
            Ok(tokens) => tokens,
            Err(e) => {
                error!(error = %e, "Failed to look up device tokens");
                return DeliveryReport::for_recipients(recipients);
            }
        };
        if tokens.is_empty() {
            warn!("No device tokens registered for approvers; notification not sent");
            return DeliveryReport::for_recipients(recipients);
        }

        let Some(gateway) = &self.gateway else {
            debug!("Push delivery not configured; notification not sent");
            return DeliveryReport::for_recipients(recipients);
        };

        let message = new_leave_message(leave);
        let outcomes = match gateway.send_each(&tokens, &message).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                error!(error = %e, "Push gateway failed");
                return DeliveryReport {
                    failure_count: tokens.len(),
                    ..DeliveryReport::for_recipients(recipients)
                };
            }
        };

        let mut report = DeliveryReport::for_recipients(recipients);
        for (token, outcome) in tokens.iter().zip(&outcomes) {
            if outcome.is_delivered() {
                report.success_count += 1;
                continue;
            }
            report.failure_count += 1;
            debug!(?outcome, "Push to one device failed");
            if outcome.is_permanent_failure() {
                report.invalid_tokens.push(token.clone());
            }
        }

        if !report.invalid_tokens.is_empty() {
            match self.tokens.clear_device_tokens(&report.invalid_tokens).await {
                Ok(cleared) => info!(cleared, "Cleared invalid device tokens"),
                Err(e) => error!(error = %e, "Failed to clear invalid device tokens"),
            }
        }

        if report.success_count > 0 {
            info!(
                success = report.success_count,
                failure = report.failure_count,
                "Leave notification sent"
            );
        } else {
            warn!(failure = report.failure_count, "Leave notification failed to send");
        }

        report
    }
}
