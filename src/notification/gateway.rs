use async_trait::async_trait;

use crate::notification::payload::PushMessage;

/// Per-token result reported by a push provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    Failed {
        /// The token will never work again and should be forgotten.
        permanent: bool,
        reason: String,
    },
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    pub fn is_permanent_failure(&self) -> bool {
        matches!(self, Self::Failed { permanent: true, .. })
    }
}

/// Push delivery provider.
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Sends `message` to every token. Returns one outcome per token, in order.
    async fn send_each(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> anyhow::Result<Vec<SendOutcome>>;
}
