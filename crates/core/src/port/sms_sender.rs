// SMS Sender Port (Interface)

use crate::error::Result;
use async_trait::async_trait;

/// Delivery receipt from the SMS gateway
#[derive(Debug, Clone)]
pub struct SmsReceipt {
    /// Gateway-assigned message ID (Twilio sid)
    pub message_id: String,
}

/// Outbound SMS gateway
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send `body` to `to` (E.164). Errors map to AppError::Sms.
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt>;
}
