//! Notification collaborator.

/// Best-effort confirmation channel.
///
/// The workflow calls this only after a successful payment, with a message
/// containing the order id. Delivery is fire-and-forget: failures are logged
/// by the caller and never affect the order.
pub trait ConfirmationSender: Send + Sync {
    fn send_confirmation(&self, email: &str, message: &str) -> anyhow::Result<()>;
}
