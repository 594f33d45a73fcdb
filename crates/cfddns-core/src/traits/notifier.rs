// # Notifier Trait
//
// Push notifications summarizing an applied change.
//
// ## Implementations
//
// - Pushover: `cfddns-notify-pushover` crate

use async_trait::async_trait;

/// A push notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short title, e.g. `Updating DNS record: home.example.com`
    pub title: String,
    /// Multi-line body describing the change
    pub body: String,
    /// Service-specific priority (0 is normal)
    pub priority: i8,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            priority: 0,
        }
    }
}

/// Trait for notification backends
///
/// The notifier always sends; dry-run gating happens in the dispatcher.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), crate::Error>;

    /// Backend name (for logging)
    fn notifier_name(&self) -> &'static str;
}
