use tokio::sync::broadcast;

/// Broadcast payload: the current session must be discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInvalidated;

/// Publish/subscribe channel for session invalidation.
///
/// The request pipeline publishes when credentials cannot be recovered; the
/// session manager is the canonical subscriber. Publishing with nobody
/// listening is not an error.
#[derive(Debug, Clone)]
pub struct SessionSignal {
    sender: broadcast::Sender<SessionInvalidated>,
}

impl SessionSignal {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self) {
        let _ = self.sender.send(SessionInvalidated);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionInvalidated> {
        self.sender.subscribe()
    }
}

impl Default for SessionSignal {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let signal = SessionSignal::default();
        signal.publish();
    }

    #[test]
    fn test_every_subscriber_sees_the_signal() {
        let signal = SessionSignal::default();
        let mut first = signal.subscribe();
        let mut second = signal.clone().subscribe();

        signal.publish();

        assert_eq!(first.try_recv(), Ok(SessionInvalidated));
        assert_eq!(second.try_recv(), Ok(SessionInvalidated));
        assert!(first.try_recv().is_err());
    }
}
