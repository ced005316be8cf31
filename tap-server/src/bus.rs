//! Notification bus
//!
//! In-process publish/subscribe with three channels:
//!
//! - `order-changed`: payload-free invalidation signal for bar/kitchen
//!   views, throttled.
//! - `data-changed`: payload-free refresh signal for the stats view,
//!   throttled with a longer window.
//! - `message`: free-text admin announcements, unthrottled.
//!
//! Throttling is trailing-edge coalescing: the first trigger opens a
//! window and schedules exactly one emission for when the window
//! elapses; triggers inside the window are absorbed. A burst of orders
//! therefore costs subscribers a single refresh.
//!
//! Delivery is best-effort and at-most-once per subscriber: no replay
//! on reconnect, and a process restart drops all subscribers and
//! in-flight throttle state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Bus configuration.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Capacity of each broadcast channel
    pub channel_capacity: usize,
    /// order-changed throttle window
    pub order_window: Duration,
    /// data-changed throttle window
    pub data_window: Duration,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            order_window: Duration::from_secs(5),
            data_window: Duration::from_secs(10),
        }
    }
}

/// Trailing-edge throttle: one pending emission per window.
#[derive(Debug, Clone)]
struct Throttle {
    window: Duration,
    pending: Arc<AtomicBool>,
}

impl Throttle {
    fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Schedule an emission unless one is already pending. Send errors
    /// mean no subscriber is connected and are ignored.
    fn trigger<T: Clone + Send + 'static>(&self, tx: &broadcast::Sender<T>, event: T) {
        if self.pending.swap(true, Ordering::SeqCst) {
            return;
        }
        let window = self.window;
        let pending = Arc::clone(&self.pending);
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            pending.store(false, Ordering::SeqCst);
            let _ = tx.send(event);
        });
    }
}

/// Cancellable subscription to one bus channel.
///
/// Cancelling the token (or dropping the subscription) stops delivery
/// to this subscriber without affecting others.
pub struct Subscription<T> {
    rx: broadcast::Receiver<T>,
    token: CancellationToken,
}

impl<T: Clone> Subscription<T> {
    /// Receive the next event, or None once cancelled or the bus is
    /// gone. A lagged subscriber skips to the newest events; for pure
    /// invalidation signals that loses nothing.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            tokio::select! {
                _ = self.token.cancelled() => return None,
                msg = self.rx.recv() => match msg {
                    Ok(event) => return Some(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "bus subscriber lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                },
            }
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// The notification bus.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    order_tx: broadcast::Sender<()>,
    data_tx: broadcast::Sender<()>,
    message_tx: broadcast::Sender<String>,
    order_throttle: Throttle,
    data_throttle: Throttle,
    shutdown_token: CancellationToken,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::from_config(BusConfig::default())
    }

    pub fn from_config(config: BusConfig) -> Self {
        let (order_tx, _) = broadcast::channel(config.channel_capacity);
        let (data_tx, _) = broadcast::channel(config.channel_capacity);
        let (message_tx, _) = broadcast::channel(config.channel_capacity);
        Self {
            order_tx,
            data_tx,
            message_tx,
            order_throttle: Throttle::new(config.order_window),
            data_throttle: Throttle::new(config.data_window),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Signal that an order was created or advanced. Fans out to both
    /// throttled channels; must be called only after the durable write
    /// committed.
    pub fn notify_order_activity(&self) {
        self.order_throttle.trigger(&self.order_tx, ());
        self.data_throttle.trigger(&self.data_tx, ());
    }

    /// Broadcast an announcement to all connected clients, bypassing
    /// any throttle.
    pub fn broadcast_message(&self, message: impl Into<String>) {
        let _ = self.message_tx.send(message.into());
    }

    pub fn subscribe_order_changes(&self) -> Subscription<()> {
        self.subscription(&self.order_tx)
    }

    pub fn subscribe_data_changes(&self) -> Subscription<()> {
        self.subscription(&self.data_tx)
    }

    pub fn subscribe_messages(&self) -> Subscription<String> {
        self.subscription(&self.message_tx)
    }

    /// Cancel every outstanding subscription.
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
    }

    fn subscription<T: Clone>(&self, tx: &broadcast::Sender<T>) -> Subscription<T> {
        Subscription {
            rx: tx.subscribe(),
            token: self.shutdown_token.child_token(),
        }
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    fn fast_bus() -> NotificationBus {
        NotificationBus::from_config(BusConfig {
            channel_capacity: 16,
            order_window: Duration::from_millis(20),
            data_window: Duration::from_millis(40),
        })
    }

    #[tokio::test]
    async fn burst_within_window_coalesces_to_one_emission() {
        let bus = fast_bus();
        let mut sub = bus.subscribe_data_changes();

        for _ in 0..5 {
            bus.notify_order_activity();
        }

        // Exactly one emission for the burst.
        assert!(timeout(Duration::from_millis(200), sub.recv()).await.is_ok());
        assert!(
            timeout(Duration::from_millis(100), sub.recv()).await.is_err(),
            "burst must not produce a second emission"
        );

        // A trigger after the window elapsed opens a new one.
        bus.notify_order_activity();
        assert!(timeout(Duration::from_millis(200), sub.recv()).await.is_ok());
    }

    #[tokio::test]
    async fn order_and_data_channels_are_independent() {
        let bus = fast_bus();
        let mut orders = bus.subscribe_order_changes();
        let mut data = bus.subscribe_data_changes();

        bus.notify_order_activity();

        assert!(timeout(Duration::from_millis(200), orders.recv()).await.is_ok());
        assert!(timeout(Duration::from_millis(200), data.recv()).await.is_ok());
    }

    #[tokio::test]
    async fn cancelled_subscription_stops_receiving() {
        let bus = fast_bus();
        let mut sub = bus.subscribe_messages();
        sub.cancellation_token().cancel();

        bus.broadcast_message("hello");
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn cancelling_one_subscriber_leaves_others_connected() {
        let bus = fast_bus();
        let mut gone = bus.subscribe_messages();
        let mut stays = bus.subscribe_messages();

        gone.cancellation_token().cancel();
        assert_eq!(gone.recv().await, None);

        bus.broadcast_message("last call");
        assert_eq!(stays.recv().await.as_deref(), Some("last call"));
    }

    #[tokio::test]
    async fn messages_are_not_throttled() {
        let bus = fast_bus();
        let mut sub = bus.subscribe_messages();

        bus.broadcast_message("one");
        bus.broadcast_message("two");

        assert_eq!(sub.recv().await.as_deref(), Some("one"));
        assert_eq!(sub.recv().await.as_deref(), Some("two"));
    }
}
