//! 页面级事件总线
//!
//! 格式化器发布 `ModalQueued`，宿主发布可见性与文档就绪事件，
//! 弹窗展示器订阅这些事件来触发 drain。

use tokio::sync::broadcast;
use tracing::debug;

/// 页面可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// 页面事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// 格式化器入队了至少一条弹窗记录
    ModalQueued,
    /// 页面可见性变化
    VisibilityChanged(Visibility),
    /// 文档加载完成
    DocumentReady,
}

const BUS_CAPACITY: usize = 64;

/// 页面级事件总线（broadcast）
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PageEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// 发布事件；没有订阅者时静默丢弃
    pub fn emit(&self, event: PageEvent) {
        match self.tx.send(event) {
            Ok(receivers) => debug!(?event, receivers, "Page event emitted"),
            Err(_) => debug!(?event, "Page event dropped (no subscribers)"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.emit(PageEvent::ModalQueued);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.emit(PageEvent::DocumentReady);
        bus.emit(PageEvent::VisibilityChanged(Visibility::Visible));

        assert_eq!(rx.recv().await.unwrap(), PageEvent::DocumentReady);
        assert_eq!(
            rx.recv().await.unwrap(),
            PageEvent::VisibilityChanged(Visibility::Visible)
        );
    }
}
