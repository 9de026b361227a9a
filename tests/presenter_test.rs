//! Tests for the modal presenter

use std::sync::Arc;
use std::time::Duration;

use message_bar_enhancer::{
    AlertNode, DrainOutcome, EventBus, Formatter, ModalPresenter, ModalQueue, ModalRecord,
    OverlaySurface, PageEvent, PresenterTiming, Visibility,
};

const WAIT: Duration = Duration::from_secs(2);

fn presenter(queue: &ModalQueue, surface: &OverlaySurface, timing: PresenterTiming) -> Arc<ModalPresenter> {
    Arc::new(ModalPresenter::new(queue.clone(), Arc::new(surface.clone())).with_timing(timing))
}

async fn next_dialog(surface: &OverlaySurface) -> String {
    tokio::time::timeout(WAIT, surface.wait_for_dialog())
        .await
        .expect("dialog did not appear")
        .title
}

#[tokio::test]
async fn test_three_records_shown_in_order_one_at_a_time() {
    // Given: 队列中有三条不同的记录
    let queue = ModalQueue::new();
    for title in ["First", "Second", "Third"] {
        queue.enqueue(ModalRecord::new(title, "body"));
    }
    let surface = OverlaySurface::new();
    let presenter = presenter(&queue, &surface, PresenterTiming::immediate());

    // When: drain
    let handle = presenter.schedule(Duration::ZERO);

    // Then: 按插入顺序逐个出现，每次只有一个可见
    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(next_dialog(&surface).await);
        assert_eq!(surface.visible_count(), 1);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(surface.visible_count(), 1, "next dialog must wait for acknowledgment");

        assert!(surface.acknowledge_top());
    }

    assert_eq!(handle.await.unwrap(), DrainOutcome::Completed { shown: 3 });
    assert_eq!(seen, vec!["First", "Second", "Third"]);
    assert_eq!(queue.pending_len(), 0);
    assert_eq!(queue.processed_len(), 3);
}

#[tokio::test]
async fn test_record_shown_only_once() {
    let queue = ModalQueue::new();
    let surface = OverlaySurface::new();
    let presenter = presenter(&queue, &surface, PresenterTiming::immediate());
    let formatter = Formatter::new(queue.clone(), EventBus::new());
    let text = "##Reminder##\n> Submit timesheets";

    // 第一次提取并展示
    formatter.format(&mut AlertNode::plain(text));
    let handle = presenter.schedule(Duration::ZERO);
    assert_eq!(next_dialog(&surface).await, "Reminder");
    surface.acknowledge_top();
    assert_eq!(handle.await.unwrap(), DrainOutcome::Completed { shown: 1 });

    // 告警被重新渲染后再次提取
    formatter.format(&mut AlertNode::plain(text));
    assert_eq!(presenter.drain().await, DrainOutcome::Idle);
    assert_eq!(surface.history(), vec!["Reminder"]);
}

#[tokio::test]
async fn test_records_appended_while_draining_are_shown() {
    let queue = ModalQueue::new();
    queue.enqueue(ModalRecord::new("A", "1"));
    let surface = OverlaySurface::new();
    let presenter = presenter(&queue, &surface, PresenterTiming::immediate());

    let handle = presenter.schedule(Duration::ZERO);
    assert_eq!(next_dialog(&surface).await, "A");

    // 展示期间追加
    queue.enqueue(ModalRecord::new("B", "2"));
    surface.acknowledge_top();

    assert_eq!(next_dialog(&surface).await, "B");
    surface.acknowledge_top();
    assert_eq!(handle.await.unwrap(), DrainOutcome::Completed { shown: 2 });
}

#[tokio::test]
async fn test_modal_queued_event_triggers_drain() {
    let queue = ModalQueue::new();
    let bus = EventBus::new();
    let surface = OverlaySurface::new();
    let timing = PresenterTiming {
        fallback_delay: Duration::from_secs(60),
        ..PresenterTiming::immediate()
    };
    let presenter = presenter(&queue, &surface, timing);
    let _attached = presenter.attach(&bus, false);

    let formatter = Formatter::new(queue.clone(), bus.clone());
    formatter.format(&mut AlertNode::plain("##Queued##\n> via event"));

    assert_eq!(next_dialog(&surface).await, "Queued");
    surface.acknowledge_top();
}

#[tokio::test]
async fn test_visibility_trigger_drains_pending() {
    let queue = ModalQueue::new();
    let bus = EventBus::new();
    let surface = OverlaySurface::new();
    let timing = PresenterTiming {
        fallback_delay: Duration::from_secs(60),
        ..PresenterTiming::immediate()
    };
    let presenter = presenter(&queue, &surface, timing);
    let _attached = presenter.attach(&bus, false);

    // 直接入队，不发事件
    queue.enqueue(ModalRecord::new("Hidden tab", "shown on return"));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(surface.visible_count(), 0);

    bus.emit(PageEvent::VisibilityChanged(Visibility::Hidden));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(surface.visible_count(), 0);

    bus.emit(PageEvent::VisibilityChanged(Visibility::Visible));
    assert_eq!(next_dialog(&surface).await, "Hidden tab");
}

#[tokio::test]
async fn test_fallback_timer_drains_without_events() {
    let queue = ModalQueue::new();
    queue.enqueue(ModalRecord::new("Early", "queued before attach"));
    let surface = OverlaySurface::new();
    let timing = PresenterTiming {
        fallback_delay: Duration::from_millis(30),
        ..PresenterTiming::immediate()
    };
    let presenter = presenter(&queue, &surface, timing);

    let _attached = presenter.attach(&EventBus::new(), false);

    assert_eq!(next_dialog(&surface).await, "Early");
}

#[tokio::test]
async fn test_concurrent_triggers_show_single_dialog() {
    let queue = ModalQueue::new();
    queue.enqueue(ModalRecord::new("Only", "one"));
    let bus = EventBus::new();
    let surface = OverlaySurface::new();
    let presenter = presenter(&queue, &surface, PresenterTiming::immediate());
    let _attached = presenter.attach(&bus, true);

    bus.emit(PageEvent::DocumentReady);
    bus.emit(PageEvent::VisibilityChanged(Visibility::Visible));
    bus.emit(PageEvent::ModalQueued);

    assert_eq!(next_dialog(&surface).await, "Only");
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(surface.visible_count(), 1);
    assert_eq!(surface.history().len(), 1);
}
