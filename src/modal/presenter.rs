//! 弹窗展示器 - 逐个展示队列中的弹窗
//!
//! 状态机：`Idle → Draining → Idle`。
//! drain 每次选出第一条未展示记录，标记为已展示并打开弹窗，
//! 等用户确认后再继续下一条；任何时刻最多一个弹窗可见。
//! 并发触发的 drain 在已有 drain 进行时直接返回。
//!
//! 触发源：
//! - `ModalQueued` 事件（等待 settle 延迟）
//! - 页面变为可见
//! - 文档就绪（等待 ready 延迟）
//! - attach 之后的固定兜底延迟

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::host::{EventBus, PageEvent, Visibility};

use super::dialog::ModalDialog;
use super::queue::ModalQueue;
use super::surface::DialogSurface;

/// 展示器时间参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenterTiming {
    /// 收到入队事件后等待页面渲染稳定
    pub settle_delay: Duration,
    /// 文档就绪后的延迟
    pub ready_delay: Duration,
    /// attach 后的兜底 drain 延迟
    pub fallback_delay: Duration,
    /// 一个弹窗确认后到下一个弹窗之间的间隔
    pub advance_delay: Duration,
}

impl Default for PresenterTiming {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(50),
            ready_delay: Duration::from_millis(100),
            fallback_delay: Duration::from_millis(1000),
            advance_delay: Duration::from_millis(10),
        }
    }
}

impl PresenterTiming {
    /// 所有延迟为零（测试和 CLI 使用）
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            ready_delay: Duration::ZERO,
            fallback_delay: Duration::ZERO,
            advance_delay: Duration::ZERO,
        }
    }
}

/// 一次 drain 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// 没有待展示记录
    Idle,
    /// 已有 drain 在进行
    AlreadyDraining,
    /// 展示并确认了若干弹窗
    Completed { shown: usize },
    /// 展示面打开失败，剩余记录留待下次触发
    SurfaceFailed { shown: usize },
}

/// drain 被取消时关闭仍在等待确认的弹窗，并把队列放回 Idle
struct DrainGuard<'a> {
    queue: &'a ModalQueue,
    surface: &'a dyn DialogSurface,
    showing: Option<ModalDialog>,
    armed: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if let Some(dialog) = self.showing.take() {
            debug!(title = %dialog.title, "Drain cancelled, closing open dialog");
            self.surface.close(&dialog);
        }
        if self.armed {
            self.queue.abort_drain();
        }
    }
}

/// 弹窗展示器
pub struct ModalPresenter {
    queue: ModalQueue,
    surface: Arc<dyn DialogSurface>,
    timing: PresenterTiming,
}

impl ModalPresenter {
    pub fn new(queue: ModalQueue, surface: Arc<dyn DialogSurface>) -> Self {
        Self {
            queue,
            surface,
            timing: PresenterTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: PresenterTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn queue(&self) -> &ModalQueue {
        &self.queue
    }

    pub fn timing(&self) -> PresenterTiming {
        self.timing
    }

    /// 依次展示所有未展示的弹窗，每个弹窗确认后才展示下一个
    pub async fn drain(&self) -> DrainOutcome {
        if !self.queue.begin_drain() {
            debug!("Drain already in flight, skipping");
            return DrainOutcome::AlreadyDraining;
        }
        let mut guard = DrainGuard {
            queue: &self.queue,
            surface: self.surface.as_ref(),
            showing: None,
            armed: true,
        };

        let mut shown = 0usize;
        while let Some(record) = self.queue.next_or_idle() {
            let dialog = ModalDialog::from_record(&record);
            let ack = match self.surface.open(&dialog) {
                Ok(ack) => ack,
                Err(e) => {
                    warn!(
                        surface = self.surface.name(),
                        title = %record.title,
                        error = %e,
                        "Failed to open modal dialog"
                    );
                    self.queue.abort_drain();
                    guard.armed = false;
                    return DrainOutcome::SurfaceFailed { shown };
                }
            };
            self.queue.mark_shown(&record);
            info!(surface = self.surface.name(), title = %record.title, "Modal shown");

            guard.showing = Some(dialog);
            ack.wait().await;
            guard.showing = None;
            shown += 1;
            debug!(title = %record.title, "Modal acknowledged");

            if !self.timing.advance_delay.is_zero() {
                tokio::time::sleep(self.timing.advance_delay).await;
            }
        }
        guard.armed = false;

        if shown == 0 {
            DrainOutcome::Idle
        } else {
            DrainOutcome::Completed { shown }
        }
    }

    /// 延迟后执行一次 drain
    pub fn schedule(self: &Arc<Self>, delay: Duration) -> JoinHandle<DrainOutcome> {
        let presenter = Arc::clone(self);
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            presenter.drain().await
        })
    }

    /// 处理页面事件
    pub fn on_event(self: &Arc<Self>, event: PageEvent) {
        match event {
            PageEvent::ModalQueued => {
                debug!("Modal queued event received");
                self.schedule(self.timing.settle_delay);
            }
            PageEvent::VisibilityChanged(Visibility::Visible) => {
                self.schedule(Duration::ZERO);
            }
            PageEvent::VisibilityChanged(Visibility::Hidden) => {}
            PageEvent::DocumentReady => {
                self.schedule(self.timing.ready_delay);
            }
        }
    }

    /// 挂载到事件总线：订阅触发事件，并安排兜底 drain
    ///
    /// `document_ready` 为 true 表示文档已加载完成，不会再收到 `DocumentReady`。
    pub fn attach(self: &Arc<Self>, bus: &EventBus, document_ready: bool) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        let presenter = Arc::clone(self);

        tokio::spawn(async move {
            info!("Modal presenter attached");
            presenter.schedule(presenter.timing.fallback_delay);
            if document_ready {
                presenter.schedule(presenter.timing.ready_delay);
            }

            loop {
                match rx.recv().await {
                    Ok(event) => presenter.on_event(event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Presenter lagged behind page events");
                        presenter.schedule(Duration::ZERO);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("Event bus closed, presenter detached");
        })
    }
}
