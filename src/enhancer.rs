//! 组装 - 把设置、共享队列、事件总线、格式化器与展示器连在一起
//!
//! 单向管线：告警容器变更 → 格式化器（入队 + `ModalQueued`）→ 展示器 drain。

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Settings;
use crate::formatter::Formatter;
use crate::host::{AlertBoard, EventBus, Subscription};
use crate::modal::{DialogSurface, ModalPresenter, ModalQueue};

/// 页面增强器
pub struct Enhancer {
    settings: Settings,
    queue: ModalQueue,
    bus: EventBus,
    formatter: Arc<Formatter>,
    presenter: Arc<ModalPresenter>,
}

impl Enhancer {
    /// `page_path` 为当前页面路径，用于弹窗抑制判断
    pub fn new(settings: Settings, page_path: &str, surface: Arc<dyn DialogSurface>) -> Self {
        let queue = ModalQueue::new();
        let bus = EventBus::new();

        let formatter = Formatter::new(queue.clone(), bus.clone())
            .with_options(settings.formatter_options())
            .with_page_path(page_path);
        let presenter = ModalPresenter::new(queue.clone(), surface)
            .with_timing(settings.timing.presenter_timing());

        Self {
            settings,
            queue,
            bus,
            formatter: Arc::new(formatter),
            presenter: Arc::new(presenter),
        }
    }

    /// 格式化告警容器并监听后续变更
    ///
    /// 设置中关闭格式化或容器不存在时什么都不做，返回 `None`。
    pub fn attach_alerts(&self, board: Option<&AlertBoard>) -> Option<Subscription> {
        if !self.settings.format {
            info!("Alert formatting disabled in settings");
            return None;
        }
        let Some(board) = board else {
            info!("Alert container not found, skipping");
            return None;
        };
        Some(self.formatter.attach(board))
    }

    /// 启动展示器的触发循环
    pub fn start_presenter(&self, document_ready: bool) -> JoinHandle<()> {
        self.presenter.attach(&self.bus, document_ready)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn queue(&self) -> &ModalQueue {
        &self.queue
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn formatter(&self) -> &Arc<Formatter> {
        &self.formatter
    }

    pub fn presenter(&self) -> &Arc<ModalPresenter> {
        &self.presenter
    }
}
