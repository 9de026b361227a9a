//! 告警格式化器 - 把轻量标记的告警文本转换为带样式的 HTML
//!
//! 处理步骤：
//! 1. 提取文本（span 结构或扁平文本）
//! 2. 规范化（换行、实体、`<br>`）
//! 3. 提取 `##标题##` 弹窗块并放入共享队列
//! 4. 渲染 HTML（转义 → 行内规则 → 列表 → 换行）
//! 5. 识别裸 URL（可关闭）
//!
//! 每个节点只处理一次：第一步就检查并设置节点的已处理标记。

pub mod linkify;
pub mod modal_block;
pub mod render;
pub mod text;

use std::sync::Arc;
use tracing::{debug, info};

use crate::host::{AlertBoard, AlertNode, EventBus, PageEvent, Subscription};
use crate::modal::{EnqueueResult, ModalQueue, ModalRecord};

pub use modal_block::extract_modals;

/// 格式化选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterOptions {
    /// 识别裸 URL
    pub linkify: bool,
    /// 页面路径包含其中任一片段时不入队弹窗
    pub suppressed_paths: Vec<String>,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            linkify: true,
            suppressed_paths: vec!["TicketEdit".to_string()],
        }
    }
}

/// 单个节点的格式化结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// 节点已处理过，本次不做任何事
    AlreadyFormatted,
    Formatted {
        /// 提取到的弹窗数
        extracted: usize,
        /// 实际入队数（去重、路径抑制后）
        queued: usize,
    },
}

/// 把规范化后的文本渲染为 HTML
pub fn render_html(text: &str, linkify: bool) -> String {
    let html = render::render(text);
    if linkify {
        linkify::linkify_html(&html)
    } else {
        html
    }
}

/// 告警格式化器
pub struct Formatter {
    options: FormatterOptions,
    queue: ModalQueue,
    bus: EventBus,
    page_path: String,
}

impl Formatter {
    pub fn new(queue: ModalQueue, bus: EventBus) -> Self {
        Self {
            options: FormatterOptions::default(),
            queue,
            bus,
            page_path: String::new(),
        }
    }

    pub fn with_options(mut self, options: FormatterOptions) -> Self {
        self.options = options;
        self
    }

    /// 设置当前页面路径（用于弹窗抑制判断）
    pub fn with_page_path(mut self, path: impl Into<String>) -> Self {
        self.page_path = path.into();
        self
    }

    pub fn options(&self) -> &FormatterOptions {
        &self.options
    }

    /// 当前页面是否抑制弹窗入队
    pub fn modals_suppressed(&self) -> bool {
        self.options
            .suppressed_paths
            .iter()
            .any(|p| !p.is_empty() && self.page_path.contains(p.as_str()))
    }

    /// 格式化单个告警节点（幂等）
    pub fn format(&self, node: &mut AlertNode) -> FormatOutcome {
        if node.mark_formatted() {
            return FormatOutcome::AlreadyFormatted;
        }

        let (html, outcome) = self.format_text(&text::extract_text(node.content()));
        node.set_html(html);
        outcome
    }

    /// 格式化已提取的原始文本：规范化、入队弹窗并返回 HTML
    ///
    /// 不涉及节点标记，重复调用会重复渲染（弹窗仍由队列去重）。
    pub fn format_text(&self, raw: &str) -> (String, FormatOutcome) {
        let text = text::normalize(raw);

        let modals = extract_modals(&text);
        let extracted = modals.len();
        let queued = self.publish(modals);

        let html = render_html(&text, self.options.linkify);
        debug!(extracted, queued, "Alert formatted");

        (html, FormatOutcome::Formatted { extracted, queued })
    }

    /// 入队弹窗；本次至少入队一条时发出一次 `ModalQueued`
    fn publish(&self, modals: Vec<ModalRecord>) -> usize {
        if modals.is_empty() {
            return 0;
        }
        if self.modals_suppressed() {
            debug!(path = %self.page_path, count = modals.len(), "Modal queuing suppressed on this page");
            return 0;
        }

        let queued = modals
            .into_iter()
            .filter(|record| self.queue.enqueue(record.clone()) == EnqueueResult::Queued)
            .count();

        if queued > 0 {
            info!(queued, pending = self.queue.pending_len(), "Queued modals");
            self.bus.emit(PageEvent::ModalQueued);
        }
        queued
    }

    /// 处理容器中已有的告警，并订阅后续新增/重新渲染的告警
    pub fn attach(self: &Arc<Self>, board: &AlertBoard) -> Subscription {
        let formatter = Arc::clone(self);
        let target = board.clone();
        let subscription = board.observe(move |change| {
            target.with_node_mut(change.id(), |node| formatter.format(node));
        });

        let ids = board.ids();
        info!(alerts = ids.len(), "Formatting existing alerts");
        for id in ids {
            board.with_node_mut(id, |node| self.format(node));
        }

        subscription
    }
}
