//! Message Bar Enhancer - 告警栏格式化与弹窗展示
//!
//! 两个组件组成单向管线：
//! - `formatter`：把轻量标记的告警文本转换为 HTML，并提取 `##标题##` 弹窗块
//! - `modal`：共享弹窗队列，去重后逐个展示，每个弹窗确认后才展示下一个

pub mod cli;
pub mod config;
pub mod enhancer;
pub mod formatter;
pub mod host;
pub mod modal;
pub mod tips;

pub use config::{Settings, TimingSettings};
pub use enhancer::Enhancer;
pub use formatter::{render_html, FormatOutcome, Formatter, FormatterOptions};
pub use host::{AlertBoard, AlertChange, AlertContent, AlertId, AlertNode, AlertSpan, EventBus, PageEvent, Subscription, Visibility};
pub use modal::{DrainOutcome, ModalDialog, ModalPresenter, ModalQueue, ModalRecord, OverlaySurface, PresenterTiming};
pub use tips::{
    formatting_tips_html, inject_tips, inject_with_retry, watch_tabs, EditorPanel, EditorTabs, InjectOutcome,
    RetryPolicy, TipsTarget,
};
