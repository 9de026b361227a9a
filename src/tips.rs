//! 格式说明块 - 在告警编辑区插入标记语法提示
//!
//! 编辑区的工具栏与正文 section 可能晚于脚本出现，
//! 因此按固定间隔有限次数重试，找到目标或已插入即停止。
//! 之后新打开或变化的编辑标签页由 `watch_tabs` 监听，每次变更后重新插入。

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// 说明块 class，用于判断是否已插入
pub const TIPS_CLASS: &str = "formatting-tips";

const TIPS_STYLE: &str = "background:#f9f9f9; border:1px solid #ccc; border-radius:6px; \
padding:10px 12px; margin:10px 0; font-size:12px; line-height:1.4; color:#333; \
font-family:system-ui,-apple-system,'Segoe UI',Roboto,Arial;";

/// (语法, 说明)
const TIPS: &[(&str, &str)] = &[
    ("<code>-</code>", "Bullet"),
    ("<code>--</code>", "Indented bullet"),
    ("<code>**Bold**</code>", "Bold text"),
    ("<code>*h*Heading*h*</code>", "Heading"),
    ("<code>##Title##</code>", "Start modal block"),
    ("<code>&gt;</code>", "New modal line"),
    ("<code>&gt;&gt;</code>", "Continuation within same modal"),
    ("Non-&gt; lines", "end the modal body"),
];

/// 格式说明块 HTML
pub fn formatting_tips_html() -> String {
    let mut html = format!(
        r#"<div class="{}" style="{}"><strong>Formatting Instructions</strong><br>"#,
        TIPS_CLASS, TIPS_STYLE
    );
    let lines: Vec<String> = TIPS
        .iter()
        .map(|(syntax, meaning)| format!("• {} {}", syntax, meaning))
        .collect();
    html.push_str(&lines.join("<br>"));
    html.push_str("</div>");
    html
}

/// 说明块的插入目标（当前激活的编辑标签页）
pub trait TipsTarget {
    /// 是否已经插入过说明块
    fn has_tips(&self) -> bool;

    /// 工具栏与正文 section 是否都已出现
    fn anchors_present(&self) -> bool;

    /// 在工具栏之后、正文 section 之前插入
    fn insert_tips(&mut self, html: String);
}

/// 单次插入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectOutcome {
    Inserted,
    AlreadyPresent,
    /// 工具栏或 section 尚未出现
    TargetMissing,
}

/// 尝试插入一次
pub fn inject_tips<T: TipsTarget + ?Sized>(target: &mut T) -> InjectOutcome {
    if !target.anchors_present() {
        return InjectOutcome::TargetMissing;
    }
    if target.has_tips() {
        return InjectOutcome::AlreadyPresent;
    }
    target.insert_tips(formatting_tips_html());
    info!("Formatting tips inserted under toolbar");
    InjectOutcome::Inserted
}

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 20,
            interval: Duration::from_millis(500),
        }
    }
}

/// 有限次数重试插入，返回最后一次尝试的结果
pub async fn inject_with_retry<T: TipsTarget + ?Sized>(
    target: &mut T,
    policy: RetryPolicy,
) -> InjectOutcome {
    let mut outcome = InjectOutcome::TargetMissing;
    for attempt in 1..=policy.attempts {
        outcome = inject_tips(target);
        if outcome != InjectOutcome::TargetMissing {
            return outcome;
        }
        debug!(attempt, "Tips target not ready");
        if attempt < policy.attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }
    outcome
}

/// 编辑标签页的内存模型
#[derive(Debug, Clone, Default)]
pub struct EditorPanel {
    pub has_toolbar: bool,
    pub has_section: bool,
    /// 工具栏与 section 之间插入的元素
    pub inserted: Vec<String>,
}

impl EditorPanel {
    pub fn ready() -> Self {
        Self {
            has_toolbar: true,
            has_section: true,
            inserted: Vec::new(),
        }
    }
}

impl TipsTarget for EditorPanel {
    fn has_tips(&self) -> bool {
        let marker = format!(r#"class="{}""#, TIPS_CLASS);
        self.inserted.iter().any(|html| html.contains(&marker))
    }

    fn anchors_present(&self) -> bool {
        self.has_toolbar && self.has_section
    }

    fn insert_tips(&mut self, html: String) {
        self.inserted.push(html);
    }
}

#[derive(Debug, Default)]
struct TabsState {
    panels: Vec<EditorPanel>,
    active: Option<usize>,
}

/// 编辑标签页集合；打开或修改标签页时发出变更通知
#[derive(Debug, Clone, Default)]
pub struct EditorTabs {
    state: Arc<Mutex<TabsState>>,
    changed: Arc<Notify>,
}

impl EditorTabs {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TabsState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 打开新标签页并设为当前标签页
    pub fn open(&self, panel: EditorPanel) -> usize {
        let index = {
            let mut state = self.lock();
            state.panels.push(panel);
            let index = state.panels.len() - 1;
            state.active = Some(index);
            index
        };
        debug!(tab = index, "Editor tab opened");
        self.changed.notify_one();
        index
    }

    /// 切换当前标签页
    pub fn activate(&self, index: usize) -> bool {
        {
            let mut state = self.lock();
            if index >= state.panels.len() {
                return false;
            }
            state.active = Some(index);
        }
        self.changed.notify_one();
        true
    }

    /// 修改标签页内容（例如工具栏延迟渲染）
    pub fn update(&self, index: usize, f: impl FnOnce(&mut EditorPanel)) -> bool {
        {
            let mut state = self.lock();
            match state.panels.get_mut(index) {
                Some(panel) => f(panel),
                None => return false,
            }
        }
        self.changed.notify_one();
        true
    }

    pub fn panel(&self, index: usize) -> Option<EditorPanel> {
        self.lock().panels.get(index).cloned()
    }

    /// 向当前标签页插入一次；没有标签页时返回 `None`
    pub fn inject_active(&self) -> Option<InjectOutcome> {
        let mut state = self.lock();
        let index = state.active?;
        state.panels.get_mut(index).map(inject_tips)
    }
}

/// 监听标签页变更，每次变更后向当前标签页插入说明块
///
/// 返回的任务不会自行结束，调用方不再需要时 abort。
pub fn watch_tabs(tabs: &EditorTabs) -> JoinHandle<()> {
    let tabs = tabs.clone();
    tokio::spawn(async move {
        loop {
            if let Some(outcome) = tabs.inject_active() {
                debug!(?outcome, "Tips injection after tab change");
            }
            tabs.changed.notified().await;
        }
    })
}
