//! 弹窗展示面
//!
//! `DialogSurface` 负责把弹窗放到用户面前，并返回一个在用户确认后完成的
//! `Acknowledgement`。`OverlaySurface` 是页面 body 的内存模型：
//! 打开弹窗即追加遮罩层元素，点击确认即移除并发出确认信号。

use anyhow::Result;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{oneshot, Notify};
use tracing::debug;

use super::dialog::ModalDialog;

/// 确认信号发送端（确认按钮）
#[derive(Debug)]
pub struct AckSender(oneshot::Sender<()>);

impl AckSender {
    pub fn acknowledge(self) {
        // 接收端已放弃等待时无需处理
        let _ = self.0.send(());
    }
}

/// 等待用户确认；发送端被丢弃也视为已关闭
#[derive(Debug)]
pub struct Acknowledgement {
    rx: oneshot::Receiver<()>,
}

impl Acknowledgement {
    pub fn channel() -> (AckSender, Acknowledgement) {
        let (tx, rx) = oneshot::channel();
        (AckSender(tx), Acknowledgement { rx })
    }

    /// 已确认的信号（同步展示面使用）
    pub fn acknowledged() -> Self {
        let (tx, ack) = Self::channel();
        tx.acknowledge();
        ack
    }

    pub async fn wait(self) {
        let _ = self.rx.await;
    }
}

/// 弹窗展示面
pub trait DialogSurface: Send + Sync {
    /// 展示面名称（用于日志）
    fn name(&self) -> &str;

    /// 打开弹窗，返回确认信号
    fn open(&self, dialog: &ModalDialog) -> Result<Acknowledgement>;

    /// 关闭已打开但尚未确认的弹窗（drain 被取消时调用）
    ///
    /// 无法撤回已展示内容的展示面保持默认的空实现。
    fn close(&self, _dialog: &ModalDialog) {}
}

/// 页面中的遮罩层元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayElement {
    pub id: u64,
    pub title: String,
    pub html: String,
}

#[derive(Default)]
struct OverlayState {
    visible: Vec<(OverlayElement, AckSender)>,
    history: Vec<String>,
    next_id: u64,
}

/// 页面 body 上的遮罩层弹窗
#[derive(Clone, Default)]
pub struct OverlaySurface {
    state: Arc<Mutex<OverlayState>>,
    opened: Arc<Notify>,
}

impl OverlaySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, OverlayState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 当前可见的遮罩层
    pub fn visible(&self) -> Vec<OverlayElement> {
        self.lock().visible.iter().map(|(e, _)| e.clone()).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.lock().visible.len()
    }

    /// 曾经打开过的弹窗标题（按打开顺序）
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// 点击最上层弹窗的确认按钮
    pub fn acknowledge_top(&self) -> bool {
        let top = self.lock().visible.pop();
        match top {
            Some((element, tx)) => {
                debug!(overlay = element.id, title = %element.title, "Overlay acknowledged");
                tx.acknowledge();
                true
            }
            None => false,
        }
    }

    /// 等待出现可见弹窗
    pub async fn wait_for_dialog(&self) -> OverlayElement {
        loop {
            if let Some(top) = self.visible().pop() {
                return top;
            }
            self.opened.notified().await;
        }
    }
}

impl DialogSurface for OverlaySurface {
    fn name(&self) -> &str {
        "overlay"
    }

    fn open(&self, dialog: &ModalDialog) -> Result<Acknowledgement> {
        let (tx, ack) = Acknowledgement::channel();
        {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.history.push(dialog.title.clone());
            state.visible.push((
                OverlayElement {
                    id,
                    title: dialog.title.clone(),
                    html: dialog.to_html(),
                },
                tx,
            ));
        }
        self.opened.notify_one();
        Ok(ack)
    }

    fn close(&self, dialog: &ModalDialog) {
        let html = dialog.to_html();
        let mut state = self.lock();
        // 丢弃 AckSender，等待方视为已关闭
        state.visible.retain(|(element, _)| {
            let keep = element.html != html;
            if !keep {
                debug!(overlay = element.id, title = %element.title, "Overlay closed");
            }
            keep
        });
    }
}
