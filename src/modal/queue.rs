//! 弹窗队列 - 格式化器与展示器共享的页面级状态
//!
//! - `pending`：按插入顺序排列的待展示记录
//! - `processed`：已展示（或正在展示）的去重键，只增不减
//! - `state`：单飞 drain 守卫
//!
//! 三者在同一把锁内，"没有待展示记录 → 回到 Idle" 与并发入队之间不会交错。

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use super::record::ModalRecord;

/// 入队结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueResult {
    Queued,
    /// 已在队列中等待
    AlreadyQueued,
    /// 已展示过
    AlreadyShown,
}

/// drain 状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrainState {
    #[default]
    Idle,
    Draining,
}

#[derive(Debug, Default)]
struct QueueState {
    pending: Vec<ModalRecord>,
    processed: HashSet<String>,
    state: DrainState,
}

/// 弹窗队列句柄（克隆共享同一份状态）
#[derive(Debug, Clone, Default)]
pub struct ModalQueue {
    inner: Arc<Mutex<QueueState>>,
}

impl ModalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 入队（已排队或已展示的记录被去重）
    pub fn enqueue(&self, record: ModalRecord) -> EnqueueResult {
        let mut state = self.lock();
        let key = record.key();

        if state.processed.contains(&key) {
            debug!(title = %record.title, "Modal already shown, skipping");
            return EnqueueResult::AlreadyShown;
        }
        if state.pending.iter().any(|r| r.key() == key) {
            debug!(title = %record.title, "Modal already queued, skipping");
            return EnqueueResult::AlreadyQueued;
        }

        state.pending.push(record);
        EnqueueResult::Queued
    }

    /// 待展示记录快照
    pub fn pending(&self) -> Vec<ModalRecord> {
        self.lock().pending.clone()
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn processed_len(&self) -> usize {
        self.lock().processed.len()
    }

    pub fn is_processed(&self, record: &ModalRecord) -> bool {
        self.lock().processed.contains(&record.key())
    }

    pub fn drain_state(&self) -> DrainState {
        self.lock().state
    }

    /// 进入 Draining；已在 drain 中则返回 false
    pub(crate) fn begin_drain(&self) -> bool {
        let mut state = self.lock();
        if state.state == DrainState::Draining {
            return false;
        }
        state.state = DrainState::Draining;
        info!(pending = state.pending.len(), "Modal drain started");
        true
    }

    /// 第一条未展示的记录；没有时原子地回到 Idle
    pub(crate) fn next_or_idle(&self) -> Option<ModalRecord> {
        let mut state = self.lock();
        let next = state
            .pending
            .iter()
            .find(|r| !state.processed.contains(&r.key()))
            .cloned();
        if next.is_none() {
            state.state = DrainState::Idle;
            info!(shown = state.processed.len(), "Modal queue complete");
        }
        next
    }

    /// 记录已开始展示：移出队列并加入 processed
    pub(crate) fn mark_shown(&self, record: &ModalRecord) {
        let mut state = self.lock();
        let key = record.key();
        state.pending.retain(|r| r.key() != key);
        state.processed.insert(key);
    }

    /// 提前结束本轮 drain（展示失败时），记录保留在队列中
    pub(crate) fn abort_drain(&self) {
        self.lock().state = DrainState::Idle;
    }
}
