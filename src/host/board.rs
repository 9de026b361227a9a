//! 告警容器 - 宿主页面告警区域的内存模型
//!
//! `observe` 是与具体变更通知机制解耦的订阅接口：
//! 新告警加入时按插入顺序回调，回调在释放容器锁之后执行，
//! 因此回调内可以再次调用 `with_node_mut`。

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::node::AlertNode;

/// 告警在容器中的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertId(usize);

impl AlertId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 容器变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertChange {
    /// 新增告警
    Added(AlertId),
    /// 告警内容被替换（宿主重新渲染）
    Replaced(AlertId),
}

impl AlertChange {
    pub fn id(&self) -> AlertId {
        match self {
            AlertChange::Added(id) | AlertChange::Replaced(id) => *id,
        }
    }
}

type Observer = Arc<dyn Fn(AlertChange) + Send + Sync>;

#[derive(Default)]
struct BoardState {
    nodes: Vec<AlertNode>,
    observers: Vec<(u64, Observer)>,
    next_observer: u64,
}

/// 告警容器
#[derive(Clone, Default)]
pub struct AlertBoard {
    state: Arc<Mutex<BoardState>>,
}

impl AlertBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        // 观察者回调不在锁内执行，poison 只可能来自测试中的 panic
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 追加告警并通知观察者
    pub fn push(&self, node: AlertNode) -> AlertId {
        let (id, observers) = {
            let mut state = self.lock();
            state.nodes.push(node);
            let id = AlertId(state.nodes.len() - 1);
            (id, Self::snapshot_observers(&state))
        };
        debug!(alert = id.index(), observers = observers.len(), "Alert added");
        Self::notify(&observers, AlertChange::Added(id));
        id
    }

    /// 宿主重新渲染告警：内容替换为新节点（已处理标记随之重置）
    pub fn replace(&self, id: AlertId, node: AlertNode) -> bool {
        let observers = {
            let mut state = self.lock();
            match state.nodes.get_mut(id.0) {
                Some(slot) => *slot = node,
                None => return false,
            }
            Self::snapshot_observers(&state)
        };
        Self::notify(&observers, AlertChange::Replaced(id));
        true
    }

    /// 对指定告警执行可变操作
    pub fn with_node_mut<R>(&self, id: AlertId, f: impl FnOnce(&mut AlertNode) -> R) -> Option<R> {
        let mut state = self.lock();
        state.nodes.get_mut(id.0).map(f)
    }

    /// 读取指定告警（克隆）
    pub fn get(&self, id: AlertId) -> Option<AlertNode> {
        self.lock().nodes.get(id.0).cloned()
    }

    /// 当前所有告警 ID（插入顺序）
    pub fn ids(&self) -> Vec<AlertId> {
        (0..self.lock().nodes.len()).map(AlertId).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 订阅容器变更，返回的 `Subscription` 被 drop 时自动退订
    pub fn observe(&self, on_change: impl Fn(AlertChange) + Send + Sync + 'static) -> Subscription {
        let mut state = self.lock();
        let token = state.next_observer;
        state.next_observer += 1;
        state.observers.push((token, Arc::new(on_change)));
        Subscription {
            board: self.clone(),
            token,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    fn snapshot_observers(state: &BoardState) -> Vec<Observer> {
        state.observers.iter().map(|(_, o)| Arc::clone(o)).collect()
    }

    fn notify(observers: &[Observer], change: AlertChange) {
        for observer in observers {
            observer(change);
        }
    }

    fn unobserve(&self, token: u64) {
        self.lock().observers.retain(|(t, _)| *t != token);
    }
}

/// 变更订阅句柄
pub struct Subscription {
    board: AlertBoard,
    token: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.board.unobserve(self.token);
    }
}
