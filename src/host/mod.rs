//! 宿主页面抽象 - 告警节点、告警容器与页面事件
//!
//! 真实页面中的 DOM 变更监听被建模为 `AlertBoard::observe` 订阅接口，
//! 格式化与弹窗逻辑因此可以直接用合成输入测试。

pub mod board;
pub mod events;
pub mod node;

pub use board::{AlertBoard, AlertChange, AlertId, Subscription};
pub use events::{EventBus, PageEvent, Visibility};
pub use node::{AlertContent, AlertNode, AlertSpan};
