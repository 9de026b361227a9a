//! 弹窗模块 - 弹窗记录、共享队列与逐个展示
//!
//! 格式化器把提取出的 `ModalRecord` 放入 `ModalQueue`，
//! `ModalPresenter` 从同一个队列中逐个取出并通过 `DialogSurface` 展示。

pub mod dialog;
pub mod presenter;
pub mod queue;
pub mod record;
pub mod surface;

pub use dialog::{DialogBody, ModalDialog};
pub use presenter::{DrainOutcome, ModalPresenter, PresenterTiming};
pub use queue::{DrainState, EnqueueResult, ModalQueue};
pub use record::ModalRecord;
pub use surface::{AckSender, Acknowledgement, DialogSurface, OverlayElement, OverlaySurface};
