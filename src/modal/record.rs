//! 弹窗记录

use serde::{Deserialize, Serialize};

/// 弹窗记录：由格式化器创建，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModalRecord {
    pub title: String,
    pub body: String,
}

impl ModalRecord {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// 去重键：标题与正文精确匹配
    pub fn key(&self) -> String {
        format!("{}::{}", self.title, self.body)
    }
}
