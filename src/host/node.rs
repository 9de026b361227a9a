//! 告警节点 - 宿主页面中一条告警的文本容器
//!
//! 节点由宿主页面拥有，格式化器只读取内容，并且只写一次：
//! 设置 "已处理" 标记 + 替换渲染后的 HTML。

use serde::{Deserialize, Serialize};

/// UI 控件类 span（"显示更多" 按钮、省略号），提取文本时跳过
pub const AFFORDANCE_CLASSES: &[&str] = &["ShowMoreLessButton", "Ellipses"];

/// 告警中的一个 span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSpan {
    /// class 列表
    #[serde(default, rename = "class", deserialize_with = "de_classes")]
    pub classes: Vec<String>,
    /// 文本内容
    #[serde(default)]
    pub text: String,
}

impl AlertSpan {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            classes: Vec::new(),
            text: text.into(),
        }
    }

    /// 添加 class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// 是否为 UI 控件（不属于告警正文）
    pub fn is_affordance(&self) -> bool {
        AFFORDANCE_CLASSES.iter().any(|c| self.has_class(c))
    }
}

/// `"class": "A B"` 与 `"class": ["A", "B"]` 两种写法都接受
fn de_classes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Classes {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Classes::deserialize(deserializer)? {
        Classes::One(s) => s.split_whitespace().map(str::to_string).collect(),
        Classes::Many(v) => v,
    })
}

/// 告警原始内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlertContent {
    /// span 结构
    Spans { spans: Vec<AlertSpan> },
    /// 纯文本（扁平化后的 textContent）
    Plain(String),
}

/// 告警节点
#[derive(Debug, Clone)]
pub struct AlertNode {
    content: AlertContent,
    /// 已处理标记，设置后在节点生命周期内不会清除
    formatted: bool,
    html: Option<String>,
}

impl AlertNode {
    pub fn new(content: AlertContent) -> Self {
        Self {
            content,
            formatted: false,
            html: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(AlertContent::Plain(text.into()))
    }

    pub fn with_spans(spans: Vec<AlertSpan>) -> Self {
        Self::new(AlertContent::Spans { spans })
    }

    pub fn content(&self) -> &AlertContent {
        &self.content
    }

    pub fn is_formatted(&self) -> bool {
        self.formatted
    }

    /// 设置已处理标记，返回之前是否已设置
    pub(crate) fn mark_formatted(&mut self) -> bool {
        std::mem::replace(&mut self.formatted, true)
    }

    /// 渲染后的 HTML；未格式化时为 `None`（页面显示原始内容）
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub(crate) fn set_html(&mut self, html: String) {
        self.html = Some(html);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_formatted_is_sticky() {
        let mut node = AlertNode::plain("hello");
        assert!(!node.is_formatted());

        assert!(!node.mark_formatted());
        assert!(node.mark_formatted());
        assert!(node.is_formatted());
    }

    #[test]
    fn test_span_affordance_detection() {
        assert!(AlertSpan::new("more").with_class("ShowMoreLessButton").is_affordance());
        assert!(AlertSpan::new("...").with_class("Ellipses").is_affordance());
        assert!(!AlertSpan::new("text").with_class("Message").is_affordance());
    }

    #[test]
    fn test_content_deserialize_plain_and_spans() {
        let plain: AlertContent = serde_json::from_str(r#""just text""#).unwrap();
        assert_eq!(plain, AlertContent::Plain("just text".to_string()));

        let spans: AlertContent = serde_json::from_str(
            r#"{"spans": [{"class": "Text Bold", "text": "a"}, {"class": ["Ellipses"], "text": "…"}, {"text": "b"}]}"#,
        )
        .unwrap();
        match spans {
            AlertContent::Spans { spans } => {
                assert_eq!(spans.len(), 3);
                assert_eq!(spans[0].classes, vec!["Text", "Bold"]);
                assert!(spans[1].is_affordance());
                assert!(spans[2].classes.is_empty());
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }
}
