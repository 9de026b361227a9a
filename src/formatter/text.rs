//! 文本提取与规范化
//!
//! - 从告警节点提取纯文本（span 结构或扁平文本）
//! - 统一换行、解码少量固定实体、把 `<br>` 标记转为换行
//! - 渲染前的 HTML 转义

use std::sync::LazyLock;
use regex::Regex;

use crate::host::{AlertContent, AlertSpan};

static BR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("Invalid br regex"));

/// 实体解码表，顺序即替换顺序（`&amp;` 先于其余实体）
const ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// 从告警内容提取纯文本
///
/// span 结构：每个 span 文本 trim 后追加一个换行，跳过 UI 控件 span。
/// 没有 span 时退回扁平文本。
pub fn extract_text(content: &AlertContent) -> String {
    match content {
        AlertContent::Spans { spans } if !spans.is_empty() => join_spans(spans),
        AlertContent::Spans { .. } => String::new(),
        AlertContent::Plain(text) => text.clone(),
    }
}

fn join_spans(spans: &[AlertSpan]) -> String {
    let mut text = String::new();
    for span in spans.iter().filter(|s| !s.is_affordance()) {
        text.push_str(span.text.trim());
        text.push('\n');
    }
    text
}

/// 规范化提取出的文本
pub fn normalize(text: &str) -> String {
    let text = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace("&#xA;", "\n");
    let mut text = BR_TAG.replace_all(&text, "\n").into_owned();
    for (entity, decoded) in ENTITIES {
        text = text.replace(entity, decoded);
    }
    text
}

/// 转义 HTML 特殊字符
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_spans_skips_affordances() {
        let content = AlertContent::Spans {
            spans: vec![
                AlertSpan::new("  First line "),
                AlertSpan::new("...").with_class("Ellipses"),
                AlertSpan::new("Second"),
                AlertSpan::new("Show more").with_class("ShowMoreLessButton"),
            ],
        };
        assert_eq!(extract_text(&content), "First line\nSecond\n");
    }

    #[test]
    fn test_extract_plain_fallback() {
        assert_eq!(extract_text(&AlertContent::Plain("a\nb".into())), "a\nb");
        assert_eq!(extract_text(&AlertContent::Spans { spans: vec![] }), "");
    }

    #[test]
    fn test_normalize_line_endings_and_breaks() {
        assert_eq!(normalize("a\r\nb\rc&#xA;d<br>e<BR/>f<br />g"), "a\nb\nc\nd\ne\nf\ng");
    }

    #[test]
    fn test_normalize_decodes_entities() {
        assert_eq!(
            normalize("&lt;b&gt; &amp; &quot;q&quot; &#39;s&#39;"),
            "<b> & \"q\" 's'"
        );
        // &amp; 先解码，因此双重编码会被解到底
        assert_eq!(normalize("&amp;lt;"), "<");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
