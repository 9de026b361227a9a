//! HTML 渲染管线
//!
//! 输入为规范化后的纯文本，按固定顺序经过以下阶段：
//! 1. 转义（实体安全）
//! 2. 行内规则：`*h*标题*h*` → `<h4>`，`**粗体**` → `<strong>`（逐行），
//!    然后 `##标题##` → `<strong>`（整段，标记内空白可跨行）
//! 3. 行分类：`-- ` 开头为缩进列表项，`- ` 开头为普通列表项，其余为文本行
//! 4. 相邻同类列表项合并为一个列表
//! 5. 换行折叠：连续两个及以上换行 → `<br><br>`，单个换行 → `<br>`
//!
//! 标题与粗体规则只在单行内生效，两类列表前缀互不重叠。

use std::sync::LazyLock;
use regex::Regex;

use super::text::escape_html;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*h\*(.*?)\*h\*").expect("Invalid heading regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid bold regex"));
static MODAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"##\s*(.*?)\s*##").expect("Invalid modal marker regex"));

const HEADING_HTML: &str = "<h4 style='margin:4px 0;'>${1}</h4>";
const STRONG_HTML: &str = "<strong>${1}</strong>";

const INDENTED_LIST_OPEN: &str =
    r#"<ul style="margin-left:20px; margin-top:2px; margin-bottom:2px;">"#;
const PLAIN_LIST_OPEN: &str = r#"<ul style="margin-top:2px; margin-bottom:2px;">"#;

/// 列表类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `-- ` 前缀
    Indented,
    /// `- ` 前缀
    Plain,
}

impl ListKind {
    fn prefix(self) -> &'static str {
        match self {
            ListKind::Indented => "-- ",
            ListKind::Plain => "- ",
        }
    }

    fn open_tag(self) -> &'static str {
        match self {
            ListKind::Indented => INDENTED_LIST_OPEN,
            ListKind::Plain => PLAIN_LIST_OPEN,
        }
    }

    /// 按前缀分类，`-- ` 优先
    fn classify(line: &str) -> Option<Self> {
        [ListKind::Indented, ListKind::Plain]
            .into_iter()
            .find(|kind| line.starts_with(kind.prefix()))
    }
}

/// 行级 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineToken {
    Text(String),
    Item { kind: ListKind, text: String },
}

/// 分组后的块
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Line(String),
    List { kind: ListKind, items: Vec<String> },
}

/// 行内规则（输入已转义，单行内生效）
pub fn apply_inline(line: &str) -> String {
    let line = HEADING.replace_all(line, HEADING_HTML);
    BOLD.replace_all(&line, STRONG_HTML).into_owned()
}

/// `##标题##` 标记对 → `<strong>`
///
/// 作用于整段文本：标记与标题之间的空白可以包含换行，与弹窗块提取一致。
pub fn mark_modal_titles(text: &str) -> String {
    MODAL_MARKER.replace_all(text, STRONG_HTML).into_owned()
}

/// 转义 + 行内规则 + 行分类
pub fn tokenize(text: &str) -> Vec<LineToken> {
    let inline: Vec<String> = escape_html(text).split('\n').map(apply_inline).collect();
    let marked = mark_modal_titles(&inline.join("\n"));

    marked
        .split('\n')
        .map(|line| match ListKind::classify(line) {
            Some(kind) => LineToken::Item {
                kind,
                text: line[kind.prefix().len()..].trim().to_string(),
            },
            None => LineToken::Text(line.to_string()),
        })
        .collect()
}

/// 合并相邻的同类列表项
pub fn group(tokens: Vec<LineToken>) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for token in tokens {
        match token {
            LineToken::Text(line) => blocks.push(Block::Line(line)),
            LineToken::Item { kind, text } => match blocks.last_mut() {
                Some(Block::List { kind: last, items }) if *last == kind => {
                    if !text.is_empty() {
                        items.push(text);
                    }
                }
                _ => {
                    let items = if text.is_empty() { Vec::new() } else { vec![text] };
                    blocks.push(Block::List { kind, items });
                }
            },
        }
    }

    blocks
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Line(line) => line.clone(),
        Block::List { kind, items } => {
            let mut html = String::from(kind.open_tag());
            for item in items {
                html.push_str("<li>");
                html.push_str(item);
                html.push_str("</li>");
            }
            html.push_str("</ul>");
            html
        }
    }
}

/// 换行折叠
pub fn fold_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;

    let flush = |out: &mut String, n: usize| match n {
        0 => {}
        1 => out.push_str("<br>"),
        _ => out.push_str("<br><br>"),
    };

    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            continue;
        }
        flush(&mut out, newlines);
        newlines = 0;
        out.push(c);
    }
    flush(&mut out, newlines);
    out
}

/// 完整渲染：规范化文本 → HTML（不含链接识别）
pub fn render(text: &str) -> String {
    let rows: Vec<String> = group(tokenize(text)).iter().map(render_block).collect();
    fold_breaks(&rows.join("\n"))
}
