//! 弹窗块提取
//!
//! 块格式：
//! ```text
//! ##标题##
//! > 第一个弹窗
//! >> 续行（同一弹窗）
//! > 第二个弹窗（共享标题）
//! 普通行（结束本块的弹窗收集）
//! ```
//! 块从 `##标题##` 开始，到下一行首 `##` 或文本结尾为止。
//! 没有闭合标记的块延伸到文本结尾，不会报错。

use crate::modal::ModalRecord;

/// 一个 `##标题##` 块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalBlock<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

/// 切分文本中的所有弹窗块
pub fn split_blocks(text: &str) -> Vec<ModalBlock<'_>> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find("##") {
        let open = cursor + rel;
        let Some((title, body_start)) = parse_title(text, open + 2) else {
            cursor = open + 1;
            continue;
        };

        let body_end = text[body_start..]
            .find("\n##")
            .map(|i| body_start + i)
            .unwrap_or(text.len());

        blocks.push(ModalBlock {
            title,
            body: &text[body_start..body_end],
        });
        cursor = body_end;
    }

    blocks
}

/// 解析开标记之后的标题，返回 (标题, 正文起始位置)
///
/// 标题与闭标记之间只允许空白，标题本身不能跨行。
fn parse_title(text: &str, start: usize) -> Option<(&str, usize)> {
    let rest = &text[start..];
    let lead = rest.len() - rest.trim_start().len();
    let after = &rest[lead..];

    let close = after.find("##")?;
    let title = after[..close].trim_end();
    if title.contains('\n') {
        return None;
    }
    Some((title.trim(), start + lead + close + 2))
}

/// 从单个块中收集弹窗
///
/// - `>>` 开头：追加到当前弹窗正文
/// - `>` 开头：开始一个新弹窗（共享块标题）
/// - 其他非空行：已有弹窗时结束收集；之前的行直接忽略
pub fn collect_block(block: &ModalBlock<'_>, out: &mut Vec<ModalRecord>) {
    let mut current: Option<Vec<&str>> = None;
    let mut bodies: Vec<Vec<&str>> = Vec::new();

    for line in block.body.trim().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with(">>") {
            if let Some(body) = current.as_mut() {
                body.push(strip_chevrons(trimmed));
            }
        } else if trimmed.starts_with('>') {
            if let Some(body) = current.take() {
                bodies.push(body);
            }
            current = Some(vec![strip_chevrons(trimmed)]);
        } else if current.is_some() {
            break;
        }
    }
    bodies.extend(current);

    for lines in bodies {
        let body = lines.join("\n");
        let body = body.trim();
        if body.is_empty() {
            continue;
        }
        out.push(ModalRecord::new(block.title, body));
    }
}

fn strip_chevrons(line: &str) -> &str {
    line.trim_start_matches('>').trim_start()
}

/// 提取文本中所有弹窗（按出现顺序，未去重）
pub fn extract_modals(text: &str) -> Vec<ModalRecord> {
    let mut records = Vec::new();
    for block in split_blocks(text) {
        collect_block(&block, &mut records);
    }
    records
}
