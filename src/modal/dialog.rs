//! 弹窗内容与遮罩层 HTML
//!
//! 正文拆分为：一个可选段落（非圆点行）+ 一个可选列表（`•` 开头的行）。

use crate::formatter::text::escape_html;

use super::record::ModalRecord;

/// 列表圆点
pub const BULLET: char = '•';

/// 确认按钮文字
pub const ACK_LABEL: &str = "OK";

const OVERLAY_STYLE: &str = "position:fixed; inset:0; background:rgba(0,0,0,0.55); \
display:flex; align-items:center; justify-content:center; z-index:999999; \
animation:aeFadeIn .25s ease forwards;";

const CARD_STYLE: &str = "background:#fff; color:#222; border-radius:10px; padding:22px 24px; \
min-width:400px; min-height:250px; max-width:600px; box-shadow:0 12px 36px rgba(0,0,0,0.35); \
font-family:system-ui,-apple-system,'Segoe UI',Roboto,Arial; display:flex; flex-direction:column; \
justify-content:space-between; transform:scale(.98); animation:aeModalPop .25s ease forwards;";

const BUTTON_STYLE: &str = "background:#0b66d6; color:#fff; border:none; padding:8px 16px; \
border-radius:6px; cursor:pointer; font-size:14px;";

const KEYFRAMES: &str = "@keyframes aeFadeIn {from{opacity:0} to{opacity:1}} \
@keyframes aeModalPop {from{transform:scale(.95);opacity:0} to{transform:scale(1);opacity:1}}";

/// 弹窗正文
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DialogBody {
    /// 非圆点行（换行连接）
    pub paragraph: Option<String>,
    /// 圆点行（去掉圆点）
    pub bullets: Vec<String>,
}

impl DialogBody {
    pub fn parse(body: &str) -> Self {
        let mut plain = Vec::new();
        let mut bullets = Vec::new();

        for line in body.split('\n') {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix(BULLET) {
                Some(rest) => bullets.push(rest.trim().to_string()),
                None => plain.push(line),
            }
        }

        Self {
            paragraph: (!plain.is_empty()).then(|| plain.join("\n")),
            bullets,
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        if let Some(paragraph) = &self.paragraph {
            html.push_str(&format!(
                r#"<p style="white-space:pre-line; margin:0 0 .75em 0;">{}</p>"#,
                escape_html(paragraph)
            ));
        }
        if !self.bullets.is_empty() {
            html.push_str(r#"<ul style="margin:.25em 0 0 1.1em; padding:0;">"#);
            for bullet in &self.bullets {
                html.push_str(&format!("<li>{}</li>", escape_html(bullet)));
            }
            html.push_str("</ul>");
        }
        html
    }
}

/// 待展示的弹窗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalDialog {
    pub title: String,
    pub body: DialogBody,
    /// 原始正文（终端等非 HTML 展示使用）
    pub raw_body: String,
}

impl ModalDialog {
    pub fn from_record(record: &ModalRecord) -> Self {
        Self {
            title: record.title.clone(),
            body: DialogBody::parse(&record.body),
            raw_body: record.body.clone(),
        }
    }

    /// 完整遮罩层 HTML：标题、正文、唯一的确认按钮
    pub fn to_html(&self) -> String {
        let mut body = self.body.to_html();
        if body.is_empty() {
            body = format!("<p>{}</p>", escape_html(&self.raw_body));
        }

        format!(
            concat!(
                r#"<div class="ae-modal-overlay" style="{overlay}">"#,
                "<style>{keyframes}</style>",
                r#"<div class="ae-modal" role="dialog" aria-modal="true" style="{card}">"#,
                r#"<div style="flex:1; overflow-y:auto;">"#,
                r#"<h3 style="margin-top:0; margin-bottom:.5em; font-size:18px;">{title}</h3>"#,
                r#"<div style="font-size:14px; line-height:1.45;">{body}</div>"#,
                "</div>",
                r#"<div style="text-align:right; margin-top:1.2em;">"#,
                r#"<button type="button" style="{button}">{ack}</button>"#,
                "</div></div></div>"
            ),
            overlay = OVERLAY_STYLE,
            keyframes = KEYFRAMES,
            card = CARD_STYLE,
            title = escape_html(&self.title),
            body = body,
            button = BUTTON_STYLE,
            ack = ACK_LABEL,
        )
    }
}
