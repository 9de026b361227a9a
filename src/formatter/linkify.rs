//! 链接识别 - 把 HTML 中裸露的 URL 包装为超链接
//!
//! 已有的 `<a ...>...</a>` 片段原样保留，只处理其余部分。
//! 匹配 `http://`、`https://` 或 `www.` 开头的 URL，结尾标点不计入链接。

use std::sync::LazyLock;
use regex::Regex;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b((?:https?://|www\.)[^\s<>"'(){}\[\]]+[^\s<>"'.,;:!?(){}\[\]])"#)
        .expect("Invalid url regex")
});

static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>.*?</a>").expect("Invalid anchor regex"));

/// 链接 class，便于宿主样式定位
pub const LINK_CLASS: &str = "ae-linkified-url";

/// 链接目标：`www.` 开头补全为 https
pub fn href_for(url: &str) -> String {
    if url.get(..4).is_some_and(|scheme| scheme.eq_ignore_ascii_case("http")) {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn link_segment(segment: &str, out: &mut String) {
    let mut last = 0;
    for m in URL.find_iter(segment) {
        out.push_str(&segment[last..m.start()]);
        let url = m.as_str();
        out.push_str(&format!(
            r#"<a class="{}" href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            LINK_CLASS,
            href_for(url),
            url
        ));
        last = m.end();
    }
    out.push_str(&segment[last..]);
}

/// 识别 HTML 中的裸 URL
pub fn linkify_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for anchor in ANCHOR.find_iter(html) {
        link_segment(&html[last..anchor.start()], &mut out);
        out.push_str(anchor.as_str());
        last = anchor.end();
    }
    link_segment(&html[last..], &mut out);
    out
}
