//! Tests for the alert formatter

use message_bar_enhancer::formatter::render::{group, tokenize, Block, ListKind};
use message_bar_enhancer::{
    render_html, AlertNode, AlertSpan, EventBus, FormatOutcome, Formatter, ModalQueue, ModalRecord,
};

fn new_formatter() -> (Formatter, ModalQueue) {
    let queue = ModalQueue::new();
    (Formatter::new(queue.clone(), EventBus::new()), queue)
}

fn format_plain(text: &str) -> (String, ModalQueue) {
    let (formatter, queue) = new_formatter();
    let mut node = AlertNode::plain(text);
    formatter.format(&mut node);
    (node.html().unwrap().to_string(), queue)
}

#[test]
fn test_text_without_markup_is_identity_modulo_breaks() {
    // Given: 没有任何标记的告警文本
    let inputs = [
        "Server maintenance tonight",
        "Line one\nLine two",
        "Paragraph\n\nAnother paragraph",
        "Tom & Jerry say \"hi\"",
    ];

    for input in inputs {
        // When: 格式化
        let (html, queue) = format_plain(input);

        // Then: 只有换行与实体被规范化
        let expected = input
            .replace('&', "&amp;")
            .replace('"', "&quot;")
            .replace("\n\n", "<br><br>")
            .replace('\n', "<br>");
        assert_eq!(html, expected, "input: {:?}", input);
        assert_eq!(queue.pending_len(), 0);
    }
}

#[test]
fn test_two_dash_lines_make_one_list_with_two_items() {
    let (html, _) = format_plain("Checklist\n- restart service\n- verify logs");

    assert_eq!(html.matches("<ul").count(), 1);
    assert_eq!(html.matches("<li>").count(), 2);
    assert!(html.contains("<li>restart service</li><li>verify logs</li>"));
    assert!(!html.contains("- "));
}

#[test]
fn test_list_kinds_are_disjoint() {
    let blocks = group(tokenize("-- nested a\n-- nested b\n- top"));
    assert_eq!(
        blocks,
        vec![
            Block::List {
                kind: ListKind::Indented,
                items: vec!["nested a".to_string(), "nested b".to_string()],
            },
            Block::List {
                kind: ListKind::Plain,
                items: vec!["top".to_string()],
            },
        ]
    );
}

#[test]
fn test_modal_block_extraction_excludes_stopper() {
    let (html, queue) = format_plain("##Title##\n> first\n>> more\nstopper");

    assert_eq!(queue.pending(), vec![ModalRecord::new("Title", "first\nmore")]);
    // 块本身仍以普通文本渲染
    assert_eq!(
        html,
        "<strong>Title</strong><br>&gt; first<br>&gt;&gt; more<br>stopper"
    );
}

#[test]
fn test_reextraction_is_deduplicated() {
    let (formatter, queue) = new_formatter();
    let text = "##Notice##\n> Planned downtime";

    formatter.format(&mut AlertNode::plain(text));
    let second = formatter.format(&mut AlertNode::plain(text));

    assert_eq!(second, FormatOutcome::Formatted { extracted: 1, queued: 0 });
    assert_eq!(queue.pending_len(), 1);
}

#[test]
fn test_formatting_node_twice_is_noop() {
    let (formatter, queue) = new_formatter();
    let mut node = AlertNode::plain("##A##\n> a\n**b**");

    formatter.format(&mut node);
    let first_html = node.html().unwrap().to_string();

    assert_eq!(formatter.format(&mut node), FormatOutcome::AlreadyFormatted);
    assert_eq!(node.html().unwrap(), first_html);
    assert_eq!(queue.pending_len(), 1);
}

#[test]
fn test_bare_www_url_becomes_https_link() {
    let (html, _) = format_plain("Docs at www.example.com.");
    assert!(html.contains(
        r#"<a class="ae-linkified-url" href="https://www.example.com" target="_blank" rel="noopener noreferrer">www.example.com</a>."#
    ));
}

#[test]
fn test_url_inside_existing_anchor_untouched() {
    let html = message_bar_enhancer::formatter::linkify::linkify_html(
        r#"<a href="https://example.com">https://example.com</a>"#,
    );
    assert_eq!(html, r#"<a href="https://example.com">https://example.com</a>"#);
}

#[test]
fn test_url_in_list_item_is_linked() {
    let html = render_html("- see https://status.example.com", true);
    assert!(html.contains(r#"<li>see <a class="ae-linkified-url" href="https://status.example.com""#));
}

#[test]
fn test_encoded_markup_is_not_injected() {
    // 实体被解码后再次转义，不会变成真实标签
    let (html, _) = format_plain("&lt;script&gt;alert(1)&lt;/script&gt;");
    assert_eq!(html, "&lt;script&gt;alert(1)&lt;/script&gt;");
}

#[test]
fn test_span_structured_alert_with_modal() {
    let (formatter, queue) = new_formatter();
    let mut node = AlertNode::with_spans(vec![
        AlertSpan::new("##Heads up##"),
        AlertSpan::new("> Office closed Friday"),
        AlertSpan::new("…").with_class("Ellipses"),
        AlertSpan::new("Show Less").with_class("ShowMoreLessButton"),
    ]);

    formatter.format(&mut node);

    assert_eq!(queue.pending(), vec![ModalRecord::new("Heads up", "Office closed Friday")]);
    assert_eq!(
        node.html().unwrap(),
        "<strong>Heads up</strong><br>&gt; Office closed Friday<br>"
    );
}

#[test]
fn test_unterminated_block_never_panics() {
    for input in ["##", "## open", "##T##", "##T##\n>", "#\n##\n##"] {
        let (_, queue) = format_plain(input);
        assert_eq!(queue.pending_len(), 0, "input: {:?}", input);
    }
}

#[test]
fn test_modal_title_with_line_break_is_rendered_and_queued() {
    // Given: 标记与标题之间有换行
    for input in ["##\nAlert##\n> hi", "##Alert\n##\n> hi"] {
        // When
        let (html, queue) = format_plain(input);

        // Then: 提取与渲染对同一标记对达成一致
        assert_eq!(queue.pending(), vec![ModalRecord::new("Alert", "hi")], "input: {:?}", input);
        assert_eq!(html, "<strong>Alert</strong><br>&gt; hi", "input: {:?}", input);
    }
}
