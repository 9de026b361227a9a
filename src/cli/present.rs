//! Present 命令 - 格式化一组告警，并在终端中逐个展示弹窗
//!
//! 输入为 JSON Lines，每行是一个告警：
//! - 字符串：纯文本告警
//! - `{"spans": [{"class": "...", "text": "..."}]}`：span 结构告警

use anyhow::{Context, Result};
use clap::Args;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Settings;
use crate::enhancer::Enhancer;
use crate::formatter::text::extract_text;
use crate::host::{AlertBoard, AlertContent, AlertNode};
use crate::modal::dialog::ACK_LABEL;
use crate::modal::{Acknowledgement, DialogSurface, ModalDialog};

use super::read_input;

/// Present 命令参数
#[derive(Args)]
pub struct PresentArgs {
    /// 告警文件（JSON Lines，默认读取 stdin）
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// 当前页面路径（用于弹窗抑制判断）
    #[arg(long, default_value = "")]
    pub path: String,

    /// 自动确认所有弹窗（不等待输入）
    #[arg(long, short)]
    pub yes: bool,
}

/// 解析 JSON Lines 告警
pub fn parse_alerts(input: &str) -> Result<Vec<AlertContent>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid alert on line {}", i + 1))
        })
        .collect()
}

/// 终端文本形式的弹窗
pub fn render_dialog_text(dialog: &ModalDialog) -> String {
    let mut text = format!("━━ {} ━━", dialog.title);
    if let Some(paragraph) = &dialog.body.paragraph {
        text.push('\n');
        text.push_str(paragraph);
    }
    for bullet in &dialog.body.bullets {
        text.push_str(&format!("\n  • {}", bullet));
    }
    text
}

/// 终端弹窗：打印后等待用户按回车确认
pub struct TerminalSurface;

impl DialogSurface for TerminalSurface {
    fn name(&self) -> &str {
        "terminal"
    }

    fn open(&self, dialog: &ModalDialog) -> Result<Acknowledgement> {
        let (tx, ack) = Acknowledgement::channel();
        let text = render_dialog_text(dialog);

        tokio::task::spawn_blocking(move || {
            eprintln!("\n{}\n", text);
            let prompt = dialoguer::Input::<String>::new()
                .with_prompt(format!("[{}] 按回车确认", ACK_LABEL))
                .allow_empty(true)
                .interact_text();
            if let Err(e) = prompt {
                warn!(error = %e, "Terminal prompt failed, treating dialog as acknowledged");
            }
            tx.acknowledge();
        });

        Ok(ack)
    }
}

/// 只打印、立即确认的弹窗
pub struct PrintSurface;

impl DialogSurface for PrintSurface {
    fn name(&self) -> &str {
        "print"
    }

    fn open(&self, dialog: &ModalDialog) -> Result<Acknowledgement> {
        println!("\n{}", render_dialog_text(dialog));
        Ok(Acknowledgement::acknowledged())
    }
}

/// 告警的输出形式：已格式化时为 HTML，否则为原始文本
pub fn alert_output(node: &AlertNode) -> String {
    match (node.html(), node.content()) {
        (Some(html), _) => html.to_string(),
        (None, AlertContent::Plain(text)) => text.clone(),
        (None, content) => extract_text(content).trim_end().to_string(),
    }
}

/// 能否用交互提示等待确认：stdin 必须是终端，且没有被用来读取告警
pub fn prompts_available(args: &PresentArgs, stdin_is_terminal: bool) -> bool {
    !args.yes && args.input.is_some() && stdin_is_terminal
}

/// 把告警放入容器（格式化开启时逐条格式化），返回每条告警的输出
pub fn load_alerts(enhancer: &Enhancer, alerts: Vec<AlertContent>) -> Vec<String> {
    let board = AlertBoard::new();
    let _subscription = enhancer.attach_alerts(Some(&board));
    for content in alerts {
        board.push(AlertNode::new(content));
    }

    board
        .ids()
        .into_iter()
        .filter_map(|id| board.get(id))
        .map(|node| alert_output(&node))
        .collect()
}

/// 处理 present 命令
pub async fn handle_present(args: PresentArgs, settings: Settings) -> Result<()> {
    let alerts = parse_alerts(&read_input(args.input.as_deref())?)?;

    let interactive = prompts_available(&args, std::io::stdin().is_terminal());
    if !args.yes && !interactive {
        warn!("stdin is not available for prompts, printing dialogs without waiting (use --input FILE to confirm interactively)");
    }
    let surface: Arc<dyn DialogSurface> = if interactive {
        Arc::new(TerminalSurface)
    } else {
        Arc::new(PrintSurface)
    };
    let enhancer = Enhancer::new(settings, &args.path, surface);

    for output in load_alerts(&enhancer, alerts) {
        println!("{}", output);
    }

    let outcome = enhancer.presenter().drain().await;
    info!(?outcome, "Presentation finished");
    Ok(())
}
