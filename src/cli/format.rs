//! Format 命令 - 格式化一段告警文本并输出 HTML 与提取的弹窗

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::Settings;
use crate::formatter::Formatter;
use crate::host::EventBus;
use crate::modal::{ModalQueue, ModalRecord};

use super::{format_output, read_input};

/// Format 命令参数
#[derive(Args)]
pub struct FormatArgs {
    /// 输入文件（默认读取 stdin）
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// 当前页面路径（用于弹窗抑制判断）
    #[arg(long, default_value = "")]
    pub path: String,

    /// 不识别裸 URL
    #[arg(long)]
    pub no_linkify: bool,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// Format 命令输出
#[derive(Debug, Serialize)]
pub struct FormatOutput {
    pub html: String,
    pub modals: Vec<ModalRecord>,
    pub formatted: bool,
}

/// 处理 format 命令
pub fn handle_format(args: FormatArgs, settings: &Settings) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    let output = format_alert(raw, &args, settings);

    println!(
        "{}",
        format_output(&output, args.json, |o| {
            let mut text = o.html.clone();
            for modal in &o.modals {
                text.push_str(&format!("\n\n[modal] {}\n{}", modal.title, modal.body));
            }
            text
        })
    );
    Ok(())
}

fn format_alert(raw: String, args: &FormatArgs, settings: &Settings) -> FormatOutput {
    if !settings.format {
        // 格式化关闭：原样输出
        return FormatOutput {
            html: raw,
            modals: Vec::new(),
            formatted: false,
        };
    }

    let mut options = settings.formatter_options();
    if args.no_linkify {
        options.linkify = false;
    }

    let queue = ModalQueue::new();
    let formatter = Formatter::new(queue.clone(), EventBus::new())
        .with_options(options)
        .with_page_path(args.path.as_str());

    let (html, _) = formatter.format_text(&raw);

    FormatOutput {
        html,
        modals: queue.pending(),
        formatted: true,
    }
}
