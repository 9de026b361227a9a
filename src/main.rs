//! Message Bar Enhancer CLI
//!
//! 格式化告警文本、提取并展示弹窗

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};
use message_bar_enhancer::{
    cli::{format_output, handle_format, handle_present, FormatArgs, PresentArgs},
    formatting_tips_html, Settings,
};

#[derive(Parser)]
#[command(name = "mbe")]
#[command(about = "Message Bar Enhancer - 告警栏格式化与弹窗展示")]
#[command(version)]
struct Cli {
    /// 设置文件路径（默认 ~/.config/message-bar-enhancer/settings.json）
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 格式化一段告警文本，输出 HTML 与提取的弹窗
    Format(FormatArgs),
    /// 格式化一组告警并在终端中逐个展示弹窗
    Present(PresentArgs),
    /// 输出格式说明块 HTML
    Tips,
    /// 显示当前生效的设置
    Settings {
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("message_bar_enhancer=info,mbe=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    let settings_path = cli.settings.unwrap_or_else(Settings::default_path);
    let settings = Settings::load_from(&settings_path);
    debug!(path = %settings_path.display(), format = settings.format, "Settings loaded");

    match cli.command {
        Commands::Format(args) => handle_format(args, &settings)?,
        Commands::Present(args) => handle_present(args, settings).await?,
        Commands::Tips => println!("{}", formatting_tips_html()),
        Commands::Settings { json } => {
            println!(
                "{}",
                format_output(&settings, json, |s| {
                    format!(
                        "设置文件: {}\n格式化: {}\n链接识别: {}\n抑制弹窗的页面: {}\n延迟 (ms): settle={} ready={} fallback={} advance={}",
                        settings_path.display(),
                        if s.format { "开启" } else { "关闭" },
                        if s.linkify { "开启" } else { "关闭" },
                        s.suppressed_paths.join(", "),
                        s.timing.settle_delay_ms,
                        s.timing.ready_delay_ms,
                        s.timing.fallback_delay_ms,
                        s.timing.advance_delay_ms,
                    )
                })
            );
        }
    }

    Ok(())
}
