//! CLI command handling

pub mod format;
pub mod output;
pub mod present;

pub use format::*;
pub use output::*;
pub use present::*;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// 读取输入文件，未指定时读取 stdin
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("读取输入文件失败: {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("读取 stdin 失败")?;
            Ok(buf)
        }
    }
}
