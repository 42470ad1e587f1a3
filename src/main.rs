// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use redgifs_dl::{cli::Cli, logging, run_from_cli};
use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let cancellation_token = Arc::new(AtomicBool::new(false));
    let signal_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.store(true, Ordering::Relaxed);
            eprintln!("\n{} 用户强制中断程序。", "[!]".yellow());
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "redgifs-dl".to_string());

    let after_help = format!(
        "示例:\n  # 解析单个链接\n  {bin} --url \"https://www.redgifs.com/watch/...\"\n\n  # 批量解析并输出 JSON\n  {bin} -b my_links.txt --format json\n\n  # 启动交互模式\n  {bin} -i\n\n  # 获取 Token 帮助\n  {bin} --token-help",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logging::init_logger(args.log_level);

    if let Err(e) = run_from_cli(args, cancellation_token).await {
        log::error!("程序执行出错: {}", e);
        eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
