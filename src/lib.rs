// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod symbols;
pub mod ui;

use crate::{
    cli::{Cli, OutputFormat},
    client::RobustClient,
    config::{
        AppConfig,
        token::{StaticTokenProvider, TokenProvider},
    },
    error::{AppError, AppResult},
    extractor::{ResourceExtractor, redgifs::RedgifsExtractor},
    models::Resource,
};
use anyhow::anyhow;
use colored::*;
use log::{debug, info, warn};
use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use url::Url;

/// 核心的执行上下文，包含所有任务所需的状态和工具
#[derive(Clone)]
pub struct ResolveJobContext {
    pub extractor: Arc<dyn ResourceExtractor>,
    pub args: Arc<Cli>,
    pub cancellation_token: Arc<AtomicBool>,
}

/// 根据配置与 Token 构建解析器
pub fn build_extractor(
    config: Arc<AppConfig>,
    token_provider: Arc<dyn TokenProvider>,
) -> AppResult<RedgifsExtractor> {
    let http_client = Arc::new(RobustClient::new(config.clone())?);
    Ok(RedgifsExtractor::new(http_client, config, token_provider))
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>, cancellation_token: Arc<AtomicBool>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    if args.token_help {
        ui::box_message(
            "获取 Access Token 指南",
            constants::HELP_TOKEN_GUIDE
                .lines()
                .collect::<Vec<_>>()
                .as_slice(),
            |s| s.cyan(),
        );
        println!(
            "\n{} 安全提醒: 请妥善保管你的 Token，不要分享给他人。",
            *symbols::INFO
        );
        return Ok(());
    }

    let config = Arc::new(AppConfig::new(&args)?);
    debug!(
        "加载配置文件 '{}': api={:?}, cdn_rewrites={:?}, max_retries={}",
        config.config_path.display(),
        config.api,
        config.cdn_rewrites,
        config.max_retries
    );

    let (token_opt, source) =
        config::token::resolve_token(args.token.as_deref(), config.file_token.as_deref());
    if token_opt.is_some() {
        info!("从 {} 加载 Access Token", source);
        eprintln!("{} 已从 {} 加载 Access Token。", *symbols::INFO, source);
    } else {
        info!("未找到 Access Token");
        eprintln!(
            "{}",
            format!(
                "{} 未找到 Access Token，可使用 --token-help 查看获取方法。",
                *symbols::WARN
            )
            .yellow()
        );
    }
    let token_provider: Arc<dyn TokenProvider> = Arc::new(StaticTokenProvider::new(token_opt));

    let context = ResolveJobContext {
        extractor: Arc::new(build_extractor(config, token_provider)?),
        args: args.clone(),
        cancellation_token,
    };

    if args.interactive {
        handle_interactive_mode(context).await?;
    } else if let Some(batch_file) = &args.batch_file {
        process_batch_tasks(batch_file, context).await?;
    } else if let Some(url) = &args.url {
        let resources = context.extractor.find_resources(url).await?;
        print_resources(&resources, args.format)?;
    }

    Ok(())
}

fn print_resources(resources: &[Resource], format: OutputFormat) -> AppResult<()> {
    match format {
        OutputFormat::Text => {
            for resource in resources {
                println!("{}", resource.url);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(resources)?),
    }
    Ok(())
}

async fn handle_interactive_mode(context: ResolveJobContext) -> AppResult<()> {
    ui::print_header("交互模式");
    println!(
        "在此模式下，你可以逐一输入帖子链接进行解析。直接按回车或 {} 退出。",
        *symbols::CTRL_C
    );

    loop {
        match ui::prompt("请输入帖子链接") {
            Ok(input) if !input.is_empty() => {
                match context.extractor.find_resources(&input).await {
                    Ok(resources) if resources.is_empty() => {
                        println!("{} 未解析到任何资源。", *symbols::WARN);
                    }
                    Ok(resources) => {
                        println!("{} 解析到 {} 个资源:", *symbols::OK, resources.len());
                        match context.args.format {
                            OutputFormat::Text => {
                                for resource in &resources {
                                    println!("{} {}", *symbols::LINK, resource.url);
                                }
                            }
                            OutputFormat::Json => print_resources(&resources, OutputFormat::Json)?,
                        }
                    }
                    Err(e) => {
                        log::error!("交互模式任务 '{}' 失败: {}", input, e);
                        eprintln!("\n{} {}", *symbols::ERROR, e.to_string().red());
                    }
                }
            }
            Ok(_) => break,
            Err(_) => return Err(AppError::UserInterrupt),
        }
    }

    println!("\n{} 退出交互模式。", *symbols::INFO);
    Ok(())
}

/// 读取批量文件中的有效条目: 忽略空行与 `#` 开头的注释行
pub fn read_batch_tasks(batch_file: &Path) -> AppResult<Vec<String>> {
    let content = std::fs::read_to_string(batch_file).map_err(|e| {
        log::error!("读取批量文件 '{}' 失败: {}", batch_file.display(), e);
        AppError::from(e)
    })?;

    Ok(content
        .lines()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .collect())
}

async fn process_batch_tasks(batch_file: &Path, context: ResolveJobContext) -> AppResult<()> {
    let tasks = read_batch_tasks(batch_file)?;
    if tasks.is_empty() {
        warn!("批量文件 '{}' 为空或不含有效行。", batch_file.display());
        eprintln!(
            "{} 批量文件 '{}' 为空。",
            *symbols::WARN,
            batch_file.display()
        );
        return Ok(());
    }

    let mut success = 0;
    let mut failed = 0;
    let mut collected: Vec<Resource> = Vec::new();
    for (i, task) in tasks.iter().enumerate() {
        if context.cancellation_token.load(Ordering::Relaxed) {
            return Err(AppError::UserInterrupt);
        }
        eprintln!(
            "{} 批量任务 {}/{} - {}",
            *symbols::INFO,
            i + 1,
            tasks.len(),
            ui::truncate_text(task, constants::URL_TRUNCATE_LENGTH)
        );
        if Url::parse(task).is_err() {
            warn!("跳过无效条目: {}", task);
            eprintln!("{} 跳过无效条目: {}", *symbols::WARN, task);
            continue;
        }
        match context.extractor.find_resources(task).await {
            Ok(resources) => {
                success += 1;
                match context.args.format {
                    OutputFormat::Text => print_resources(&resources, OutputFormat::Text)?,
                    OutputFormat::Json => collected.extend(resources),
                }
            }
            Err(e) => {
                failed += 1;
                log::error!("批量任务 '{}' 失败: {}", task, e);
                eprintln!("{} 处理任务时发生错误: {}", *symbols::ERROR, e);
            }
        }
    }

    if context.args.format == OutputFormat::Json {
        print_resources(&collected, OutputFormat::Json)?;
    }

    eprintln!(
        "{} | {} | 总计: {}",
        format!("成功任务: {}", success).green(),
        format!("失败任务: {}", failed).red(),
        tasks.len()
    );
    if failed > 0 {
        Err(AppError::Other(anyhow!("{} 个批量任务执行失败。", failed)))
    } else {
        Ok(())
    }
}
