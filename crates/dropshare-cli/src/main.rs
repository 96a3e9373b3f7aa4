//! Dropshare CLI
//!
//! 命令行前端：注册/登录本地账号，模拟上传文件并查看已上传列表。

mod progress;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use dropshare_core::{
    AppSettings, CredentialGate, FileHandle, FileStore, LogLevel, SessionStore,
    SimpleUploadCallback, UploadSimulator, run_until_idle,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use progress::ProgressPrinter;

#[derive(Parser)]
#[command(name = "dropshare", version, about = "Dropshare - 本地文件分享演示")]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// 数据目录 (默认读取配置文件)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 注册账号（覆盖已有账号）
    Signup {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// 登录
    Login {
        #[arg(short, long, default_value = "")]
        email: String,
        #[arg(short, long, default_value = "")]
        password: String,
    },
    /// 退出登录
    Logout,
    /// 查看当前登录用户
    Whoami,
    /// 上传文件
    Upload {
        /// 要上传的文件路径
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// 列出已上传的文件
    Files,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = AppSettings::load();
    init_logging(cli.log_level, settings.verbose);

    let data_dir = cli.data_dir.unwrap_or_else(|| settings.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    let session = SessionStore::new(FileStore::new(data_dir));
    let gate = CredentialGate::new(session.clone());

    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let user = gate.register(name, email, password)?;
            println!("✅ 已注册: {} <{}>", user.name, user.email);
        }
        Commands::Login { email, password } => match gate.login(&email, &password) {
            Ok(user) => println!("✅ 欢迎回来, {}", user.name),
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
        Commands::Logout => {
            if gate.logout()? {
                println!("👋 已退出登录");
            } else {
                println!("当前未登录");
            }
        }
        Commands::Whoami => match gate.current_user() {
            Some(user) => println!("{} <{}>", user.name, user.email),
            None => println!("当前未登录"),
        },
        Commands::Upload { files } => {
            let Some(user) = gate.current_user() else {
                bail!("请先登录: dropshare login --email <EMAIL> --password <PASSWORD>");
            };
            tracing::info!("{} is uploading {} file(s)", user.email, files.len());

            let mut handles = Vec::with_capacity(files.len());
            for path in &files {
                match FileHandle::from_path(path) {
                    Ok(handle) => handles.push(handle),
                    Err(e) => eprintln!("⚠️  跳过 {}: {}", path.display(), e),
                }
            }
            if handles.is_empty() {
                bail!("没有可上传的文件");
            }

            println!("📤 上传 {} 个文件...", handles.len());
            let stored_before = session.read_uploaded_files().len();
            let (callback, events) = SimpleUploadCallback::new();
            let mut simulator = UploadSimulator::new(session.clone(), settings.upload_config())
                .with_callback(callback);
            let ids = simulator.submit(handles);
            let printer = tokio::spawn(ProgressPrinter::new(ids).run(events));

            run_until_idle(&mut simulator).await;
            // 释放回调发送端，打印任务随之结束
            drop(simulator);
            printer.await?;

            // 以存储中实际新增的记录为准，事件通道满时会丢消息
            let uploaded = session
                .read_uploaded_files()
                .len()
                .saturating_sub(stored_before);
            println!("✅ 上传完成 ({}/{})", uploaded, files.len());
        }
        Commands::Files => {
            let files = session.read_uploaded_files();
            if files.is_empty() {
                println!("   暂无上传记录");
            }
            for (i, file) in files.iter().enumerate() {
                let mime = if file.mime_type.is_empty() {
                    "-"
                } else {
                    file.mime_type.as_str()
                };
                println!(
                    "   [{}] {} ({} bytes, {}) {}",
                    i,
                    file.name,
                    file.size,
                    mime,
                    file.modified_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
    }

    Ok(())
}

/// 初始化日志系统
///
/// 设置了 RUST_LOG 时以其为准，否则使用命令行指定的级别。
fn init_logging(level: LogLevel, verbose: bool) {
    // 桥接 log crate（dropshare-core 使用）到 tracing
    let _ = tracing_log::LogTracer::init();

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level.filter_directive(verbose))),
        )
        .try_init();
}
