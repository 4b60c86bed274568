mod app_service;
mod app_state;
mod commands;
mod config;
mod insights;
mod qr;
mod scoring;
mod session;
mod storage;
mod submission;
mod ui;

use anyhow::Context;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::app_service::refresh_ui;
use crate::app_state::{App, AppEvent};
use crate::commands::AppCommand;
use crate::config::AppConfig;
use crate::qr::QrRenderClient;
use crate::storage::repository::{ItemRepository, ProfileRepository, QrCodeRepository};
use crate::storage::seed::seed_demo_data;
use crate::submission::SubmissionService;
use crate::ui::draw;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let ts = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let log_dir = std::path::PathBuf::from("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join(format!("app-{}.log", ts));
    let log_file = std::fs::File::create(log_path)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file))) // 输出重定向到文件，避免干扰 TUI
        .filter_level(log::LevelFilter::Warn)
        .filter_module("ewaste_tracker", log::LevelFilter::Info)
        .filter_module("sqlx", log::LevelFilter::Error)
        .filter_module("sea_orm", log::LevelFilter::Error)
        .init();

    let mut startup_info = Vec::new();

    // 加载配置（.env + 环境变量）
    let config = AppConfig::from_env().context("配置无效")?;
    startup_info.push(format!("✓ 持久化模式: {:?}", config.persistence_mode));

    // 初始化数据库
    let db = match storage::establish_connection(&config.database_url).await {
        Ok(connection) => {
            startup_info.push("✓ 数据库连接成功".to_string());
            Arc::new(connection)
        }
        Err(e) => {
            eprintln!("无法连接数据库: {}", e);
            return Err(e).context(format!("数据库连接失败: {}", config.database_url));
        }
    };

    match (
        ItemRepository::count(db.as_ref()).await,
        QrCodeRepository::count(db.as_ref()).await,
    ) {
        (Ok(items), Ok(codes)) => {
            startup_info.push(format!("✓ 已有物品 {} 件, QR 码 {} 个", items, codes))
        }
        (Err(e), _) | (_, Err(e)) => startup_info.push(format!("⚠ 统计记录失败: {}", e)),
    }

    // 当前用户
    let user = config.user.clone();
    match &user {
        Some(u) => match ProfileRepository::ensure(db.as_ref(), u).await {
            Ok(profile) => startup_info.push(format!(
                "✓ 当前用户: {} (积分 {}, 提交 {})",
                u.display_name(),
                profile.points,
                profile.total_submissions
            )),
            Err(e) => {
                error!("创建 profile 失败: {}", e);
                startup_info.push(format!("✗ 无法初始化用户 profile: {}", e));
            }
        },
        None => {
            startup_info.push("⚠ 未设置 EWASTE_USER_ID，提交功能不可用".to_string());
        }
    }

    let qr_client = QrRenderClient::new(config.qr_render_url.clone(), config.qr_output_dir.clone())
        .context("QR 渲染地址无效")?;
    startup_info.push(format!("QR 图片目录: {}", qr_client.output_dir().display()));

    // 创建核心 Channel
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<AppCommand>();
    let (evt_tx, evt_rx) = mpsc::unbounded_channel::<AppEvent>();

    let service = Arc::new(SubmissionService::new(
        db.clone(),
        config.persistence_mode,
        config.classification_seed,
    ));
    info!("SubmissionService 已就绪，模式 {:?}", service.mode());

    // 后台任务 (Actor)
    let db_bg = Arc::clone(&db);
    let evt_tx_bg = evt_tx.clone();
    let user_bg = user.clone();
    let qr_client = Arc::new(qr_client);
    let refresh_interval = config.refresh_interval;

    tokio::spawn(async move {
        // 周期性刷新 UI
        {
            let dbc = db_bg.clone();
            let txc = evt_tx_bg.clone();
            let userc = user_bg.clone();
            tokio::spawn(async move {
                loop {
                    refresh_ui(&dbc, userc.as_ref(), &txc).await;
                    tokio::time::sleep(refresh_interval).await;
                }
            });
        }

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                AppCommand::SubmitForm(form) => {
                    let svc = service.clone();
                    let tx = evt_tx_bg.clone();
                    let dbc = db_bg.clone();
                    let userc = user_bg.clone();
                    tokio::spawn(async move {
                        match svc.submit(userc.as_ref(), &form).await {
                            Ok(receipt) => {
                                info!("提交成功 item={} qr={}", receipt.item_id, receipt.qr_code);
                                let _ = tx.send(AppEvent::Submitted(receipt));
                            }
                            Err(e) => {
                                let _ = tx.send(AppEvent::SubmitFailed(e));
                            }
                        }
                        refresh_ui(&dbc, userc.as_ref(), &tx).await;
                    });
                }
                AppCommand::QrUrl { code } => {
                    match QrCodeRepository::find_by_code(db_bg.as_ref(), &code).await {
                        Ok(Some(qr)) => match qr_client.url_for(&code) {
                            Ok(url) => {
                                let item_name =
                                    match ItemRepository::find_by_id(db_bg.as_ref(), qr.item_id)
                                        .await
                                    {
                                        Ok(Some(item)) => item.item_name,
                                        _ => format!("#{}", qr.item_id),
                                    };
                                let _ = evt_tx_bg.send(AppEvent::Message(format!(
                                    "QR 链接 [{}] {}: {}",
                                    code, item_name, url
                                )));
                            }
                            Err(e) => {
                                let _ = evt_tx_bg.send(AppEvent::Error(format!("✗ {}", e)));
                            }
                        },
                        Ok(None) => {
                            let _ = evt_tx_bg
                                .send(AppEvent::Error(format!("✗ 未找到 QR 码: {}", code)));
                        }
                        Err(e) => {
                            let _ = evt_tx_bg.send(AppEvent::Error(format!("✗ 查询失败: {}", e)));
                        }
                    }
                }
                AppCommand::QrSave { code } => {
                    match QrCodeRepository::find_by_code(db_bg.as_ref(), &code).await {
                        Ok(Some(_)) => {
                            let client = qr_client.clone();
                            let tx = evt_tx_bg.clone();
                            tokio::spawn(async move {
                                match client.save_png(&code).await {
                                    Ok(path) => {
                                        let _ = tx.send(AppEvent::Message(format!(
                                            "✓ QR 图片已保存: {}",
                                            path.display()
                                        )));
                                    }
                                    Err(e) => {
                                        let _ = tx.send(AppEvent::Error(format!(
                                            "✗ 保存 QR 图片失败: {}",
                                            e
                                        )));
                                    }
                                }
                            });
                        }
                        Ok(None) => {
                            let _ = evt_tx_bg
                                .send(AppEvent::Error(format!("✗ 未找到 QR 码: {}", code)));
                        }
                        Err(e) => {
                            let _ = evt_tx_bg.send(AppEvent::Error(format!("✗ 查询失败: {}", e)));
                        }
                    }
                }
                AppCommand::Refresh => {
                    refresh_ui(&db_bg, user_bg.as_ref(), &evt_tx_bg).await;
                }
                AppCommand::DemoSeed => match seed_demo_data(db_bg.as_ref()).await {
                    Ok(summary) => {
                        let _ = evt_tx_bg.send(AppEvent::Message(format!(
                            "✓ 演示数据: 新增 profile {} 条, 报告 {} 条",
                            summary.profiles_inserted, summary.reports_inserted
                        )));
                        refresh_ui(&db_bg, user_bg.as_ref(), &evt_tx_bg).await;
                    }
                    Err(e) => {
                        let _ = evt_tx_bg.send(AppEvent::Error(format!("✗ 演示数据写入失败: {:#}", e)));
                    }
                },
                // 其余命令在 UI 侧处理
                other => {
                    log::debug!("后台忽略命令: {:?}", other);
                }
            }
        }
    });

    // TUI 初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let user_label = user.as_ref().map(|u| u.display_name().to_string());
    let mut app = App::new(startup_info, user_label, cmd_tx, evt_rx);

    // 主循环
    let res = match app.evt_rx.take() {
        Some(rx) => run_app_loop(&mut terminal, &mut app, rx).await,
        None => Ok(()),
    };

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.context("TUI 运行出错")
}

async fn run_app_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut evt_rx: mpsc::UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        while let Ok(event) = evt_rx.try_recv() {
            app.apply_event(event);
        }

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key_event(key.code) {
                    return Ok(());
                }
            }
        }
    }
}
