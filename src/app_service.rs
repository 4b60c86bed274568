use crate::app_state::AppEvent;
use crate::insights::{build_analytics, build_dashboard, build_qr_entries};
use crate::session::UserIdentity;
use crate::storage::repository::{ItemRepository, ProfileRepository, QrCodeRepository, ReportRepository};
use chrono::Utc;
use log::warn;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::mpsc;

/// 重新读取各表并推送页面快照；单个查询失败只跳过对应页面
pub async fn refresh_ui(
    db: &Arc<DatabaseConnection>,
    user: Option<&UserIdentity>,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let profiles = match ProfileRepository::load_all(db).await {
        Ok(p) => p,
        Err(e) => {
            warn!("加载 profiles 失败: {}", e);
            Vec::new()
        }
    };

    // 1. 物品：分析页 + 当前用户的看板
    match ItemRepository::load_all(db).await {
        Ok(items) => {
            let now = Utc::now();
            let _ = tx.send(AppEvent::Analytics(build_analytics(&items, &profiles, now)));

            let mine: Vec<_> = match user {
                Some(u) => items
                    .into_iter()
                    .filter(|i| i.user_id == u.user_id)
                    .collect(),
                None => Vec::new(),
            };
            let _ = tx.send(AppEvent::Dashboard(build_dashboard(
                user,
                &mine,
                &profiles,
                now.timestamp(),
            )));
        }
        Err(e) => warn!("加载物品失败: {}", e),
    }

    // 2. QR 列表
    match QrCodeRepository::list_with_items(db).await {
        Ok(rows) => {
            let _ = tx.send(AppEvent::QrCodes(build_qr_entries(rows, &profiles)));
        }
        Err(e) => warn!("加载 QR 列表失败: {}", e),
    }

    // 3. 合规报告
    match ReportRepository::list(db).await {
        Ok(reports) => {
            let _ = tx.send(AppEvent::Reports(reports));
        }
        Err(e) => warn!("加载合规报告失败: {}", e),
    }
}
