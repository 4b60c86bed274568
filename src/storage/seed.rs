//! 演示数据：示例贡献者与合规报告

use crate::storage::repository::{NewProfile, NewReport, ProfileRepository, ReportRepository};
use anyhow::Context;
use log::info;
use sea_orm::DatabaseConnection;
use serde_json::json;

const SEED_OWNER: &str = "system-admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub profiles_inserted: usize,
    pub reports_inserted: usize,
}

fn sample_profiles() -> Vec<NewProfile> {
    [
        ("demo-alice", "Alice Johnson", "IT Department", 1890, 34),
        ("demo-mike", "Mike Chen", "Marketing", 1650, 28),
        ("demo-sarah", "Sarah Davis", "Operations", 1480, 26),
        ("demo-tom", "Tom Wilson", "Finance", 1250, 22),
        ("demo-lisa", "Lisa Brown", "Human Resources", 1180, 19),
    ]
    .into_iter()
    .map(|(user_id, name, dept, points, subs)| NewProfile {
        user_id: user_id.to_string(),
        full_name: Some(name.to_string()),
        department: Some(dept.to_string()),
        points,
        total_submissions: subs,
    })
    .collect()
}

fn sample_reports() -> Vec<NewReport> {
    [
        ("monthly_disposal", "Monthly E-Waste Disposal Report", "January 2024", "Completed", "Fully Compliant", Some("reports/RPT-001.pdf")),
        ("impact_assessment", "Environmental Impact Assessment", "Q4 2023", "Completed", "Fully Compliant", Some("reports/RPT-002.xlsx")),
        ("vendor_certification", "Vendor Certification Report", "December 2023", "Completed", "Fully Compliant", Some("reports/RPT-003.pdf")),
        ("department_audit", "Department Audit Summary", "January 2024", "In Progress", "Pending Review", None),
    ]
    .into_iter()
    .map(|(kind, title, period, status, compliance, file)| NewReport {
        user_id: SEED_OWNER.to_string(),
        report_type: kind.to_string(),
        report_data: Some(json!({
            "title": title,
            "period": period,
            "status": status,
            "compliance": compliance,
        })),
        file_url: file.map(str::to_string),
    })
    .collect()
}

/// 可重复执行：profile 按 user_id 去重，报告表非空时跳过
pub async fn seed_demo_data(db: &DatabaseConnection) -> anyhow::Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for profile in sample_profiles() {
        let user_id = profile.user_id.clone();
        if ProfileRepository::insert_or_ignore(db, profile)
            .await
            .with_context(|| format!("写入示例 profile {} 失败", user_id))?
        {
            summary.profiles_inserted += 1;
        }
    }

    if ReportRepository::count(db).await.context("统计合规报告失败")? == 0 {
        for report in sample_reports() {
            ReportRepository::insert(db, report)
                .await
                .context("写入示例合规报告失败")?;
            summary.reports_inserted += 1;
        }
    }

    info!(
        "演示数据: 新增 profile {} 条, 报告 {} 条",
        summary.profiles_inserted, summary.reports_inserted
    );
    Ok(summary)
}
