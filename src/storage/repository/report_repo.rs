use crate::storage::entity::compliance_report::{
    self, ActiveModel as ReportActiveModel, Entity as ComplianceReport, Model as ReportModel,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub user_id: String,
    pub report_type: String,
    pub report_data: Option<Value>,
    pub file_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportDto {
    pub id: i32,
    pub user_id: String,
    pub report_type: String,
    pub report_data: Option<Value>,
    pub file_url: Option<String>,
    pub created_at: i64,
}

impl ReportDto {
    /// report_data 里的字符串字段，例如 title / period / status
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.report_data
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(|v| v.as_str())
    }
}

impl From<ReportModel> for ReportDto {
    fn from(model: ReportModel) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            report_type: model.report_type,
            // 损坏的 JSON 当作没有数据
            report_data: model
                .report_data
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
            file_url: model.file_url,
            created_at: model.created_at,
        }
    }
}

pub struct ReportRepository;

impl ReportRepository {
    pub async fn insert(
        db: &DatabaseConnection,
        report: NewReport,
    ) -> Result<ReportModel, sea_orm::DbErr> {
        let active_model = ReportActiveModel {
            user_id: Set(report.user_id),
            report_type: Set(report.report_type),
            report_data: Set(report.report_data.map(|v| v.to_string())),
            file_url: Set(report.file_url),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };
        active_model.insert(db).await
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
        ComplianceReport::find().count(db).await
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<ReportDto>, sea_orm::DbErr> {
        let rows = ComplianceReport::find()
            .order_by_desc(compliance_report::Column::CreatedAt)
            .order_by_desc(compliance_report::Column::Id)
            .all(db)
            .await?;
        Ok(rows.into_iter().map(ReportDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::connect_in_memory;
    use serde_json::json;

    #[tokio::test]
    async fn list_parses_payload() {
        let db = connect_in_memory().await.unwrap();
        ReportRepository::insert(
            &db,
            NewReport {
                user_id: "admin".to_string(),
                report_type: "monthly_disposal".to_string(),
                report_data: Some(json!({ "title": "Monthly E-Waste Disposal Report" })),
                file_url: None,
            },
        )
        .await
        .unwrap();
        ReportRepository::insert(
            &db,
            NewReport {
                user_id: "admin".to_string(),
                report_type: "audit".to_string(),
                report_data: None,
                file_url: Some("reports/audit.pdf".to_string()),
            },
        )
        .await
        .unwrap();

        let reports = ReportRepository::list(&db).await.unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].report_type, "audit");
        assert_eq!(reports[0].data_str("title"), None);
        assert_eq!(
            reports[1].data_str("title"),
            Some("Monthly E-Waste Disposal Report")
        );
    }

    #[test]
    fn malformed_payload_is_dropped() {
        let dto = ReportDto::from(ReportModel {
            id: 1,
            user_id: "u".to_string(),
            report_type: "t".to_string(),
            report_data: Some("{not json".to_string()),
            file_url: None,
            created_at: 0,
        });
        assert_eq!(dto.report_data, None);
    }
}
