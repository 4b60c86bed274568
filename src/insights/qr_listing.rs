use super::profile_name;
use crate::storage::entity::profile::Model as ProfileModel;
use crate::storage::repository::QrListingRow;
use std::collections::HashMap;

/// QR 管理页的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrEntry {
    pub code: String,
    pub item_id: i32,
    pub item_name: String,
    pub category: String,
    pub submitter: String,
    pub location: String,
    pub status: String,
    pub created_at: i64,
    pub last_scanned_at: Option<i64>,
}

pub fn build_qr_entries(rows: Vec<QrListingRow>, profiles: &[ProfileModel]) -> Vec<QrEntry> {
    let names: HashMap<&str, String> = profiles
        .iter()
        .map(|p| (p.user_id.as_str(), profile_name(p)))
        .collect();

    rows.into_iter()
        .map(|QrListingRow { qr, item }| {
            // 孤立的 QR 行（物品已不存在）仍然列出
            let (item_name, category, status, submitter) = match item {
                Some(item) => {
                    let submitter = names
                        .get(item.user_id.as_str())
                        .cloned()
                        .unwrap_or(item.user_id);
                    (item.item_name, item.category, item.status, submitter)
                }
                None => (
                    format!("#{}", qr.item_id),
                    String::new(),
                    "missing".to_string(),
                    String::new(),
                ),
            };
            QrEntry {
                code: qr.qr_code_data,
                item_id: qr.item_id,
                item_name,
                category,
                submitter,
                location: qr.location.unwrap_or_default(),
                status,
                created_at: qr.created_at,
                last_scanned_at: qr.last_scanned_at,
            }
        })
        .collect()
}

/// 按物品名、QR 码、提交人做不区分大小写的子串匹配；空查询返回全部
pub fn matches_query(entry: &QrEntry, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    [&entry.item_name, &entry.code, &entry.submitter]
        .iter()
        .any(|s| s.to_lowercase().contains(&q))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::dashboard::tests::{item, profile};
    use crate::storage::entity::qr_code::Model as QrModel;

    fn qr(item_id: i32, code: &str) -> QrModel {
        QrModel {
            id: item_id,
            item_id,
            qr_code_data: code.to_string(),
            location: Some("Storage".to_string()),
            last_scanned_at: None,
            created_at: 10,
        }
    }

    fn entries() -> Vec<QrEntry> {
        let mut laptop = item("u1", "Computers & Laptops", 50.0, 5.0, 0);
        laptop.id = 1;
        laptop.item_name = "Dell Latitude".to_string();
        let mut phone = item("u2", "Mobile Phones", 25.0, 0.5, 0);
        phone.id = 2;
        phone.item_name = "iPhone 12".to_string();
        let rows = vec![
            QrListingRow {
                qr: qr(1, "ewaste_1_1700000000000"),
                item: Some(laptop),
            },
            QrListingRow {
                qr: qr(2, "ewaste_2_1700000000500"),
                item: Some(phone),
            },
            QrListingRow {
                qr: qr(9, "ewaste_9_1"),
                item: None,
            },
        ];
        let profiles = vec![profile("u1", "Alice Johnson", "IT", 10, 1)];
        build_qr_entries(rows, &profiles)
    }

    #[test]
    fn submitter_falls_back_to_user_id() {
        let list = entries();
        assert_eq!(list[0].submitter, "Alice Johnson");
        assert_eq!(list[1].submitter, "u2");
        assert_eq!(list[2].item_name, "#9");
        assert_eq!(list[0].location, "Storage");
    }

    #[test]
    fn search_is_case_insensitive_over_three_columns() {
        let list = entries();
        let hits = |q: &str| list.iter().filter(|e| matches_query(e, q)).count();
        assert_eq!(hits(""), 3);
        assert_eq!(hits("  "), 3);
        assert_eq!(hits("IPHONE"), 1);
        assert_eq!(hits("alice"), 1);
        assert_eq!(hits("ewaste_2_"), 1);
        assert_eq!(hits("ewaste"), 3);
        assert_eq!(hits("toaster"), 0);
    }
}
