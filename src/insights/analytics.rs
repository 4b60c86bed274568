//! 全局统计：部门、类别、月度趋势与贡献榜

use super::profile_name;
use crate::storage::entity::e_waste_item::Model as ItemModel;
use crate::storage::entity::profile::Model as ProfileModel;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::collections::{BTreeMap, HashSet};

pub const TREND_MONTHS: usize = 6;
const TOP_CONTRIBUTORS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub label: String,
    /// 按数量计
    pub items: i64,
    pub percentage: u8,
    pub co2_saved: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTrend {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub items: i64,
    pub co2_saved: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    pub name: String,
    pub department: String,
    pub items: i32,
    pub points: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsSnapshot {
    pub total_items: i64,
    pub total_co2: f64,
    pub total_weight_kg: f64,
    pub total_value: f64,
    pub active_contributors: usize,
    pub departments: Vec<Breakdown>,
    pub categories: Vec<Breakdown>,
    pub monthly: Vec<MonthlyTrend>,
    pub top_contributors: Vec<Contributor>,
}

fn breakdown<'a>(items: &'a [ItemModel], key: impl Fn(&'a ItemModel) -> &'a str) -> Vec<Breakdown> {
    let mut acc: BTreeMap<&str, (i64, f64)> = BTreeMap::new();
    let mut total = 0i64;
    for item in items {
        let qty = i64::from(item.quantity.max(0));
        let e = acc.entry(key(item)).or_default();
        e.0 += qty;
        e.1 += item.co2_saved;
        total += qty;
    }
    let mut out: Vec<Breakdown> = acc
        .into_iter()
        .map(|(label, (count, co2))| Breakdown {
            label: label.to_string(),
            items: count,
            percentage: if total > 0 {
                ((count as f64 * 100.0) / total as f64).round() as u8
            } else {
                0
            },
            co2_saved: co2,
        })
        .collect();
    // BTreeMap 已按名称排序，稳定排序后同数量保持字母序
    out.sort_by(|a, b| b.items.cmp(&a.items));
    out
}

fn month_key(year: i32, month0: u32, back: usize) -> (i32, u32) {
    let total = year * 12 + month0 as i32 - back as i32;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

fn monthly(items: &[ItemModel], now: DateTime<Utc>) -> Vec<MonthlyTrend> {
    let mut out: Vec<MonthlyTrend> = (0..TREND_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = month_key(now.year(), now.month0(), back);
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format("%b").to_string())
                .unwrap_or_default();
            MonthlyTrend {
                label,
                year,
                month,
                items: 0,
                co2_saved: 0.0,
            }
        })
        .collect();

    for item in items {
        let Some(at) = DateTime::from_timestamp(item.created_at, 0) else {
            continue;
        };
        if let Some(slot) = out
            .iter_mut()
            .find(|m| m.year == at.year() && m.month == at.month())
        {
            slot.items += i64::from(item.quantity.max(0));
            slot.co2_saved += item.co2_saved;
        }
    }
    out
}

/// `profiles` 须按积分降序
pub fn build_analytics(
    items: &[ItemModel],
    profiles: &[ProfileModel],
    now: DateTime<Utc>,
) -> AnalyticsSnapshot {
    let contributors: HashSet<&str> = items.iter().map(|i| i.user_id.as_str()).collect();

    AnalyticsSnapshot {
        total_items: items.iter().map(|i| i64::from(i.quantity.max(0))).sum(),
        total_co2: items.iter().map(|i| i.co2_saved).sum(),
        total_weight_kg: items.iter().map(|i| i.weight_kg).sum(),
        total_value: items.iter().map(|i| i.estimated_value).sum(),
        active_contributors: contributors.len(),
        departments: breakdown(items, |i| i.department.as_str()),
        categories: breakdown(items, |i| i.category.as_str()),
        monthly: monthly(items, now),
        top_contributors: profiles
            .iter()
            .take(TOP_CONTRIBUTORS)
            .map(|p| Contributor {
                name: profile_name(p),
                department: p.department.clone().unwrap_or_default(),
                items: p.total_submissions,
                points: p.points,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::dashboard::tests::{item, profile};
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap().timestamp()
    }

    #[test]
    fn empty_input_gives_zeroed_trend() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let snap = build_analytics(&[], &[], now);
        assert_eq!(snap.total_items, 0);
        assert!(snap.departments.is_empty());
        let labels: Vec<_> = snap.monthly.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        assert_eq!(snap.monthly[0].year, 2023);
        assert!(snap.monthly.iter().all(|m| m.items == 0));
    }

    #[test]
    fn breakdowns_sum_quantities_and_sort() {
        let mut a = item("u1", "Batteries", 5.0, 1.0, 0);
        a.quantity = 3;
        a.department = "Operations".into();
        let b = item("u2", "Mobile Phones", 25.0, 0.5, 0);
        let c = item("u1", "Cables & Accessories", 2.0, 0.25, 0);

        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let snap = build_analytics(&[a, b, c], &[], now);
        assert_eq!(snap.total_items, 5);
        assert_eq!(snap.active_contributors, 2);
        assert_eq!(snap.categories[0].label, "Batteries");
        assert_eq!(snap.categories[0].items, 3);
        assert_eq!(snap.categories[0].percentage, 60);
        assert_eq!(snap.categories[1].label, "Cables & Accessories");
        assert_eq!(snap.departments[0].label, "Operations");
        assert_eq!(snap.departments[1].label, "IT Department");
        assert_eq!(snap.departments[1].items, 2);
    }

    #[test]
    fn trend_buckets_by_month_and_drops_old_items() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let items = vec![
            item("u", "Batteries", 5.0, 1.0, at(2024, 3, 1)),
            item("u", "Batteries", 5.0, 2.0, at(2024, 3, 10)),
            item("u", "Batteries", 5.0, 4.0, at(2023, 12, 31)),
            item("u", "Batteries", 5.0, 8.0, at(2023, 9, 30)),
        ];
        let snap = build_analytics(&items, &[], now);
        let mar = snap.monthly.last().unwrap();
        assert_eq!((mar.items, mar.co2_saved), (2, 3.0));
        let dec = snap.monthly.iter().find(|m| m.month == 12).unwrap();
        assert_eq!(dec.items, 1);
        let counted: i64 = snap.monthly.iter().map(|m| m.items).sum();
        assert_eq!(counted, 3);
    }

    #[test]
    fn top_contributors_follow_profile_order() {
        let profiles: Vec<_> = (0..7)
            .map(|i| profile(&format!("u{i}"), &format!("User {i}"), "IT", 100 - i, 7 - i as i32))
            .collect();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let snap = build_analytics(&[], &profiles, now);
        assert_eq!(snap.top_contributors.len(), 5);
        assert_eq!(snap.top_contributors[0].name, "User 0");
        assert_eq!(snap.top_contributors[4].points, 96);
    }
}
