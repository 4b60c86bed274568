use super::profile_name;
use crate::session::UserIdentity;
use crate::storage::entity::e_waste_item::Model as ItemModel;
use crate::storage::entity::profile::Model as ProfileModel;
use std::collections::HashSet;

const WEEK_SECS: i64 = 7 * 24 * 3600;
const LEADERBOARD_SIZE: usize = 5;
const RECENT_SIZE: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSummary {
    pub name: String,
    pub department: Option<String>,
    pub total_submissions: i32,
    pub points: i64,
    pub co2_saved: f64,
    pub rank: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub name: &'static str,
    pub description: &'static str,
    pub earned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub title: &'static str,
    pub description: &'static str,
    /// 0..=100
    pub progress: u8,
    pub reward: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentSubmission {
    pub item_name: String,
    pub category: String,
    pub created_at: i64,
    pub status: String,
    pub classification: String,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub department: String,
    pub points: i64,
    pub submissions: i32,
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub user: Option<UserSummary>,
    pub badges: Vec<Badge>,
    pub challenges: Vec<Challenge>,
    pub recent: Vec<RecentSubmission>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

fn percent(have: f64, need: f64) -> u8 {
    if need <= 0.0 {
        return 0;
    }
    ((have / need) * 100.0).clamp(0.0, 100.0).floor() as u8
}

/// `user_items` 为当前用户的全部物品；`profiles` 须按积分降序
pub fn build_dashboard(
    user: Option<&UserIdentity>,
    user_items: &[ItemModel],
    profiles: &[ProfileModel],
    now: i64,
) -> DashboardSnapshot {
    let leaderboard = profiles
        .iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(i, p)| {
            let is_current = user.map(|u| u.user_id == p.user_id).unwrap_or(false);
            LeaderboardEntry {
                rank: i + 1,
                name: if is_current {
                    "You".to_string()
                } else {
                    profile_name(p)
                },
                department: p.department.clone().unwrap_or_default(),
                points: p.points,
                submissions: p.total_submissions,
                is_current,
            }
        })
        .collect();

    let Some(user) = user else {
        return DashboardSnapshot {
            leaderboard,
            ..Default::default()
        };
    };

    let profile = profiles.iter().find(|p| p.user_id == user.user_id);
    let rank = profiles
        .iter()
        .position(|p| p.user_id == user.user_id)
        .map(|i| i + 1);
    let co2_saved: f64 = user_items.iter().map(|i| i.co2_saved).sum();
    let points = profile.map(|p| p.points).unwrap_or(0);
    let total_submissions = profile.map(|p| p.total_submissions).unwrap_or(0);
    let department = profile
        .and_then(|p| p.department.clone())
        .or_else(|| user.department.clone());

    let categories: HashSet<&str> = user_items.iter().map(|i| i.category.as_str()).collect();
    let this_week = user_items
        .iter()
        .filter(|i| now - i.created_at < WEEK_SECS)
        .count();

    let badges = vec![
        Badge {
            name: "Eco Warrior",
            description: "10+ submissions",
            earned: total_submissions >= 10,
        },
        Badge {
            name: "Recycler Pro",
            description: "5 different categories",
            earned: categories.len() >= 5,
        },
        Badge {
            name: "Green Champion",
            description: "100+ points",
            earned: points >= 100,
        },
        Badge {
            name: "Planet Saver",
            description: "50kg CO₂ saved",
            earned: co2_saved >= 50.0,
        },
    ];

    // 部门内最高分作为分母
    let dept_top = department
        .as_deref()
        .and_then(|d| {
            profiles
                .iter()
                .filter(|p| p.department.as_deref() == Some(d))
                .map(|p| p.points)
                .max()
        })
        .unwrap_or(0);

    let challenges = vec![
        Challenge {
            title: "Weekly Recycler",
            description: "Submit 3 items this week",
            progress: percent(this_week as f64, 3.0),
            reward: 100,
        },
        Challenge {
            title: "Category Master",
            description: "Submit items from 5 categories",
            progress: percent(categories.len() as f64, 5.0),
            reward: 150,
        },
        Challenge {
            title: "Department Leader",
            description: "Top contributor in your department",
            progress: percent(points as f64, dept_top as f64),
            reward: 200,
        },
    ];

    let recent = user_items
        .iter()
        .take(RECENT_SIZE)
        .map(|i| RecentSubmission {
            item_name: i.item_name.clone(),
            category: i.category.clone(),
            created_at: i.created_at,
            status: i.status.clone(),
            classification: i.ai_classification.clone(),
            points: i.estimated_value.floor() as i64,
        })
        .collect();

    DashboardSnapshot {
        user: Some(UserSummary {
            name: user.display_name().to_string(),
            department,
            total_submissions,
            points,
            co2_saved,
            rank,
        }),
        badges,
        challenges,
        recent,
        leaderboard,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn item(user: &str, category: &str, value: f64, co2: f64, created_at: i64) -> ItemModel {
        ItemModel {
            id: 0,
            user_id: user.to_string(),
            item_name: format!("{} item", category),
            category: category.to_string(),
            condition: "working".to_string(),
            department: "IT Department".to_string(),
            description: None,
            weight_kg: co2 / 2.5,
            quantity: 1,
            estimated_value: value,
            co2_saved: co2,
            status: "submitted".to_string(),
            ai_classification: "Recyclable".to_string(),
            image_url: None,
            created_at,
            updated_at: created_at,
        }
    }

    pub(crate) fn profile(user: &str, name: &str, dept: &str, points: i64, subs: i32) -> ProfileModel {
        ProfileModel {
            id: 0,
            user_id: user.to_string(),
            full_name: Some(name.to_string()),
            department: Some(dept.to_string()),
            avatar_url: None,
            points,
            total_submissions: subs,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn me() -> UserIdentity {
        UserIdentity {
            user_id: "me".to_string(),
            full_name: Some("Sarah Davis".to_string()),
            department: Some("Operations".to_string()),
        }
    }

    #[test]
    fn anonymous_dashboard_only_has_leaderboard() {
        let profiles = vec![profile("a", "Alice Johnson", "IT", 1890, 34)];
        let snap = build_dashboard(None, &[], &profiles, 0);
        assert!(snap.user.is_none());
        assert!(snap.badges.is_empty());
        assert_eq!(snap.leaderboard.len(), 1);
        assert_eq!(snap.leaderboard[0].name, "Alice Johnson");
    }

    #[test]
    fn summary_rank_and_leaderboard_marker() {
        let profiles = vec![
            profile("a", "Alice Johnson", "IT", 1890, 34),
            profile("b", "Mike Chen", "Marketing", 1650, 28),
            profile("me", "Sarah Davis", "Operations", 1250, 23),
            profile("c", "Tom Wilson", "Operations", 950, 18),
        ];
        let now = 1_000_000;
        let items = vec![
            item("me", "Mobile Phones", 25.0, 0.5, now - 100),
            item("me", "Batteries", 5.0, 1.0, now - 2 * WEEK_SECS),
        ];
        let snap = build_dashboard(Some(&me()), &items, &profiles, now);
        let user = snap.user.unwrap();
        assert_eq!(user.rank, Some(3));
        assert_eq!(user.points, 1250);
        assert_eq!(user.co2_saved, 1.5);
        assert_eq!(snap.leaderboard[2].name, "You");
        assert!(snap.leaderboard[2].is_current);
        assert_eq!(snap.recent.len(), 2);
        assert_eq!(snap.recent[0].points, 25);

        // 部门第一
        assert_eq!(snap.challenges[2].progress, 100);
        // 本周 1/3
        assert_eq!(snap.challenges[0].progress, 33);
        assert_eq!(snap.challenges[1].progress, 40);
    }

    #[test]
    fn badges_follow_thresholds() {
        let profiles = vec![profile("me", "Sarah Davis", "Operations", 120, 10)];
        let cats = [
            "Computers & Laptops",
            "Mobile Phones",
            "Monitors & TVs",
            "Batteries",
            "Other Electronics",
        ];
        let items: Vec<_> = cats
            .iter()
            .map(|c| item("me", c, 10.0, 9.0, 0))
            .collect();
        let snap = build_dashboard(Some(&me()), &items, &profiles, 0);
        let earned: Vec<_> = snap
            .badges
            .iter()
            .filter(|b| b.earned)
            .map(|b| b.name)
            .collect();
        assert_eq!(earned, vec!["Eco Warrior", "Recycler Pro", "Green Champion"]);
    }

    #[test]
    fn missing_profile_yields_zero_totals() {
        let snap = build_dashboard(Some(&me()), &[], &[], 0);
        let user = snap.user.unwrap();
        assert_eq!(user.points, 0);
        assert_eq!(user.rank, None);
        assert_eq!(user.department.as_deref(), Some("Operations"));
        assert_eq!(snap.challenges[2].progress, 0);
    }
}
