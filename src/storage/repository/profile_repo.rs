use crate::session::UserIdentity;
use crate::storage::entity::profile::{
    self, ActiveModel as ProfileActiveModel, Entity as Profile, Model as ProfileModel,
};
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileTotals {
    pub points: i64,
    pub total_submissions: i32,
}

impl From<&ProfileModel> for ProfileTotals {
    fn from(model: &ProfileModel) -> Self {
        Self {
            points: model.points,
            total_submissions: model.total_submissions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub user_id: String,
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub points: i64,
    pub total_submissions: i32,
}

impl From<&UserIdentity> for NewProfile {
    fn from(user: &UserIdentity) -> Self {
        Self {
            user_id: user.user_id.clone(),
            full_name: user.full_name.clone(),
            department: user.department.clone(),
            points: 0,
            total_submissions: 0,
        }
    }
}

pub struct ProfileRepository;

impl ProfileRepository {
    /// user_id 已存在时什么也不做，返回是否新插入
    pub async fn insert_or_ignore<C: ConnectionTrait>(
        db: &C,
        new: NewProfile,
    ) -> Result<bool, sea_orm::DbErr> {
        let now = Utc::now().timestamp();
        let active_model = ProfileActiveModel {
            user_id: Set(new.user_id),
            full_name: Set(new.full_name),
            department: Set(new.department),
            avatar_url: Set(None),
            points: Set(new.points),
            total_submissions: Set(new.total_submissions),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let res = Profile::insert(active_model)
            .on_conflict(
                OnConflict::column(profile::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(res > 0)
    }

    /// 启动时确保当前用户有 profile
    pub async fn ensure(
        db: &DatabaseConnection,
        user: &UserIdentity,
    ) -> Result<ProfileModel, sea_orm::DbErr> {
        Self::insert_or_ignore(db, NewProfile::from(user)).await?;
        Self::find_by_user(db, &user.user_id)
            .await?
            .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("profile {}", user.user_id)))
    }

    pub async fn find_by_user<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
    ) -> Result<Option<ProfileModel>, sea_orm::DbErr> {
        Profile::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    /// 原子累加积分与提交次数（单条 UPDATE，不做先读后写）
    ///
    /// 返回 `None` 表示该用户没有 profile。
    pub async fn credit<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
        points: i64,
    ) -> Result<Option<ProfileTotals>, sea_orm::DbErr> {
        let now = Utc::now().timestamp();
        let res = Profile::update_many()
            .col_expr(
                profile::Column::Points,
                Expr::col(profile::Column::Points).add(points),
            )
            .col_expr(
                profile::Column::TotalSubmissions,
                Expr::col(profile::Column::TotalSubmissions).add(1),
            )
            .col_expr(profile::Column::UpdatedAt, Expr::value(now))
            .filter(profile::Column::UserId.eq(user_id))
            .exec(db)
            .await?;
        if res.rows_affected == 0 {
            return Ok(None);
        }

        let totals = Self::find_by_user(db, user_id)
            .await?
            .map(|m| ProfileTotals::from(&m));
        Ok(totals)
    }

    /// 积分排行，同分按提交数
    pub async fn load_all(db: &DatabaseConnection) -> Result<Vec<ProfileModel>, sea_orm::DbErr> {
        Profile::find()
            .order_by_desc(profile::Column::Points)
            .order_by_desc(profile::Column::TotalSubmissions)
            .order_by_asc(profile::Column::Id)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::connect_in_memory;

    fn user(id: &str) -> UserIdentity {
        UserIdentity {
            user_id: id.to_string(),
            full_name: Some("Sarah Davis".to_string()),
            department: Some("Operations Department".to_string()),
        }
    }

    #[tokio::test]
    async fn ensure_is_idempotent() {
        let db = connect_in_memory().await.unwrap();
        let first = ProfileRepository::ensure(&db, &user("u1")).await.unwrap();
        let second = ProfileRepository::ensure(&db, &user("u1")).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.points, 0);
        assert_eq!(ProfileRepository::load_all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn credit_increments_in_place() {
        let db = connect_in_memory().await.unwrap();
        ProfileRepository::ensure(&db, &user("u1")).await.unwrap();

        let t = ProfileRepository::credit(&db, "u1", 50).await.unwrap();
        assert_eq!(
            t,
            Some(ProfileTotals {
                points: 50,
                total_submissions: 1
            })
        );
        let t = ProfileRepository::credit(&db, "u1", 7).await.unwrap();
        assert_eq!(
            t,
            Some(ProfileTotals {
                points: 57,
                total_submissions: 2
            })
        );
    }

    #[tokio::test]
    async fn credit_unknown_user_reports_missing() {
        let db = connect_in_memory().await.unwrap();
        assert_eq!(ProfileRepository::credit(&db, "ghost", 10).await.unwrap(), None);
    }

    #[tokio::test]
    async fn load_all_orders_by_points() {
        let db = connect_in_memory().await.unwrap();
        for (id, pts) in [("a", 10), ("b", 300), ("c", 120)] {
            ProfileRepository::insert_or_ignore(
                &db,
                NewProfile {
                    user_id: id.to_string(),
                    full_name: None,
                    department: None,
                    points: pts,
                    total_submissions: 1,
                },
            )
            .await
            .unwrap();
        }
        let all = ProfileRepository::load_all(&db).await.unwrap();
        let ids: Vec<_> = all.iter().map(|p| p.user_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }
}
