use crate::storage::repository::{
    ItemRepository, NewItem, NewQrCode, ProfileRepository, ProfileTotals, QrCodeRepository,
};
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbErr};

/// 提交流程依赖的三个写操作
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// 返回新物品 id
    async fn insert_item(&self, item: NewItem) -> Result<i32, DbErr>;

    async fn insert_qr_code(&self, qr: NewQrCode) -> Result<i32, DbErr>;

    /// 原子累加；`Ok(None)` 表示用户没有 profile
    async fn credit_profile(
        &self,
        user_id: &str,
        points: i64,
    ) -> Result<Option<ProfileTotals>, DbErr>;
}

/// 可以挂在连接池上，也可以挂在事务上
pub struct SeaOrmStore<'c, C> {
    conn: &'c C,
}

impl<'c, C> SeaOrmStore<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'c, C> SubmissionStore for SeaOrmStore<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn insert_item(&self, item: NewItem) -> Result<i32, DbErr> {
        let model = ItemRepository::insert(self.conn, item).await?;
        Ok(model.id)
    }

    async fn insert_qr_code(&self, qr: NewQrCode) -> Result<i32, DbErr> {
        let model = QrCodeRepository::insert(self.conn, qr).await?;
        Ok(model.id)
    }

    async fn credit_profile(
        &self,
        user_id: &str,
        points: i64,
    ) -> Result<Option<ProfileTotals>, DbErr> {
        ProfileRepository::credit(self.conn, user_id, points).await
    }
}
