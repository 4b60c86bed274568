use crate::scoring::Classification;
use crate::storage::entity::e_waste_item::{
    self, ActiveModel as ItemActiveModel, Entity as EWasteItem, Model as ItemModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryOrder, Set,
};

pub const STATUS_SUBMITTED: &str = "submitted";

#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub user_id: String,
    pub item_name: String,
    pub category: String,
    pub condition: String,
    pub department: String,
    pub description: Option<String>,
    pub weight_kg: f64,
    pub quantity: i32,
    pub estimated_value: f64,
    pub co2_saved: f64,
    pub classification: Classification,
}

pub struct ItemRepository;

impl ItemRepository {
    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        item: NewItem,
    ) -> Result<ItemModel, sea_orm::DbErr> {
        let now = Utc::now().timestamp();
        let active_model = ItemActiveModel {
            user_id: Set(item.user_id),
            item_name: Set(item.item_name),
            category: Set(item.category),
            condition: Set(item.condition),
            department: Set(item.department),
            description: Set(item.description),
            weight_kg: Set(item.weight_kg),
            quantity: Set(item.quantity),
            estimated_value: Set(item.estimated_value),
            co2_saved: Set(item.co2_saved),
            status: Set(STATUS_SUBMITTED.to_string()),
            ai_classification: Set(item.classification.label().to_string()),
            image_url: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        active_model.insert(db).await
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
        EWasteItem::find().count(db).await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<ItemModel>, sea_orm::DbErr> {
        EWasteItem::find_by_id(id).one(db).await
    }

    /// 全部记录，最新的在前
    pub async fn load_all(db: &DatabaseConnection) -> Result<Vec<ItemModel>, sea_orm::DbErr> {
        EWasteItem::find()
            .order_by_desc(e_waste_item::Column::CreatedAt)
            .order_by_desc(e_waste_item::Column::Id)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::connect_in_memory;

    fn sample(user: &str, name: &str) -> NewItem {
        NewItem {
            user_id: user.to_string(),
            item_name: name.to_string(),
            category: "Mobile Phones".to_string(),
            condition: "working".to_string(),
            department: "IT Department".to_string(),
            description: None,
            weight_kg: 0.2,
            quantity: 1,
            estimated_value: 25.0,
            co2_saved: 0.5,
            classification: Classification::Reusable,
        }
    }

    #[tokio::test]
    async fn insert_sets_status_and_label() {
        let db = connect_in_memory().await.unwrap();
        let m = ItemRepository::insert(&db, sample("u1", "iPhone 12"))
            .await
            .unwrap();
        assert!(m.id > 0);
        assert_eq!(m.status, STATUS_SUBMITTED);
        assert_eq!(m.ai_classification, "Reusable");
        assert_eq!(ItemRepository::count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn load_all_lists_newest_first() {
        let db = connect_in_memory().await.unwrap();
        ItemRepository::insert(&db, sample("u1", "a")).await.unwrap();
        ItemRepository::insert(&db, sample("u2", "b")).await.unwrap();
        ItemRepository::insert(&db, sample("u1", "c")).await.unwrap();

        // 同一秒内插入时按 id 倒序
        let rows = ItemRepository::load_all(&db).await.unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }
}
