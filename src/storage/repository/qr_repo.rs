use crate::storage::entity::e_waste_item::{Entity as EWasteItem, Model as ItemModel};
use crate::storage::entity::qr_code::{
    self, ActiveModel as QrActiveModel, Entity as QrCode, Model as QrModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

pub const DEFAULT_QR_LOCATION: &str = "Storage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQrCode {
    pub item_id: i32,
    pub qr_code_data: String,
    pub location: Option<String>,
}

/// QR 记录连同所属物品
#[derive(Debug, Clone)]
pub struct QrListingRow {
    pub qr: QrModel,
    pub item: Option<ItemModel>,
}

pub struct QrCodeRepository;

impl QrCodeRepository {
    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        qr: NewQrCode,
    ) -> Result<QrModel, sea_orm::DbErr> {
        let active_model = QrActiveModel {
            item_id: Set(qr.item_id),
            qr_code_data: Set(qr.qr_code_data),
            location: Set(qr.location),
            last_scanned_at: Set(None),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };
        active_model.insert(db).await
    }

    pub async fn count(db: &DatabaseConnection) -> Result<u64, sea_orm::DbErr> {
        QrCode::find().count(db).await
    }

    #[cfg(test)]
    pub async fn find_by_item(
        db: &DatabaseConnection,
        item_id: i32,
    ) -> Result<Vec<QrModel>, sea_orm::DbErr> {
        QrCode::find()
            .filter(qr_code::Column::ItemId.eq(item_id))
            .all(db)
            .await
    }

    pub async fn find_by_code(
        db: &DatabaseConnection,
        code: &str,
    ) -> Result<Option<QrModel>, sea_orm::DbErr> {
        QrCode::find()
            .filter(qr_code::Column::QrCodeData.eq(code))
            .one(db)
            .await
    }

    pub async fn list_with_items(
        db: &DatabaseConnection,
    ) -> Result<Vec<QrListingRow>, sea_orm::DbErr> {
        let rows = QrCode::find()
            .find_also_related(EWasteItem)
            .order_by_desc(qr_code::Column::CreatedAt)
            .order_by_desc(qr_code::Column::Id)
            .all(db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(qr, item)| QrListingRow { qr, item })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Classification;
    use crate::storage::connect_in_memory;
    use crate::storage::repository::{ItemRepository, NewItem};

    #[tokio::test]
    async fn listing_joins_owning_item() {
        let db = connect_in_memory().await.unwrap();
        let item = ItemRepository::insert(
            &db,
            NewItem {
                user_id: "u1".to_string(),
                item_name: "Dell Laptop XPS 13".to_string(),
                category: "Computers & Laptops".to_string(),
                condition: "partial".to_string(),
                department: "Marketing Department".to_string(),
                description: None,
                weight_kg: 1.3,
                quantity: 1,
                estimated_value: 30.0,
                co2_saved: 3.25,
                classification: Classification::Recyclable,
            },
        )
        .await
        .unwrap();
        QrCodeRepository::insert(
            &db,
            NewQrCode {
                item_id: item.id,
                qr_code_data: format!("ewaste_{}_1700000000000", item.id),
                location: Some(DEFAULT_QR_LOCATION.to_string()),
            },
        )
        .await
        .unwrap();

        let rows = QrCodeRepository::list_with_items(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].qr.last_scanned_at, None);
        assert_eq!(
            rows[0].item.as_ref().map(|i| i.item_name.as_str()),
            Some("Dell Laptop XPS 13")
        );
        let found = QrCodeRepository::find_by_code(&db, &rows[0].qr.qr_code_data)
            .await
            .unwrap();
        assert_eq!(found.map(|q| q.item_id), Some(item.id));
    }
}
