use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "qr_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    #[sea_orm(unique)]
    pub qr_code_data: String,
    #[sea_orm(nullable)]
    pub location: Option<String>,
    #[sea_orm(nullable)]
    pub last_scanned_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::e_waste_item::Entity",
        from = "Column::ItemId",
        to = "super::e_waste_item::Column::Id"
    )]
    EWasteItem,
}

impl Related<super::e_waste_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EWasteItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
