use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "e_waste_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub item_name: String,
    pub category: String,
    pub condition: String, // working / partial / broken
    pub department: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    pub weight_kg: f64, // 总重量 = 单件重量 * 数量
    pub quantity: i32,
    pub estimated_value: f64,
    pub co2_saved: f64,
    pub status: String,
    pub ai_classification: String,
    #[sea_orm(nullable)]
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::qr_code::Entity")]
    QrCode,
}

impl Related<super::qr_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
