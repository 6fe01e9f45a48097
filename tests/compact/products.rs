use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String> ,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub price: Decimal,
    pub rating: Option<f32> ,
    #[sea_orm(unique)]
    pub sku: String,
    pub status: String,
    pub meta: Option<Json> ,
    pub created_at: Option<DateTime> ,
    pub updated_at: Option<DateTime> ,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
