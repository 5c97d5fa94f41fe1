use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub symbol: String,
    #[sea_orm(column_type = "Text")]
    pub destination: String,
    pub created_at: DateTimeUtc,
    pub expires_at: Option<DateTimeUtc>,
    pub deleted: bool,
    /// Set together with `deleted`; the sweeper measures the grace period from it
    pub deleted_at: Option<DateTimeUtc>,
    /// Back-reference to `tokens.token`, never a foreign key
    pub owner_token: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
