use sea_orm::entity::prelude::*;

/// One issued bearer token. A worker may hold several at once; deleting a
/// row revokes that token immediately.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "worker_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub worker_id: String,

    #[sea_orm(column_type = "Text")]
    pub token: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workers::Entity",
        from = "Column::WorkerId",
        to = "super::workers::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Workers,
}

impl Related<super::workers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
