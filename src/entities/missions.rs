use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "missions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub worker_id: String,

    /// JSON array of item ids in load order. Duplicates are allowed.
    /// Example: ["3f0c...", "3f0c...", "9ab1..."]
    #[sea_orm(column_type = "Text")]
    pub items: String,

    /// One of `in_progress`, `finished`, `failed`
    pub state: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workers::Entity",
        from = "Column::WorkerId",
        to = "super::workers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Workers,
}

impl Related<super::workers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
