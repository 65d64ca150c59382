use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Stored trimmed and lower-cased.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub weight_limit: f64,

    /// One of `resting`, `loading`, `onMission`
    pub state: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::worker_tokens::Entity")]
    WorkerTokens,
    #[sea_orm(has_many = "super::missions::Entity")]
    Missions,
}

impl Related<super::worker_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkerTokens.def()
    }
}

impl Related<super::missions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Missions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
