//! Queue entry entity model for Sea-ORM database interaction.
//!
//! Maps to the `office_hours_queue_entry` table. A row is inserted when a student
//! joins a session and only its `resolved` column changes afterwards.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing a single help request.
///
/// # Database Schema
///
/// | Column        | Type               | Description                                 |
/// |---------------|--------------------|---------------------------------------------|
/// | id            | INTEGER (PK)       | Auto-incremented entry id, i.e. arrival order |
/// | queue_id      | INTEGER (FK)       | Owning `office_hours_queue` row             |
/// | user_id       | TEXT               | Chat user id of the student                 |
/// | question      | TEXT NULL          | Optional question text                      |
/// | private_entry | BOOLEAN            | Hide the question from public listings      |
/// | resolved      | TEXT               | `waiting`, `conversing` or `resolved`       |
/// | created_at    | TIMESTAMPTZ        | When the student joined                     |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "office_hours_queue_entry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub queue_id: i32,

    #[sea_orm(column_type = "Text")]
    pub user_id: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub question: Option<String>,

    pub private_entry: bool,

    /// Lowercase [`StudentStatus`](crate::StudentStatus) name.
    #[sea_orm(column_type = "Text")]
    pub resolved: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::queue::Entity",
        from = "Column::QueueId",
        to = "super::queue::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Queue,
}

impl Related<super::queue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Queue.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
