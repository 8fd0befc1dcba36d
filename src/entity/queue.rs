//! Queue entity model for Sea-ORM database interaction.
//!
//! Maps to the `office_hours_queue` table, one row per office-hours session.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing one office-hours session.
///
/// # Database Schema
///
/// | Column     | Type               | Description                              |
/// |------------|--------------------|------------------------------------------|
/// | id         | INTEGER (PK)       | Auto-incremented session id              |
/// | owner_id   | TEXT               | Chat user id of the instructor           |
/// | channel_id | TEXT               | Channel the session was opened in        |
/// | status     | TEXT               | `open` or `closed`                       |
/// | opened_at  | TIMESTAMPTZ        | When the session was opened              |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "office_hours_queue")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub owner_id: String,

    #[sea_orm(column_type = "Text")]
    pub channel_id: String,

    /// Lowercase [`QueueStatus`](crate::QueueStatus) name.
    #[sea_orm(column_type = "Text")]
    pub status: String,

    pub opened_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::queue_entry::Entity")]
    QueueEntry,
}

impl Related<super::queue_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QueueEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
