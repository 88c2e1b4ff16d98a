//! Bug entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bugs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub severity: String,
    pub priority: String,
    pub status: String,
    #[sea_orm(column_name = "type")]
    pub bug_type: String,
    pub environment: Option<String>,
    pub build_version: Option<String>,
    pub steps_to_reproduce: Option<String>,
    pub expected_result: Option<String>,
    pub actual_result: Option<String>,
    pub test_case_id: Option<i32>,
    pub reported_by: Option<i32>,
    pub assigned_to: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_case::Entity",
        from = "Column::TestCaseId",
        to = "super::test_case::Column::Id"
    )]
    TestCase,
}

impl Related<super::test_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestCase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
