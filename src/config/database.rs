//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Schema statements are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without manual SQL. The one piece the entity
//! derive cannot express - the composite unique index guarding the contract
//! (student, product) pair - is created explicitly right after the tables.

use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

use crate::entities::{
    Contract, GroupStudent, Lead, Lesson, Payment, Product, Student, StudentsGroup, Teacher,
    TeacherPayment, User, contract,
};
use crate::errors::Result;

/// Gets the database URL from the environment or returns the default
/// `SQLite` path, creating the file on first use.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/ncc_school.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all tables (and the contract-pair unique index) if they do not
/// exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Student),
        schema.create_table_from_entity(Teacher),
        schema.create_table_from_entity(Contract),
        schema.create_table_from_entity(StudentsGroup),
        schema.create_table_from_entity(GroupStudent),
        schema.create_table_from_entity(Lesson),
        schema.create_table_from_entity(Payment),
        schema.create_table_from_entity(TeacherPayment),
        schema.create_table_from_entity(Lead),
        schema.create_table_from_entity(User),
    ];
    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    // Uniqueness of the (student, product) pair is declared over physical
    // rows - soft-deleted contracts block the pair as much as live ones.
    let contract_pair = Index::create()
        .name("idx_contracts_student_product")
        .table(Contract)
        .col(contract::Column::StudentId)
        .col(contract::Column::ProductId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&contract_pair)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Every table answers a trivial query once created
        let _ = Product::find().limit(1).all(&db).await?;
        let _ = Student::find().limit(1).all(&db).await?;
        let _ = Teacher::find().limit(1).all(&db).await?;
        let _ = Contract::find().limit(1).all(&db).await?;
        let _ = StudentsGroup::find().limit(1).all(&db).await?;
        let _ = GroupStudent::find().limit(1).all(&db).await?;
        let _ = Lesson::find().limit(1).all(&db).await?;
        let _ = Payment::find().limit(1).all(&db).await?;
        let _ = TeacherPayment::find().limit(1).all(&db).await?;
        let _ = Lead::find().limit(1).all(&db).await?;
        let _ = User::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
