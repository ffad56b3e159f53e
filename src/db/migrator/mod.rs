use sea_orm_migration::prelude::*;

mod m20240101_create_users;
mod m20240102_create_animes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_create_users::Migration),
            Box::new(m20240102_create_animes::Migration),
        ]
    }
}
