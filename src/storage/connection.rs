use crate::storage::entity::{compliance_report, e_waste_item, profile, qr_code};
use log::info;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::time::Duration;

pub async fn establish_connection(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());
    opt.max_connections(10)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Info);

    let db = Database::connect(opt).await?;

    if db.get_database_backend() == sea_orm::DatabaseBackend::Sqlite {
        // 启用 WAL 模式
        db.execute(sea_orm::Statement::from_string(
            sea_orm::DatabaseBackend::Sqlite,
            "PRAGMA journal_mode=WAL;".to_string(),
        ))
        .await?;
    }

    init_schema(&db).await?;
    info!("Database connection established with WAL mode and tables initialized.");

    Ok(db)
}

/// 单连接的内存库，schema 与正式库一致
#[cfg(test)]
pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await?;
    init_schema(&db).await?;
    Ok(db)
}

/// 创建表（如果不存在）
pub async fn init_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // E-waste items
    let stmt = builder.build(
        schema
            .create_table_from_entity(e_waste_item::Entity)
            .if_not_exists(),
    );
    db.execute(stmt).await?;

    // QR codes，依赖 e_waste_items
    let stmt = builder.build(
        schema
            .create_table_from_entity(qr_code::Entity)
            .if_not_exists(),
    );
    db.execute(stmt).await?;

    let stmt = builder.build(
        schema
            .create_table_from_entity(profile::Entity)
            .if_not_exists(),
    );
    db.execute(stmt).await?;

    let stmt = builder.build(
        schema
            .create_table_from_entity(compliance_report::Entity)
            .if_not_exists(),
    );
    db.execute(stmt).await?;

    if builder == sea_orm::DatabaseBackend::Sqlite {
        db.execute(sea_orm::Statement::from_string(
            builder,
            "CREATE INDEX IF NOT EXISTS idx_e_waste_items_user_id ON e_waste_items(user_id);"
                .to_string(),
        ))
        .await?;
        db.execute(sea_orm::Statement::from_string(
            builder,
            "CREATE INDEX IF NOT EXISTS idx_qr_codes_item_id ON qr_codes(item_id);".to_string(),
        ))
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_init_is_idempotent() {
        let db = connect_in_memory().await.unwrap();
        init_schema(&db).await.unwrap();

        let rows = db
            .query_all(sea_orm::Statement::from_string(
                sea_orm::DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name;".to_string(),
            ))
            .await
            .unwrap();
        let names: Vec<String> = rows
            .iter()
            .filter_map(|r| r.try_get::<String>("", "name").ok())
            .collect();
        for table in ["compliance_reports", "e_waste_items", "profiles", "qr_codes"] {
            assert!(names.iter().any(|n| n == table), "missing table {table}");
        }
    }
}
