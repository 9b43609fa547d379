use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Number of embedded migrations not yet recorded as applied.
pub async fn pending_count(pool: &DbPool) -> Result<usize, sqlx::Error> {
    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    let applied: Vec<i64> = if tracked == 0 {
        Vec::new()
    } else {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success = 1")
            .fetch_all(pool)
            .await?
    };

    Ok(MIGRATOR
        .iter()
        .filter(|migration| !migration.migration_type.is_down_migration())
        .filter(|migration| !applied.contains(&migration.version))
        .count())
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::{pending_count, run_pending};
    use crate::{connect_with_settings, migrations::MIGRATOR};

    const MANAGED_SCHEMA_OBJECTS: &[&str] = &["product", "idx_product_name"];

    #[tokio::test]
    async fn migrations_create_catalog_schema() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        for object in MANAGED_SCHEMA_OBJECTS {
            let count = sqlx::query(
                "SELECT COUNT(*) AS count FROM sqlite_master WHERE name = ?",
            )
            .bind(object)
            .fetch_one(&pool)
            .await
            .expect("check schema object")
            .get::<i64, _>("count");

            assert_eq!(count, 1, "expected schema object `{object}` to exist");
        }

        pool.close().await;
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run");

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
            .fetch_one(&pool)
            .await
            .expect("count applied migrations");
        assert_eq!(applied, MIGRATOR.iter().count() as i64);

        pool.close().await;
    }

    #[tokio::test]
    async fn negative_quantity_is_rejected_by_schema() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let result = sqlx::query(
            "INSERT INTO product (id, name, description, quantity, price) VALUES (1, 'x', '', -1, '1.00')",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err());
        pool.close().await;
    }

    #[tokio::test]
    async fn pending_count_drops_to_zero_after_run() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");

        let before = pending_count(&pool).await.expect("count before");
        run_pending(&pool).await.expect("run migrations");
        let after = pending_count(&pool).await.expect("count after");

        assert_eq!(before, MIGRATOR.iter().count());
        assert!(before > 0);
        assert_eq!(after, 0);
        pool.close().await;
    }
}
