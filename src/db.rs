use sqlx::MySqlPool;
use tracing::info;

// Keys compare byte-wise, so `Alice` and `alice` are different accounts.
const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        employee_id     VARCHAR(64)  CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL PRIMARY KEY,
        full_name       VARCHAR(255) NOT NULL,
        department      VARCHAR(255) NOT NULL,
        username        VARCHAR(64)  CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL UNIQUE,
        password_hash   VARCHAR(255) NOT NULL,
        photo_reference VARCHAR(255) NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        employee_id    VARCHAR(64)  CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
        date           DATE         NOT NULL,
        entry_time     TIME         NULL,
        entry_location VARCHAR(255) NULL,
        exit_time      TIME         NULL,
        exit_location  VARCHAR(255) NULL,
        status         VARCHAR(16)  NOT NULL,
        PRIMARY KEY (employee_id, date)
    )
    "#,
];

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPool::connect(database_url).await
}

/// Creates the tables if they are missing. Existing tables are left as-is.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema ready");
    Ok(())
}
