use crate::config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let mut connect_options = connect_options(config)?;

    // 设置慢查询日志阈值为 5秒
    connect_options = connect_options.log_slow_statements(
        tracing::log::LevelFilter::Warn,
        Duration::from_secs(5)
    );

    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options)
        .await
}

/// 由 DATABASE_URL 或 DB_* 拼装连接参数
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    if let Some(url) = &config.url {
        return PgConnectOptions::from_str(url);
    }

    let mut options = PgConnectOptions::new().port(config.port);
    if let Some(host) = &config.host {
        // 以 / 开头的是 unix socket 目录 (Cloud SQL)
        options = if host.starts_with('/') {
            options.socket(host)
        } else {
            options.host(host)
        };
    }
    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    if let Some(name) = &config.name {
        options = options.database(name);
    }

    let ssl_mode = if config.requires_tls() {
        PgSslMode::Require
    } else {
        PgSslMode::Disable
    };
    Ok(options.ssl_mode(ssl_mode))
}

/// 启动时建表 (已存在则跳过)
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS receipts (
            id            BIGSERIAL PRIMARY KEY,
            merchant      TEXT    NOT NULL DEFAULT 'Unknown Merchant',
            total         NUMERIC NOT NULL DEFAULT 0,
            purchase_date DATE    NOT NULL DEFAULT CURRENT_DATE
        )
        "#
    )
    .execute(pool)
    .await?;
    Ok(())
}
