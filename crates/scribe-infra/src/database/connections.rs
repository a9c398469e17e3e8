use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

use scribe_core::ports::Repositories;

use super::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

/// Configuration for the application database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Connection attempts at startup, one second apart.
    pub connect_attempts: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            connect_attempts: 60,
        }
    }
}

/// Pooled connection to the application database.
#[derive(Clone)]
pub struct DatabasePool {
    pub conn: DbConn,
}

impl DatabasePool {
    /// Connect, retrying once per second until the database answers a ping
    /// or `connect_attempts` is exhausted.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false)
            .to_owned();

        let attempts = config.connect_attempts.max(1);
        let mut attempt = 1;
        loop {
            let outcome = match Database::connect(opts.clone()).await {
                Ok(conn) => conn.ping().await.map(|_| conn),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(conn) => {
                    tracing::info!(
                        attempt,
                        pool = config.max_connections,
                        "Database connected"
                    );
                    return Ok(Self { conn });
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(attempt, max_attempts = attempts, error = %e, "Database not ready, retrying");
                    attempt += 1;
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                Err(e) => {
                    tracing::error!(attempts, error = %e, "Giving up on database connection");
                    return Err(e);
                }
            }
        }
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.conn.ping().await
    }

    /// PostgreSQL-backed repositories sharing this pool.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(PostgresUserRepository::new(self.conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(self.conn.clone())),
            tags: Arc::new(PostgresTagRepository::new(self.conn.clone())),
            comments: Arc::new(PostgresCommentRepository::new(self.conn.clone())),
        }
    }
}
