use crate::error::StartupError;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;

/// Process-wide handle to the pooled database connection.
#[derive(Clone)]
pub struct DbConnection {
    inner: Arc<DatabaseConnection>,
}

impl DbConnection {
    /// Establish the connection pool from a connection string.
    ///
    /// SQLite URLs get their backing file created on first start so a fresh
    /// checkout can boot without a provisioning step.
    pub async fn connect(url: &str) -> Result<Self, StartupError> {
        let url = if let Some(path) = url.strip_prefix("sqlite://") {
            let path = path.trim_start_matches("./");
            if !path.starts_with(":memory:") {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).ok();
                    }
                }
            }
            format!("sqlite:{}?mode=rwc", path)
        } else {
            url.to_string()
        };

        let mut options = ConnectOptions::new(&url);
        options
            .max_connections(10)
            .connect_timeout(Duration::from_secs(5))
            .sqlx_logging(false);

        let inner = Database::connect(options)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Acquire a request-scoped context. Cheap; the pool is shared, the
    /// scope's lifetime bounds the request's use of it.
    pub fn scope(&self) -> DbScope {
        DbScope {
            inner: self.inner.clone(),
        }
    }
}

/// Request-scoped view of the persistence context. Held by repositories for
/// the duration of one request and dropped with them.
#[derive(Clone)]
pub struct DbScope {
    inner: Arc<DatabaseConnection>,
}

impl DbScope {
    pub fn conn(&self) -> &DatabaseConnection {
        &self.inner
    }
}

impl AsRef<DatabaseConnection> for DbScope {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.inner
    }
}
