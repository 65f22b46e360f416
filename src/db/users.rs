use std::sync::Arc;

use sqlx::postgres::PgConnectOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::config::DbConfig;
use crate::db::{at_most_one, DbError};
use crate::models::{User, UserUpdate};
use crate::time::{SystemTimeProvider, TimeProvider};

/// CRUD access to the `users` table. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct UserDbClient {
    pool: PgPool,
    time_provider: Arc<dyn TimeProvider>,
}

impl UserDbClient {
    /// Builds a lazily-connecting pool. Nothing touches the network until the
    /// first query.
    pub fn new(config: &DbConfig, time_provider: Option<Arc<dyn TimeProvider>>) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password);

        Self::from_pool(PgPool::connect_lazy_with(options), time_provider)
    }

    pub fn from_pool(pool: PgPool, time_provider: Option<Arc<dyn TimeProvider>>) -> Self {
        Self {
            pool,
            time_provider: time_provider.unwrap_or_else(|| Arc::new(SystemTimeProvider)),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn add_user(&self, user_name: &str, email: &str) -> Result<User, DbError> {
        let id = Uuid::now_v7().to_string();
        let created_at = self.time_provider.now_utc();

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (user_id, username, email, active, created_at)
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&id)
        .bind(user_name)
        .bind(email)
        .bind(true)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Added user {}", user.id);
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, DbError> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        at_most_one(id, rows)
    }

    /// One page of users in primary-key order. Ids are time-ordered, so this
    /// is also creation order.
    pub async fn get_users(&self, offset: i64, limit: i64) -> Result<Vec<User>, DbError> {
        if offset < 0 || limit < 0 {
            return Err(DbError::InvalidPage { offset, limit });
        }

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY user_id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Runs inside a transaction so an id matching several rows leaves the
    /// store untouched.
    pub async fn update_user(&self, update: &UserUpdate) -> Result<Option<User>, DbError> {
        let mut statement = update_statement(update)?;
        let mut tx = self.pool.begin().await?;
        let rows = statement
            .build_query_as::<User>()
            .fetch_all(&mut *tx)
            .await?;

        let user = at_most_one(&update.id, rows)?;
        tx.commit().await?;
        if user.is_some() {
            tracing::debug!("Updated user {}", update.id);
        }
        Ok(user)
    }

    /// Hard delete, returning the removed row. Same transaction rule as
    /// [`Self::update_user`].
    pub async fn delete_user(&self, id: &str) -> Result<Option<User>, DbError> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query_as::<_, User>("DELETE FROM users WHERE user_id = $1 RETURNING *")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        let user = at_most_one(id, rows)?;
        tx.commit().await?;
        if user.is_some() {
            tracing::debug!("Deleted user {id}");
        }
        Ok(user)
    }
}

/// `UPDATE users SET ... WHERE user_id = $n RETURNING *` with one clause per
/// provided field, always in the order username, email, active. Every value
/// is a positional bind; the id is bound last.
fn update_statement(update: &UserUpdate) -> Result<QueryBuilder<'static, Postgres>, DbError> {
    if update.is_empty() {
        return Err(DbError::EmptyUpdate {
            id: update.id.clone(),
        });
    }

    let mut builder = QueryBuilder::new("UPDATE users SET ");
    let mut set = builder.separated(", ");
    if let Some(user_name) = &update.user_name {
        set.push("username = ").push_bind_unseparated(user_name.clone());
    }
    if let Some(email) = &update.email {
        set.push("email = ").push_bind_unseparated(email.clone());
    }
    if let Some(active) = update.active {
        set.push("active = ").push_bind_unseparated(active);
    }

    builder
        .push(" WHERE user_id = ")
        .push_bind(update.id.clone())
        .push(" RETURNING *");
    Ok(builder)
}
