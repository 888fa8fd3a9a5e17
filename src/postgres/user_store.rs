//! PostgreSQL-backed [`UserStore`]

use super::config::{health_check, Pool};
use crate::user::models::{User, UserType};
use crate::user::query::{Page, UserQuery};
use crate::user::repository::{ProfileChanges, StoreError, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Object;
use tokio_postgres::error::SqlState;
use tokio_postgres::Row;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password, user_type, created_at, updated_at";

/// PostgreSQL implementation of the UserStore
pub struct PgUserStore {
    pool: Pool,
}

impl PgUserStore {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
        }
    }

    /// Creates the `users` table if it doesn't exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let client = self.client().await?;
        client
            .batch_execute(
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id UUID PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    password TEXT NOT NULL,
                    user_type TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL,
                    updated_at TIMESTAMPTZ NOT NULL
                );
                CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email);
                CREATE INDEX IF NOT EXISTS users_user_type_idx ON users (user_type);
                "#,
            )
            .await
            .map_err(map_pg_error)
    }

    async fn client(&self) -> Result<Object, StoreError> {
        self.pool.get().await.map_err(|e| StoreError::Connection(e.to_string()))
    }
}

fn map_pg_error(error: tokio_postgres::Error) -> StoreError {
    if error.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        StoreError::DuplicateEmail
    } else {
        StoreError::Query(error.to_string())
    }
}

fn row_to_user(row: &Row) -> Result<User, StoreError> {
    let user_type: String = row.try_get("user_type").map_err(map_pg_error)?;
    Ok(User {
        id: row.try_get("id").map_err(map_pg_error)?,
        name: row.try_get("name").map_err(map_pg_error)?,
        email: row.try_get("email").map_err(map_pg_error)?,
        password: row.try_get("password").map_err(map_pg_error)?,
        user_type: user_type
            .parse::<UserType>()
            .map_err(|t| StoreError::Query(format!("Unknown user_type in row: {t}")))?,
        created_at: row.try_get("created_at").map_err(map_pg_error)?,
        updated_at: row.try_get("updated_at").map_err(map_pg_error)?,
    })
}

/// `ILIKE` pattern matching `raw` as a literal substring
pub fn like_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 2);
    escaped.push('%');
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// ORDER BY clause; both parts come from closed enums
fn order_clause(query: &UserQuery) -> String {
    format!(
        "ORDER BY {} COLLATE \"C\" {}, id ASC",
        query.sort_by.column(),
        query.sort_order.keyword()
    )
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let client = self.client().await?;
        client
            .execute(
                "INSERT INTO users (id, name, email, password, user_type, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &[
                    &user.id,
                    &user.name,
                    &user.email,
                    &user.password,
                    &user.user_type.as_str(),
                    &user.created_at,
                    &user.updated_at,
                ],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let client = self.client().await?;
        let row = client
            .query_opt(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"), &[&id])
            .await
            .map_err(map_pg_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let client = self.client().await?;
        let row = client
            .query_opt(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"), &[&email])
            .await
            .map_err(map_pg_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        user_type: UserType,
        changes: &ProfileChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, StoreError> {
        let client = self.client().await?;
        let row = client
            .query_opt(
                &format!(
                    "UPDATE users
                     SET name = COALESCE($1, name), email = COALESCE($2, email), updated_at = $3
                     WHERE id = $4 AND user_type = $5
                     RETURNING {USER_COLUMNS}"
                ),
                &[&changes.name, &changes.email, &updated_at, &id, &user_type.as_str()],
            )
            .await
            .map_err(map_pg_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn update_password(
        &self,
        id: Uuid,
        user_type: UserType,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let client = self.client().await?;
        let updated = client
            .execute(
                "UPDATE users SET password = $1, updated_at = $2 WHERE id = $3 AND user_type = $4",
                &[&password_hash, &updated_at, &id, &user_type.as_str()],
            )
            .await
            .map_err(map_pg_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let client = self.client().await?;
        let deleted = client
            .execute("DELETE FROM users WHERE id = $1", &[&id])
            .await
            .map_err(map_pg_error)?;
        Ok(deleted > 0)
    }

    async fn list(&self, query: &UserQuery) -> Result<Page<User>, StoreError> {
        let client = self.client().await?;
        let user_type = query.user_type.as_str();
        let name = query.name_filter.as_deref().map(like_pattern);
        let email = query.email_filter.as_deref().map(like_pattern);
        let filter = "WHERE user_type = $1
                      AND ($2::TEXT IS NULL OR name ILIKE $2)
                      AND ($3::TEXT IS NULL OR email ILIKE $3)";

        let count_row = client
            .query_one(&format!("SELECT COUNT(*) AS count FROM users {filter}"), &[&user_type, &name, &email])
            .await
            .map_err(map_pg_error)?;
        let count: i64 = count_row.try_get("count").map_err(map_pg_error)?;

        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);
        let rows = client
            .query(
                &format!(
                    "SELECT {USER_COLUMNS} FROM users {filter} {} LIMIT $4 OFFSET $5",
                    order_clause(query)
                ),
                &[&user_type, &name, &email, &limit, &offset],
            )
            .await
            .map_err(map_pg_error)?;

        let items = rows.iter().map(row_to_user).collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, u64::try_from(count).unwrap_or(0), query.limit))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        health_check(&self.pool).await.map_err(StoreError::Connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::query::{SortField, SortOrder};

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("jane"), "%jane%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_order_clause() {
        let mut query = UserQuery::new(UserType::Client);
        assert_eq!(order_clause(&query), "ORDER BY name COLLATE \"C\" ASC, id ASC");

        query.sort_by = SortField::Email;
        query.sort_order = SortOrder::Desc;
        assert_eq!(order_clause(&query), "ORDER BY email COLLATE \"C\" DESC, id ASC");
    }
}
