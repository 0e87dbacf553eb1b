//! User repository (credential store)

use crate::db::connection::DatabasePool;
use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::User;

/// Filter for [`UserRepository::find_by`]
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Exact username match
    pub username: Option<String>,
    /// Maximum number of rows
    pub limit: Option<u32>,
}

/// User repository for credential persistence
pub struct UserRepository;

impl UserRepository {
    /// Insert a user and return its id.
    ///
    /// A taken username surfaces as [`DatabaseError::ConstraintViolation`].
    pub async fn insert(pool: &DatabasePool, user: &User) -> DbResult<String> {
        sqlx::query(
            "INSERT INTO users (id, username, password_digest, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_digest)
        .bind(&user.created_at)
        .execute(pool)
        .await?;

        Ok(user.id.clone())
    }

    /// Find users matching a query, oldest first
    pub async fn find_by(pool: &DatabasePool, query: &UserQuery) -> DbResult<Vec<User>> {
        let limit = query.limit.map(i64::from).unwrap_or(-1);
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users
             WHERE (?1 IS NULL OR username = ?1)
             ORDER BY created_at ASC
             LIMIT ?2",
        )
        .bind(query.username.as_deref())
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Look up a user by username
    pub async fn find_by_username(pool: &DatabasePool, username: &str) -> DbResult<Option<User>> {
        let query = UserQuery {
            username: Some(username.to_string()),
            limit: Some(1),
        };
        Ok(Self::find_by(pool, &query).await?.into_iter().next())
    }

    /// Get a user by id
    pub async fn find_one(pool: &DatabasePool, id: &str) -> DbResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("user {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConnection;

    #[tokio::test]
    async fn test_insert_and_find_one() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let user = User::new("alice", "digest");

        let id = UserRepository::insert(db.pool(), &user).await.unwrap();
        let found = UserRepository::find_one(db.pool(), &id).await.unwrap();

        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        UserRepository::insert(db.pool(), &User::new("alice", "d1")).await.unwrap();
        UserRepository::insert(db.pool(), &User::new("bob", "d2")).await.unwrap();

        let bob = UserRepository::find_by_username(db.pool(), "bob").await.unwrap();
        assert_eq!(bob.unwrap().password_digest, "d2");

        let missing = UserRepository::find_by_username(db.pool(), "carol").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint_violation() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        UserRepository::insert(db.pool(), &User::new("alice", "d1")).await.unwrap();

        let err = UserRepository::insert(db.pool(), &User::new("alice", "d2"))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_find_one_missing() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        let err = UserRepository::find_one(db.pool(), "nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_find_by_all_with_limit() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        for name in ["a1", "a2", "a3"] {
            UserRepository::insert(db.pool(), &User::new(name, "d")).await.unwrap();
        }

        let all = UserRepository::find_by(db.pool(), &UserQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let limited = UserRepository::find_by(
            db.pool(),
            &UserQuery {
                username: None,
                limit: Some(2),
            },
        )
        .await
        .unwrap();
        assert_eq!(limited.len(), 2);
    }
}
