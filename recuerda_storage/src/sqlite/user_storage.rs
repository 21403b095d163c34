mod model;

use async_trait::async_trait;
use model::UserRow;
use recuerda_models::user::{User, UserId};

use crate::{
    StorageError,
    user::{NewUser, UserStorage},
};

pub struct SqliteUserStorage {
    pool: sqlx::SqlitePool,
}

impl SqliteUserStorage {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStorage for SqliteUserStorage {
    async fn get(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user.map(Into::into))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StorageError> {
        let NewUser {
            id,
            username,
            first_name,
            last_name,
            time_zone,
            default_reminder_minutes,
        } = new_user;

        let user = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, username, first_name, last_name, time_zone, default_reminder_minutes, is_active)
VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(id)
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(time_zone.name())
        .bind(default_reminder_minutes)
        .bind(true)
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into())
    }

    async fn update(&self, user: User) -> Result<User, StorageError> {
        let User {
            id,
            username,
            first_name,
            last_name,
            time_zone,
            default_reminder_minutes,
            is_active,
        } = user;

        let updated_user = sqlx::query_as::<_, UserRow>(
            "UPDATE users
SET username = ?,
    first_name = ?,
    last_name = ?,
    time_zone = ?,
    default_reminder_minutes = ?,
    is_active = ?
WHERE id = ?
RETURNING *",
        )
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(time_zone.name())
        .bind(default_reminder_minutes)
        .bind(is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        updated_user.map(Into::into).ok_or(StorageError::NotFound {
            entity: "user",
            id,
        })
    }
}
