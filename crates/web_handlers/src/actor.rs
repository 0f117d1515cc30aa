use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Loads the admin flag for the acting user. Unknown users are not admins.
pub async fn load_is_admin(pool: &PgPool, user_id: &Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT is_admin FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| row.get("is_admin")).unwrap_or(false))
}
