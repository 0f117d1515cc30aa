use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::types::{AuthorRef, CampgroundError, CommentResponse};

/// Service for comments on campground listings.
pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    /// Creates a new instance of `CommentService` with the provided database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a comment on the given campground by the given author.
    pub async fn create(
        &self,
        campground_id: &Uuid,
        author_id: &Uuid,
        text: &str,
    ) -> Result<CommentResponse, CampgroundError> {
        // The campground must exist before we attach anything to it
        let campground = sqlx::query("SELECT id FROM campgrounds WHERE id = $1")
            .bind(campground_id)
            .fetch_optional(&self.pool)
            .await?;

        if campground.is_none() {
            return Err(CampgroundError::NotFound);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO comments (campground_id, author_id, text)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(campground_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        let comment_id: Uuid = row.get("id");
        self.get_response(&comment_id).await
    }

    /// Loads a comment's author and owning campground for the ownership check.
    pub async fn get_author(
        &self,
        comment_id: &Uuid,
    ) -> Result<Option<Uuid>, CampgroundError> {
        let row = sqlx::query("SELECT author_id FROM comments WHERE id = $1")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("author_id")))
    }

    /// Updates a comment's text.
    pub async fn update(
        &self,
        comment_id: &Uuid,
        text: &str,
    ) -> Result<CommentResponse, CampgroundError> {
        let result = sqlx::query(
            "UPDATE comments SET text = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(text)
        .bind(comment_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CampgroundError::CommentNotFound);
        }

        self.get_response(comment_id).await
    }

    /// Deletes a comment.
    pub async fn delete(&self, comment_id: &Uuid) -> Result<(), CampgroundError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CampgroundError::CommentNotFound);
        }

        Ok(())
    }

    async fn get_response(&self, comment_id: &Uuid) -> Result<CommentResponse, CampgroundError> {
        let row = sqlx::query(
            r#"
            SELECT cm.id, cm.campground_id, cm.text, cm.author_id,
                   u.username AS author_username, cm.created_at
            FROM comments cm
            JOIN users u ON cm.author_id = u.id
            WHERE cm.id = $1
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(CommentResponse {
                id: row.get("id"),
                campground_id: row.get("campground_id"),
                text: row.get("text"),
                author: AuthorRef {
                    id: row.get("author_id"),
                    username: row.get("author_username"),
                },
                created_at: row.get("created_at"),
            }),
            None => Err(CampgroundError::CommentNotFound),
        }
    }
}
