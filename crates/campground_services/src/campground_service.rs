use geocoding::GeocodedLocation;
use image_store::StoredImage;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::search::substring_pattern;
use crate::types::{
    AuthorRef, CampgroundDetail, CampgroundError, CampgroundFields, CampgroundRecord,
    CampgroundResponse, CommentResponse,
};

const CAMPGROUND_COLUMNS: &str = "c.id, c.name, c.price, c.description, c.image_url, \
     c.location, c.latitude, c.longitude, c.author_id, u.username AS author_username, \
     c.created_at";

/// Service for campground listings: list, search, create, read, update, and
/// the transactional cascade delete.
pub struct CampgroundService {
    pool: PgPool,
}

impl CampgroundService {
    /// Creates a new instance of `CampgroundService` with the provided database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all campgrounds, newest first.
    pub async fn list(&self) -> Result<Vec<CampgroundResponse>, CampgroundError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {CAMPGROUND_COLUMNS}
            FROM campgrounds c
            JOIN users u ON c.author_id = u.id
            ORDER BY c.created_at DESC
            "#,
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(response_from_row).collect())
    }

    /// Searches campgrounds by name, treating the query as a literal substring.
    pub async fn search(&self, query: &str) -> Result<Vec<CampgroundResponse>, CampgroundError> {
        let pattern = substring_pattern(query);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {CAMPGROUND_COLUMNS}
            FROM campgrounds c
            JOIN users u ON c.author_id = u.id
            WHERE c.name ILIKE $1 ESCAPE '\'
            ORDER BY c.created_at DESC
            "#,
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(response_from_row).collect())
    }

    /// Gets one campground with its comments, oldest comment first.
    pub async fn get(&self, id: &Uuid) -> Result<CampgroundDetail, CampgroundError> {
        let campground = self.get_response(id).await?;

        let rows = sqlx::query(
            r#"
            SELECT cm.id, cm.campground_id, cm.text, cm.author_id,
                   u.username AS author_username, cm.created_at
            FROM comments cm
            JOIN users u ON cm.author_id = u.id
            WHERE cm.campground_id = $1
            ORDER BY cm.created_at ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let comments = rows
            .iter()
            .map(|row| CommentResponse {
                id: row.get("id"),
                campground_id: row.get("campground_id"),
                text: row.get("text"),
                author: AuthorRef {
                    id: row.get("author_id"),
                    username: row.get("author_username"),
                },
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(CampgroundDetail {
            campground,
            comments,
        })
    }

    /// Loads the raw campground row, including the image public id.
    /// Used for ownership checks and remote-image cleanup.
    pub async fn get_record(&self, id: &Uuid) -> Result<Option<CampgroundRecord>, CampgroundError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price, description, image_url, image_public_id,
                   location, latitude, longitude, author_id, created_at, updated_at
            FROM campgrounds
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| CampgroundRecord {
            id: row.get("id"),
            name: row.get("name"),
            price: row.get("price"),
            description: row.get("description"),
            image_url: row.get("image_url"),
            image_public_id: row.get("image_public_id"),
            location: row.get("location"),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
            author_id: row.get("author_id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Creates a campground from already-resolved external results.
    ///
    /// Geocoding and the image upload happen before this call; nothing is
    /// persisted when either of them fails.
    pub async fn create(
        &self,
        author_id: &Uuid,
        fields: &CampgroundFields,
        geo: &GeocodedLocation,
        image: &StoredImage,
    ) -> Result<CampgroundResponse, CampgroundError> {
        let row = sqlx::query(
            r#"
            INSERT INTO campgrounds (
                name, price, description, image_url, image_public_id,
                location, latitude, longitude, author_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(fields.name.trim())
        .bind(fields.price)
        .bind(&fields.description)
        .bind(&image.url)
        .bind(&image.public_id)
        .bind(&geo.place_name)
        .bind(geo.latitude)
        .bind(geo.longitude)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        let id: Uuid = row.get("id");
        self.get_response(&id).await
    }

    /// Updates a campground. `geo` carries the (possibly re-resolved)
    /// location; `new_image` replaces the stored image reference when the
    /// user uploaded a new one.
    pub async fn update(
        &self,
        id: &Uuid,
        fields: &CampgroundFields,
        geo: &GeocodedLocation,
        new_image: Option<&StoredImage>,
    ) -> Result<CampgroundResponse, CampgroundError> {
        let result = match new_image {
            Some(image) => {
                sqlx::query(
                    r#"
                    UPDATE campgrounds
                    SET name = $1, price = $2, description = $3,
                        location = $4, latitude = $5, longitude = $6,
                        image_url = $7, image_public_id = $8,
                        updated_at = NOW()
                    WHERE id = $9
                    "#,
                )
                .bind(fields.name.trim())
                .bind(fields.price)
                .bind(&fields.description)
                .bind(&geo.place_name)
                .bind(geo.latitude)
                .bind(geo.longitude)
                .bind(&image.url)
                .bind(&image.public_id)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    UPDATE campgrounds
                    SET name = $1, price = $2, description = $3,
                        location = $4, latitude = $5, longitude = $6,
                        updated_at = NOW()
                    WHERE id = $7
                    "#,
                )
                .bind(fields.name.trim())
                .bind(fields.price)
                .bind(&fields.description)
                .bind(&geo.place_name)
                .bind(geo.latitude)
                .bind(geo.longitude)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(CampgroundError::NotFound);
        }

        self.get_response(id).await
    }

    /// Deletes a campground and its comments in one transaction.
    ///
    /// Returns the provider image id for the caller's best-effort remote
    /// cleanup after commit. A second delete of the same id yields
    /// [`CampgroundError::NotFound`] and leaves nothing behind.
    pub async fn delete(&self, id: &Uuid) -> Result<String, CampgroundError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE campground_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query("DELETE FROM campgrounds WHERE id = $1 RETURNING image_public_id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let image_public_id = match row {
            Some(row) => row.get("image_public_id"),
            None => {
                tx.rollback().await?;
                return Err(CampgroundError::NotFound);
            }
        };

        tx.commit().await?;

        Ok(image_public_id)
    }

    /// Lists the campgrounds authored by one user, newest first.
    pub async fn list_by_author(
        &self,
        author_id: &Uuid,
    ) -> Result<Vec<CampgroundResponse>, CampgroundError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {CAMPGROUND_COLUMNS}
            FROM campgrounds c
            JOIN users u ON c.author_id = u.id
            WHERE c.author_id = $1
            ORDER BY c.created_at DESC
            "#,
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(response_from_row).collect())
    }

    async fn get_response(&self, id: &Uuid) -> Result<CampgroundResponse, CampgroundError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {CAMPGROUND_COLUMNS}
            FROM campgrounds c
            JOIN users u ON c.author_id = u.id
            WHERE c.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(response_from_row(&row)),
            None => Err(CampgroundError::NotFound),
        }
    }
}

fn response_from_row(row: &PgRow) -> CampgroundResponse {
    CampgroundResponse {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        description: row.get("description"),
        image_url: row.get("image_url"),
        location: row.get("location"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        author: AuthorRef {
            id: row.get("author_id"),
            username: row.get("author_username"),
        },
        created_at: row.get("created_at"),
    }
}
