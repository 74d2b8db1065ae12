use geocoding::Geometry;
use image_storage::StoredImage;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::campground_types::*;
use crate::review_types::ReviewInfo;

/// Service for campground persistence operations
pub struct CampgroundService {
    pool: PgPool,
}

impl CampgroundService {
    /// Creates a new instance of `CampgroundService` with the provided database connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all campgrounds, newest first, each with its first image
    pub async fn list(&self) -> Result<Vec<CampgroundSummary>, CampgroundError> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id, c.title, c.price, c.location, c.geometry,
                i.url AS image_url, i.filename AS image_filename
            FROM campgrounds c
            LEFT JOIN LATERAL (
                SELECT url, filename
                FROM campground_images
                WHERE campground_id = c.id
                ORDER BY position ASC
                LIMIT 1
            ) i ON true
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let campgrounds = rows
            .into_iter()
            .map(|row| {
                let image = row.get::<Option<String>, _>("image_url").map(|url| {
                    ImageInfo::from(StoredImage {
                        url,
                        filename: row
                            .get::<Option<String>, _>("image_filename")
                            .unwrap_or_default(),
                    })
                });

                CampgroundSummary {
                    id: row.get("id"),
                    title: row.get("title"),
                    price: row.get("price"),
                    location: row.get("location"),
                    geometry: row.get("geometry"),
                    image,
                }
            })
            .collect();

        Ok(campgrounds)
    }

    /// Gets a campground by ID, returning `None` if not found
    pub async fn get(&self, campground_id: &Uuid) -> Result<Option<Campground>, CampgroundError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, price, description, location, geometry,
                   author_id, created_at, updated_at
            FROM campgrounds
            WHERE id = $1
            "#,
        )
        .bind(campground_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let campground = Campground {
                id: row.get("id"),
                title: row.get("title"),
                price: row.get("price"),
                description: row.get("description"),
                location: row.get("location"),
                geometry: row.get("geometry"),
                author_id: row.get("author_id"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            };
            Ok(Some(campground))
        } else {
            Ok(None)
        }
    }

    /// Gets a campground with its author, ordered images, and reviews (each
    /// populated with their author), returning `None` if not found
    pub async fn get_detail(
        &self,
        campground_id: &Uuid,
    ) -> Result<Option<CampgroundDetail>, CampgroundError> {
        let row = sqlx::query(
            r#"
            SELECT
                c.id, c.title, c.price, c.description, c.location, c.geometry,
                c.created_at, c.updated_at,
                u.id AS author_id, u.username AS author_username
            FROM campgrounds c
            JOIN users u ON c.author_id = u.id
            WHERE c.id = $1
            "#,
        )
        .bind(campground_id)
        .fetch_optional(&self.pool)
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let images = self.images(campground_id).await?;

        let review_rows = sqlx::query(
            r#"
            SELECT
                r.id, r.rating, r.body, r.created_at,
                u.id AS author_id, u.username AS author_username
            FROM reviews r
            JOIN users u ON r.author_id = u.id
            WHERE r.campground_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(campground_id)
        .fetch_all(&self.pool)
        .await?;

        let reviews = review_rows
            .into_iter()
            .map(|row| ReviewInfo {
                id: row.get("id"),
                rating: row.get("rating"),
                body: row.get("body"),
                author: AuthorInfo {
                    id: row.get("author_id"),
                    username: row.get("author_username"),
                },
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(Some(CampgroundDetail {
            id: row.get("id"),
            title: row.get("title"),
            price: row.get("price"),
            description: row.get("description"),
            location: row.get("location"),
            geometry: row.get("geometry"),
            author: AuthorInfo {
                id: row.get("author_id"),
                username: row.get("author_username"),
            },
            images,
            reviews,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Ordered images for a campground
    pub async fn images(&self, campground_id: &Uuid) -> Result<Vec<ImageInfo>, CampgroundError> {
        let rows = sqlx::query(
            r#"
            SELECT url, filename
            FROM campground_images
            WHERE campground_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(campground_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                ImageInfo::from(StoredImage {
                    url: row.get("url"),
                    filename: row.get("filename"),
                })
            })
            .collect())
    }

    /// Creates a campground owned by the given user, with its geocoded point
    /// and any images already uploaded to storage
    pub async fn create(
        &self,
        author_id: &Uuid,
        form: &CampgroundForm,
        geometry: &Geometry,
        images: &[StoredImage],
    ) -> Result<Campground, CampgroundError> {
        let geometry_json = serde_json::to_value(geometry)
            .map_err(|e| CampgroundError::Validation(format!("Invalid geometry: {}", e)))?;

        let row = sqlx::query(
            r#"
            INSERT INTO campgrounds (title, price, description, location, geometry, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, price, description, location, geometry,
                      author_id, created_at, updated_at
            "#,
        )
        .bind(form.title.trim())
        .bind(form.price)
        .bind(form.description.trim())
        .bind(form.location.trim())
        .bind(&geometry_json)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        let campground = Campground {
            id: row.get("id"),
            title: row.get("title"),
            price: row.get("price"),
            description: row.get("description"),
            location: row.get("location"),
            geometry: row.get("geometry"),
            author_id: row.get("author_id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        };

        self.insert_images(&campground.id, images, 0).await?;

        Ok(campground)
    }

    /// Updates a campground's fields and geocoded point
    pub async fn update(
        &self,
        campground_id: &Uuid,
        form: &CampgroundForm,
        geometry: &Geometry,
    ) -> Result<Campground, CampgroundError> {
        let geometry_json = serde_json::to_value(geometry)
            .map_err(|e| CampgroundError::Validation(format!("Invalid geometry: {}", e)))?;

        let row = sqlx::query(
            r#"
            UPDATE campgrounds
            SET title = $1, price = $2, description = $3, location = $4,
                geometry = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING id, title, price, description, location, geometry,
                      author_id, created_at, updated_at
            "#,
        )
        .bind(form.title.trim())
        .bind(form.price)
        .bind(form.description.trim())
        .bind(form.location.trim())
        .bind(&geometry_json)
        .bind(campground_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Campground {
                id: row.get("id"),
                title: row.get("title"),
                price: row.get("price"),
                description: row.get("description"),
                location: row.get("location"),
                geometry: row.get("geometry"),
                author_id: row.get("author_id"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            }),
            None => Err(CampgroundError::NotFound),
        }
    }

    /// Appends newly stored images to the end of a campground's image list
    pub async fn append_images(
        &self,
        campground_id: &Uuid,
        images: &[StoredImage],
    ) -> Result<(), CampgroundError> {
        if images.is_empty() {
            return Ok(());
        }

        let row = sqlx::query(
            r#"
            SELECT COALESCE(MAX(position) + 1, 0) AS next_position
            FROM campground_images
            WHERE campground_id = $1
            "#,
        )
        .bind(campground_id)
        .fetch_one(&self.pool)
        .await?;
        let next_position: i32 = row.get("next_position");

        self.insert_images(campground_id, images, next_position).await
    }

    /// Removes image records by object key
    pub async fn remove_images(
        &self,
        campground_id: &Uuid,
        filenames: &[String],
    ) -> Result<(), CampgroundError> {
        sqlx::query(
            "DELETE FROM campground_images WHERE campground_id = $1 AND filename = ANY($2)",
        )
        .bind(campground_id)
        .bind(filenames)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a campground and its reviews, returning the object keys of its
    /// stored images so the caller can clean up storage. Reviews are removed
    /// first, then the campground row; the two deletes are not atomic.
    pub async fn delete(&self, campground_id: &Uuid) -> Result<Vec<String>, CampgroundError> {
        let rows = sqlx::query("SELECT filename FROM campground_images WHERE campground_id = $1")
            .bind(campground_id)
            .fetch_all(&self.pool)
            .await?;
        let filenames = rows
            .into_iter()
            .map(|row| row.get::<String, _>("filename"))
            .collect();

        sqlx::query("DELETE FROM reviews WHERE campground_id = $1")
            .bind(campground_id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM campgrounds WHERE id = $1")
            .bind(campground_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CampgroundError::NotFound);
        }

        Ok(filenames)
    }

    async fn insert_images(
        &self,
        campground_id: &Uuid,
        images: &[StoredImage],
        start_position: i32,
    ) -> Result<(), CampgroundError> {
        for (offset, image) in images.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO campground_images (campground_id, url, filename, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(campground_id)
            .bind(&image.url)
            .bind(&image.filename)
            .bind(start_position + offset as i32)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}
