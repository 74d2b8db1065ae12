use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::review_types::*;

/// Service for review persistence operations
pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    /// Creates a new instance of `ReviewService` with the provided database connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a review on a campground, authored by the given user
    pub async fn create(
        &self,
        campground_id: &Uuid,
        author_id: &Uuid,
        form: &ReviewForm,
    ) -> Result<Review, ReviewError> {
        // The campground must still exist before anything is written
        let campground = sqlx::query("SELECT id FROM campgrounds WHERE id = $1")
            .bind(campground_id)
            .fetch_optional(&self.pool)
            .await?;

        if campground.is_none() {
            return Err(ReviewError::CampgroundNotFound);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO reviews (campground_id, author_id, rating, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, campground_id, author_id, rating, body, created_at
            "#,
        )
        .bind(campground_id)
        .bind(author_id)
        .bind(form.rating)
        .bind(form.body.trim())
        .fetch_one(&self.pool)
        .await?;

        let review = Review {
            id: row.get("id"),
            campground_id: row.get("campground_id"),
            author_id: row.get("author_id"),
            rating: row.get("rating"),
            body: row.get("body"),
            created_at: row.get("created_at"),
        };

        Ok(review)
    }

    /// Gets a review by ID, returning `None` if not found
    pub async fn get(&self, review_id: &Uuid) -> Result<Option<Review>, ReviewError> {
        let row = sqlx::query(
            r#"
            SELECT id, campground_id, author_id, rating, body, created_at
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let review = Review {
                id: row.get("id"),
                campground_id: row.get("campground_id"),
                author_id: row.get("author_id"),
                rating: row.get("rating"),
                body: row.get("body"),
                created_at: row.get("created_at"),
            };
            Ok(Some(review))
        } else {
            Ok(None)
        }
    }

    /// Deletes a review from a campground
    pub async fn delete(&self, campground_id: &Uuid, review_id: &Uuid) -> Result<(), ReviewError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1 AND campground_id = $2")
            .bind(review_id)
            .bind(campground_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ReviewError::NotFound);
        }

        Ok(())
    }
}
