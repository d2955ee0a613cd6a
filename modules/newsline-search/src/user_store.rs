//! Postgres-backed user interest store (spec's C5). Each user's interest
//! vector is a running mean of the embeddings of articles they clicked,
//! updated under a per-row transaction so concurrent clicks from
//! different users never block each other while updates to the same
//! user serialize through Postgres row locking.

use newsline_common::{UserInterest, EMBEDDING_DIM};
use sqlx::PgPool;

use crate::error::{Result, SearchError};

#[derive(Clone)]
pub struct UserProfileStore {
    pool: PgPool,
}

impl UserProfileStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| SearchError::Database(e.into()))?;
        Ok(())
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<UserInterest>> {
        let row = sqlx::query_as::<_, UserInterestRow>(
            "SELECT user_id, interest, cnt, updated_at FROM user_interests WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(UserInterestRow::into_domain))
    }

    /// Fold `doc_vec` into the user's running-mean interest vector
    /// (spec: `new_mean = old_mean + (x - old_mean) / (cnt + 1)`). Uses a
    /// single `INSERT ... ON CONFLICT` so first-click and subsequent
    /// clicks both go through one round trip and stay atomic per row.
    pub async fn record_click(&self, user_id: &str, doc_vec: &[f32]) -> Result<UserInterest> {
        if doc_vec.len() != EMBEDDING_DIM {
            return Err(SearchError::BadRequest(format!(
                "embedding has {} dims, expected {}",
                doc_vec.len(),
                EMBEDDING_DIM
            )));
        }

        let mut tx = self.pool.begin().await?;
        let existing = sqlx::query_as::<_, UserInterestRow>(
            "SELECT user_id, interest, cnt, updated_at FROM user_interests WHERE user_id = $1 FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (new_interest, new_cnt) = match existing {
            Some(row) => {
                let cnt = row.cnt + 1;
                let mean = row
                    .interest
                    .iter()
                    .zip(doc_vec.iter())
                    .map(|(old, x)| old + (x - old) / cnt as f32)
                    .collect::<Vec<f32>>();
                (mean, cnt)
            }
            None => (doc_vec.to_vec(), 1),
        };

        sqlx::query(
            r#"
            INSERT INTO user_interests (user_id, interest, cnt, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_id) DO UPDATE
            SET interest = EXCLUDED.interest, cnt = EXCLUDED.cnt, updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(&new_interest)
        .bind(new_cnt)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(UserInterest {
            user_id: user_id.to_string(),
            interest: new_interest,
            cnt: new_cnt,
            updated_at: chrono::Utc::now(),
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserInterestRow {
    user_id: String,
    interest: Vec<f32>,
    cnt: i64,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserInterestRow {
    fn into_domain(self) -> UserInterest {
        UserInterest {
            user_id: self.user_id,
            interest: self.interest,
            cnt: self.cnt,
            updated_at: self.updated_at,
        }
    }
}
