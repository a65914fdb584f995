//! Repositorio de documentos almacenados

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::file::StoredFile;
use crate::utils::errors::AppResult;

pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, file: &StoredFile) -> AppResult<StoredFile> {
        let created = sqlx::query_as::<_, StoredFile>(
            r#"
            INSERT INTO files
                (id, stored_name, short_name, content_type, size_bytes,
                 expiration_date, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(file.id)
        .bind(&file.stored_name)
        .bind(&file.short_name)
        .bind(&file.content_type)
        .bind(file.size_bytes)
        .bind(file.expiration_date)
        .bind(file.uploaded_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(file)
    }

    /// Documentos cuyo vencimiento cae exactamente en alguna de las fechas
    /// de aviso
    pub async fn expiring_on(&self, dates: &[NaiveDate]) -> AppResult<Vec<StoredFile>> {
        let files = sqlx::query_as::<_, StoredFile>(
            "SELECT * FROM files WHERE expiration_date = ANY($1) ORDER BY expiration_date",
        )
        .bind(dates)
        .fetch_all(&self.pool)
        .await?;
        Ok(files)
    }

    /// Documentos ya vencidos a la fecha indicada
    pub async fn expired_before(&self, today: NaiveDate) -> AppResult<Vec<StoredFile>> {
        let files = sqlx::query_as::<_, StoredFile>(
            "SELECT * FROM files WHERE expiration_date < $1 ORDER BY expiration_date",
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(files)
    }
}
