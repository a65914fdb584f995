//! Servicio de membresías
//!
//! Asignación de usuarios a cargos con hooks de historial explícitos:
//! cada alta, cambio o baja de asignación escribe el historial dentro de la
//! misma transacción. No hay señales ocultas.

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::organization::{Membership, Position};
use crate::utils::errors::{AppError, AppResult};

pub struct MembershipService<'a> {
    pool: &'a PgPool,
}

impl<'a> MembershipService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Asigna (o reemplaza) el cargo activo de un usuario.
    ///
    /// Si el cargo es exclusivo se rechaza cuando otra persona ya lo ocupa
    /// en la misma entidad. El historial se actualiza en la misma
    /// transacción: se cierra la fila abierta anterior y se abre una nueva.
    pub async fn assign(
        &self,
        user_id: Uuid,
        entity_id: Uuid,
        position_id: Uuid,
    ) -> AppResult<Membership> {
        let mut tx = self.pool.begin().await?;

        let full_name: String =
            sqlx::query_scalar("SELECT full_name FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        let position = sqlx::query_as::<_, Position>("SELECT * FROM positions WHERE id = $1")
            .bind(position_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Cargo no encontrado".to_string()))?;

        let entity_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM entities WHERE id = $1)")
                .bind(entity_id)
                .fetch_one(&mut *tx)
                .await?;
        if !entity_exists {
            return Err(AppError::NotFound("Entidad no encontrada".to_string()));
        }

        // Cargo exclusivo: a lo más una persona por entidad
        if position.is_unique {
            let taken: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM memberships
                    WHERE entity_id = $1 AND position_id = $2 AND user_id <> $3
                )
                "#,
            )
            .bind(entity_id)
            .bind(position_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

            if taken {
                return Err(AppError::Conflict(format!(
                    "El cargo '{}' ya está asignado en esta entidad",
                    position.name
                )));
            }
        }

        let previous = sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let membership = match previous {
            Some(ref current)
                if current.entity_id == entity_id && current.position_id == position_id =>
            {
                // Sin cambios: no se toca el historial
                current.clone()
            }
            Some(_) => {
                Self::close_open_history(&mut tx, user_id).await?;
                let updated = sqlx::query_as::<_, Membership>(
                    r#"
                    UPDATE memberships
                    SET entity_id = $2, position_id = $3
                    WHERE user_id = $1
                    RETURNING *
                    "#,
                )
                .bind(user_id)
                .bind(entity_id)
                .bind(position_id)
                .fetch_one(&mut *tx)
                .await?;
                Self::open_history(&mut tx, &full_name, entity_id, position_id).await?;
                updated
            }
            None => {
                let created = sqlx::query_as::<_, Membership>(
                    r#"
                    INSERT INTO memberships (id, user_id, entity_id, position_id)
                    VALUES ($1, $2, $3, $4)
                    RETURNING *
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(user_id)
                .bind(entity_id)
                .bind(position_id)
                .fetch_one(&mut *tx)
                .await?;
                Self::open_history(&mut tx, &full_name, entity_id, position_id).await?;
                created
            }
        };

        tx.commit().await?;
        Ok(membership)
    }

    /// Quita la asignación activa de un usuario y cierra su historial
    pub async fn remove(&self, user_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM memberships WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "El usuario no tiene asignación activa".to_string(),
            ));
        }

        Self::close_open_history(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn open_history(
        tx: &mut Transaction<'_, Postgres>,
        full_name: &str,
        entity_id: Uuid,
        position_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO membership_history (id, full_name, entity_id, position_id, start_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(full_name)
        .bind(entity_id)
        .bind(position_id)
        .bind(Utc::now().date_naive())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn close_open_history(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE membership_history
            SET end_date = $2
            WHERE end_date IS NULL
              AND full_name = (SELECT full_name FROM users WHERE id = $1)
            "#,
        )
        .bind(user_id)
        .bind(Utc::now().date_naive())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
