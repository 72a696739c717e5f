//! Classrooms repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::classroom::{Classroom, CreateClassroom, UpdateClassroom},
};

#[derive(Clone)]
pub struct ClassroomsRepository {
    pool: Pool<Postgres>,
}

impl ClassroomsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all classrooms
    pub async fn list(&self) -> AppResult<Vec<Classroom>> {
        let rows = sqlx::query_as::<_, Classroom>("SELECT * FROM classrooms ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get classroom by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Classroom> {
        sqlx::query_as::<_, Classroom>("SELECT * FROM classrooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Classroom {} not found", id)))
    }

    /// Create classroom
    pub async fn create(&self, data: &CreateClassroom) -> AppResult<Classroom> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, Classroom>(
            r#"
            INSERT INTO classrooms (name, name_local, program, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.name_local)
        .bind(&data.program)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update classroom
    pub async fn update(&self, id: i32, data: &UpdateClassroom) -> AppResult<Classroom> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.name_local, "name_local");
        add_field!(data.program, "program");
        let _ = idx;

        let query = format!(
            "UPDATE classrooms SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Classroom>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.name_local);
        bind_field!(data.program);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Classroom {} not found", id)))
    }

    /// Delete classroom
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM classrooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Classroom {} not found", id)));
        }
        Ok(())
    }
}
