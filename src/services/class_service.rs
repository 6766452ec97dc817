use crate::error::{Error, Result};
use crate::models::assignment::Assignment;
use crate::models::class::Class;
use crate::models::exam::Exam;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedClasses {
    pub items: Vec<Class>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Clone)]
pub struct ClassService {
    pool: SqlitePool,
}

impl ClassService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_class(
        &self,
        payload: crate::dto::class_dto::CreateClassPayload,
    ) -> Result<Class> {
        let now = Utc::now();
        let class = sqlx::query_as::<_, Class>(
            r#"
            INSERT INTO classes (id, name, language, level, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, name, language, level, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payload.name)
        .bind(payload.language)
        .bind(payload.level)
        .bind(payload.description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(class)
    }

    pub async fn get_class_by_id(&self, class_id: Uuid) -> Result<Class> {
        let class = sqlx::query_as::<_, Class>(
            r#"
            SELECT id, name, language, level, description, created_at, updated_at
            FROM classes
            WHERE id = ?1
            "#,
        )
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Class {} not found", class_id)))?;

        Ok(class)
    }

    pub async fn update_class(
        &self,
        class_id: Uuid,
        payload: crate::dto::class_dto::UpdateClassPayload,
    ) -> Result<Class> {
        let class = sqlx::query_as::<_, Class>(
            r#"
            UPDATE classes
            SET
                name = COALESCE(?1, name),
                language = COALESCE(?2, language),
                level = COALESCE(?3, level),
                description = COALESCE(?4, description),
                updated_at = ?5
            WHERE id = ?6
            RETURNING id, name, language, level, description, created_at, updated_at
            "#,
        )
        .bind(payload.name)
        .bind(payload.language)
        .bind(payload.level)
        .bind(payload.description)
        .bind(Utc::now())
        .bind(class_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Class {} not found", class_id)))?;

        Ok(class)
    }

    pub async fn list_classes(
        &self,
        page: i64,
        per_page: i64,
        search: Option<String>,
    ) -> Result<PaginatedClasses> {
        let offset = (page - 1) * per_page;
        let search_param: Option<String> = search.map(|s| format!("%{}%", s));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM classes
            WHERE (?1 IS NULL OR name LIKE ?1 OR language LIKE ?1)
            "#,
        )
        .bind(&search_param)
        .fetch_one(&self.pool)
        .await?;

        let total_pages = if per_page > 0 {
            ((total as f64) / (per_page as f64)).ceil() as i64
        } else {
            1
        };

        let items = sqlx::query_as::<_, Class>(
            r#"
            SELECT id, name, language, level, description, created_at, updated_at
            FROM classes
            WHERE (?1 IS NULL OR name LIKE ?1 OR language LIKE ?1)
            ORDER BY created_at DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(&search_param)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedClasses {
            items,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn delete_class(&self, class_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM classes WHERE id = ?1")
            .bind(class_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Class {} not found", class_id)));
        }
        Ok(())
    }

    pub async fn create_exam(
        &self,
        payload: crate::dto::class_dto::CreateExamPayload,
    ) -> Result<Exam> {
        self.get_class_by_id(payload.class_id).await?;

        let now = Utc::now();
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            INSERT INTO exams (id, class_id, title, scheduled_for, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, class_id, title, scheduled_for, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payload.class_id)
        .bind(payload.title)
        .bind(payload.scheduled_for)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(exam)
    }

    pub async fn get_exam_by_id(&self, exam_id: Uuid) -> Result<Exam> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, class_id, title, scheduled_for, created_at, updated_at
            FROM exams
            WHERE id = ?1
            "#,
        )
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Exam {} not found", exam_id)))?;

        Ok(exam)
    }

    pub async fn list_exams_for_class(&self, class_id: Uuid) -> Result<Vec<Exam>> {
        self.get_class_by_id(class_id).await?;

        let exams = sqlx::query_as::<_, Exam>(
            r#"
            SELECT id, class_id, title, scheduled_for, created_at, updated_at
            FROM exams
            WHERE class_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(exams)
    }

    pub async fn delete_exam(&self, exam_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM exams WHERE id = ?1")
            .bind(exam_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Exam {} not found", exam_id)));
        }
        Ok(())
    }

    pub async fn create_assignment(
        &self,
        payload: crate::dto::class_dto::CreateAssignmentPayload,
    ) -> Result<Assignment> {
        self.get_class_by_id(payload.class_id).await?;

        let now = Utc::now();
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (id, class_id, title, due_at, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, class_id, title, due_at, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payload.class_id)
        .bind(payload.title)
        .bind(payload.due_at)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(assignment)
    }

    pub async fn get_assignment_by_id(&self, assignment_id: Uuid) -> Result<Assignment> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, class_id, title, due_at, created_at, updated_at
            FROM assignments
            WHERE id = ?1
            "#,
        )
        .bind(assignment_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Assignment {} not found", assignment_id)))?;

        Ok(assignment)
    }

    pub async fn list_assignments_for_class(&self, class_id: Uuid) -> Result<Vec<Assignment>> {
        self.get_class_by_id(class_id).await?;

        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT id, class_id, title, due_at, created_at, updated_at
            FROM assignments
            WHERE class_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    pub async fn delete_assignment(&self, assignment_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = ?1")
            .bind(assignment_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "Assignment {} not found",
                assignment_id
            )));
        }
        Ok(())
    }
}
