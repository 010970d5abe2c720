//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::{DateTime, Duration, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    AdminSession, Booking, BookingRequest, ContactRequest, ContactSubmission, HeroSlot,
    HeroSlotInput, NewProject, Project, ServiceCategory, DEFAULT_CATEGORIES,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== PROJECT OPERATIONS ====================

    /// List all projects sorted by rank ascending.
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, categories, description, image_url, image_path, link, order_position, created_at, updated_at FROM projects ORDER BY order_position ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(project_from_row).collect())
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, categories, description, image_url, image_path, link, order_position, created_at, updated_at FROM projects WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(project_from_row))
    }

    /// Next rank for an appended project: `max(existing) + 1`, or 0 for an
    /// empty collection. A count is never used, so gaps left by deletions
    /// cannot collide.
    pub async fn next_order_position(&self) -> Result<i64, AppError> {
        let row =
            sqlx::query("SELECT COALESCE(MAX(order_position) + 1, 0) AS next_position FROM projects")
                .fetch_one(&self.pool)
                .await?;
        Ok(row.get("next_position"))
    }

    /// Create a new project appended at the end of the rank sequence.
    pub async fn create_project(&self, new: &NewProject) -> Result<Project, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let position = self.next_order_position().await?;
        let categories_json = serde_json::to_string(&new.categories).unwrap_or_default();

        sqlx::query(
            "INSERT INTO projects (id, title, categories, description, image_url, image_path, link, order_position, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&new.title)
        .bind(&categories_json)
        .bind(&new.description)
        .bind(&new.image_url)
        .bind(&new.image_path)
        .bind(&new.link)
        .bind(position)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Project {
            id,
            title: new.title.clone(),
            categories: new.categories.clone(),
            description: new.description.clone(),
            image_url: new.image_url.clone(),
            image_path: new.image_path.clone(),
            link: new.link.clone(),
            order_position: position,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Rewrite one project's rank. Used concurrently by reorder; failures are
    /// collected by the caller rather than aborting sibling updates.
    pub async fn set_order_position(&self, id: &str, position: i64) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let result =
            sqlx::query("UPDATE projects SET order_position = ?, updated_at = ? WHERE id = ?")
                .bind(position)
                .bind(&now)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Project {} not found", id)));
        }
        Ok(())
    }

    /// Delete a project, returning the removed row so the caller can issue
    /// the best-effort image cleanup. Remaining ranks are not compacted.
    pub async fn delete_project(&self, id: &str) -> Result<Project, AppError> {
        let project = self
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;

        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(project)
    }

    // ==================== HERO SLOT OPERATIONS ====================

    /// List hero slots sorted by position.
    pub async fn list_hero_slots(&self) -> Result<Vec<HeroSlot>, AppError> {
        let rows = sqlx::query(
            "SELECT id, project_id, position, descriptions, images, background_image, created_at FROM hero_projects ORDER BY position ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(hero_from_row).collect())
    }

    /// Replace the whole slot set in one transaction. Positions are assigned
    /// from list order (1-based). Rolling the delete and reinserts into a
    /// single transaction means readers never observe an empty set mid-save.
    pub async fn replace_hero_slots(
        &self,
        slots: &[HeroSlotInput],
    ) -> Result<Vec<HeroSlot>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM hero_projects")
            .execute(&mut *tx)
            .await?;

        let now = Utc::now().to_rfc3339();
        let mut saved = Vec::with_capacity(slots.len());

        for (index, slot) in slots.iter().enumerate() {
            let id = uuid::Uuid::new_v4().to_string();
            let position = index as i64 + 1;
            let descriptions_json = serde_json::to_string(&slot.descriptions).unwrap_or_default();
            let images_json = serde_json::to_string(&slot.images).unwrap_or_default();

            sqlx::query(
                "INSERT INTO hero_projects (id, project_id, position, descriptions, images, background_image, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
            )
            .bind(&id)
            .bind(&slot.project_id)
            .bind(position)
            .bind(&descriptions_json)
            .bind(&images_json)
            .bind(&slot.background_image)
            .bind(&now)
            .execute(&mut *tx)
            .await?;

            saved.push(HeroSlot {
                id,
                project_id: slot.project_id.clone(),
                position,
                descriptions: slot.descriptions.clone(),
                images: slot.images.clone(),
                background_image: slot.background_image.clone(),
                created_at: now.clone(),
            });
        }

        tx.commit().await?;

        Ok(saved)
    }

    /// Remove every hero slot.
    pub async fn clear_hero_slots(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM hero_projects")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== SERVICE CATEGORY OPERATIONS ====================

    /// List all service categories.
    pub async fn list_service_categories(&self) -> Result<Vec<ServiceCategory>, AppError> {
        let rows = sqlx::query(
            "SELECT slug, name, images, updated_at FROM service_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    /// Replace a category's showcase references wholesale (single-row update).
    /// Length validation happens at the API layer before this is called.
    pub async fn set_category_images(
        &self,
        slug: &str,
        images: &[String],
    ) -> Result<ServiceCategory, AppError> {
        let now = Utc::now().to_rfc3339();
        let images_json = serde_json::to_string(images).unwrap_or_default();

        let result =
            sqlx::query("UPDATE service_categories SET images = ?, updated_at = ? WHERE slug = ?")
                .bind(&images_json)
                .bind(&now)
                .bind(slug)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Service category {} not found",
                slug
            )));
        }

        let row = sqlx::query(
            "SELECT slug, name, images, updated_at FROM service_categories WHERE slug = ?",
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(category_from_row(&row))
    }

    /// Seed the fixed category set. Idempotent: a populated table is left
    /// untouched, and the upsert conflicts on slug rather than duplicating.
    /// Returns whether any seeding happened.
    pub async fn seed_service_categories(&self) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM service_categories")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.get("count");
        if count > 0 {
            return Ok(false);
        }

        let now = Utc::now().to_rfc3339();
        for (slug, name) in DEFAULT_CATEGORIES.iter().copied() {
            sqlx::query(
                "INSERT INTO service_categories (slug, name, images, updated_at) VALUES (?, ?, ?, ?) ON CONFLICT(slug) DO NOTHING"
            )
            .bind(slug)
            .bind(name)
            .bind("[]")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        }

        Ok(true)
    }

    // ==================== CONTACT OPERATIONS ====================

    /// Persist a contact submission. Fields are validated and sanitized at
    /// the API layer.
    pub async fn create_contact(
        &self,
        request: &ContactRequest,
    ) -> Result<ContactSubmission, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO contacts (id, name, email, phone, company, message, privacy_consent, marketing_consent, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.company)
        .bind(&request.message)
        .bind(request.privacy_consent as i32)
        .bind(request.marketing_consent.map(|b| b as i32))
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(ContactSubmission {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            company: request.company.clone(),
            message: request.message.clone(),
            privacy_consent: request.privacy_consent,
            marketing_consent: request.marketing_consent,
            created_at: now,
        })
    }

    /// List contact submissions, newest first.
    pub async fn list_contacts(&self) -> Result<Vec<ContactSubmission>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, company, message, privacy_consent, marketing_consent, created_at FROM contacts ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(contact_from_row).collect())
    }

    /// Delete a contact submission.
    pub async fn delete_contact(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Contact {} not found", id)));
        }
        Ok(())
    }

    // ==================== BOOKING OPERATIONS ====================

    /// Persist a booking inquiry.
    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO bookings (id, name, email, phone, company, service, preferred_date, preferred_time, budget, message, privacy_consent, marketing_consent, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.company)
        .bind(&request.service)
        .bind(&request.preferred_date)
        .bind(&request.preferred_time)
        .bind(&request.budget)
        .bind(&request.message)
        .bind(request.privacy_consent as i32)
        .bind(request.marketing_consent.map(|b| b as i32))
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Booking {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            company: request.company.clone(),
            service: request.service.clone(),
            preferred_date: request.preferred_date.clone(),
            preferred_time: request.preferred_time.clone(),
            budget: request.budget.clone(),
            message: request.message.clone(),
            privacy_consent: request.privacy_consent,
            marketing_consent: request.marketing_consent,
            created_at: now,
        })
    }

    /// List booking inquiries, newest first.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, company, service, preferred_date, preferred_time, budget, message, privacy_consent, marketing_consent, created_at FROM bookings ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(booking_from_row).collect())
    }

    /// Delete a booking. Used concurrently by bulk delete; failures are
    /// collected by the caller rather than aborting sibling deletes.
    pub async fn delete_booking(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Booking {} not found", id)));
        }
        Ok(())
    }

    // ==================== ADMIN SESSION OPERATIONS ====================

    /// Create an admin session valid for `ttl_hours`.
    pub async fn create_admin_session(
        &self,
        role: &str,
        ttl_hours: i64,
    ) -> Result<AdminSession, AppError> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let expires_at = (now + Duration::hours(ttl_hours)).to_rfc3339();
        let created_at = now.to_rfc3339();

        sqlx::query(
            "INSERT INTO admin_sessions (token, role, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&token)
        .bind(role)
        .bind(&expires_at)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(AdminSession {
            token,
            role: role.to_string(),
            expires_at,
            created_at,
        })
    }

    /// Resolve a session token. Expired rows are dropped on the way out and
    /// never returned.
    pub async fn find_admin_session(&self, token: &str) -> Result<Option<AdminSession>, AppError> {
        let row = sqlx::query(
            "SELECT token, role, expires_at, created_at FROM admin_sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let session = session_from_row(&row);

        let expired = DateTime::parse_from_rfc3339(&session.expires_at)
            .map(|exp| exp < Utc::now())
            .unwrap_or(true);
        if expired {
            self.delete_admin_session(token).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Revoke a session (logout). Unknown tokens are a no-op.
    pub async fn delete_admin_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM admin_sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// Helper functions for row conversion

fn project_from_row(row: &sqlx::sqlite::SqliteRow) -> Project {
    let categories_str: Option<String> = row.get("categories");
    Project {
        id: row.get("id"),
        title: row.get("title"),
        categories: categories_str
            .map(|s| parse_json_array(&s))
            .unwrap_or_default(),
        description: row.get("description"),
        image_url: row.get("image_url"),
        image_path: row.get("image_path"),
        link: row.get("link"),
        order_position: row.get("order_position"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn hero_from_row(row: &sqlx::sqlite::SqliteRow) -> HeroSlot {
    let descriptions_str: Option<String> = row.get("descriptions");
    let images_str: Option<String> = row.get("images");
    HeroSlot {
        id: row.get("id"),
        project_id: row.get("project_id"),
        position: row.get("position"),
        descriptions: descriptions_str
            .map(|s| parse_json_array(&s))
            .unwrap_or_default(),
        images: images_str.map(|s| parse_json_array(&s)).unwrap_or_default(),
        background_image: row.get("background_image"),
        created_at: row.get("created_at"),
    }
}

fn category_from_row(row: &sqlx::sqlite::SqliteRow) -> ServiceCategory {
    let images_str: Option<String> = row.get("images");
    ServiceCategory {
        slug: row.get("slug"),
        name: row.get("name"),
        images: images_str.map(|s| parse_json_array(&s)).unwrap_or_default(),
        updated_at: row.get("updated_at"),
    }
}

fn contact_from_row(row: &sqlx::sqlite::SqliteRow) -> ContactSubmission {
    let privacy_consent: i32 = row.get("privacy_consent");
    let marketing_consent: Option<i32> = row.get("marketing_consent");
    ContactSubmission {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        company: row.get("company"),
        message: row.get("message"),
        privacy_consent: privacy_consent != 0,
        marketing_consent: marketing_consent.map(|v| v != 0),
        created_at: row.get("created_at"),
    }
}

fn booking_from_row(row: &sqlx::sqlite::SqliteRow) -> Booking {
    let privacy_consent: i32 = row.get("privacy_consent");
    let marketing_consent: Option<i32> = row.get("marketing_consent");
    Booking {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        company: row.get("company"),
        service: row.get("service"),
        preferred_date: row.get("preferred_date"),
        preferred_time: row.get("preferred_time"),
        budget: row.get("budget"),
        message: row.get("message"),
        privacy_consent: privacy_consent != 0,
        marketing_consent: marketing_consent.map(|v| v != 0),
        created_at: row.get("created_at"),
    }
}

fn session_from_row(row: &sqlx::sqlite::SqliteRow) -> AdminSession {
    AdminSession {
        token: row.get("token"),
        role: row.get("role"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
