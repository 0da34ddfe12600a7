// src/services/faculty.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppError,
    models::faculty::{CreateFacultyRequest, Faculty, NewFaculty},
    store::FacultyRoster,
};

/// Admin-side management of faculty accounts.
#[derive(Clone)]
pub struct FacultyDirectory {
    faculty: Arc<dyn FacultyRoster>,
}

impl FacultyDirectory {
    pub fn new(faculty: Arc<dyn FacultyRoster>) -> Self {
        Self { faculty }
    }

    pub async fn add(&self, req: CreateFacultyRequest) -> Result<Faculty, AppError> {
        req.validate()?;

        let name = req.name.trim().to_string();
        let department = req.department.trim().to_string();
        if name.is_empty() || department.is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        let faculty = self
            .faculty
            .insert_faculty(NewFaculty {
                name,
                email: req.email.trim().to_lowercase(),
                department,
            })
            .await?;

        tracing::info!(faculty_id = faculty.id, "Faculty added: {}", faculty.email);

        Ok(faculty)
    }

    pub async fn list(&self) -> Result<Vec<Faculty>, AppError> {
        self.faculty.list_faculty().await
    }

    pub async fn remove(&self, id: i64) -> Result<(), AppError> {
        if !self.faculty.delete_faculty(id).await? {
            return Err(AppError::NotFound("Faculty not found".to_string()));
        }

        tracing::info!(faculty_id = id, "Faculty removed");
        Ok(())
    }
}
