//! Student service: registration, login and profiles.

use chrono::Utc;
use schoolboard_common::{AppError, AppResult};
use schoolboard_db::{
    entities::{choice, student},
    repositories::{ChoiceRepository, PollRepository, StudentRepository},
};
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Student service for business logic.
#[derive(Clone)]
pub struct StudentService {
    student_repo: StudentRepository,
    poll_repo: PollRepository,
    choice_repo: ChoiceRepository,
}

/// Name and grade identifying a student.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StudentInput {
    #[validate(length(min = 1, max = 50))]
    pub name: String,

    #[validate(range(min = 1, max = 11))]
    pub grade: i32,
}

/// A vote as shown on a student's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileVote {
    /// Poll the vote was cast on.
    pub vote_id: i32,
    /// Poll category, `None` once the poll is gone.
    pub category: Option<String>,
    pub photo_choice: i32,
    pub created_at: String,
}

/// A student with the votes they cast.
#[derive(Debug, Clone, Serialize)]
pub struct StudentProfile {
    pub id: i32,
    pub name: String,
    pub grade: i32,
    pub votes: Vec<ProfileVote>,
}

impl StudentService {
    /// Create a new student service.
    #[must_use]
    pub const fn new(
        student_repo: StudentRepository,
        poll_repo: PollRepository,
        choice_repo: ChoiceRepository,
    ) -> Self {
        Self {
            student_repo,
            poll_repo,
            choice_repo,
        }
    }

    /// Register a new student. Duplicate name and grade pairs are allowed.
    pub async fn register(&self, input: StudentInput) -> AppResult<student::Model> {
        input.validate()?;

        let model = student::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            grade: Set(input.grade),
            created_at: Set(Utc::now().into()),
        };

        let student = self.student_repo.create(model).await?;
        tracing::info!(student_id = student.id, grade = student.grade, "Student registered");
        Ok(student)
    }

    /// Log in by exact name and grade. Returns the earliest registered match.
    pub async fn login(&self, input: &StudentInput) -> AppResult<student::Model> {
        self.student_repo
            .find_first_by_name_and_grade(&input.name, input.grade)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Student '{}' in grade {}",
                    input.name, input.grade
                ))
            })
    }

    /// List all students ordered by ID.
    pub async fn list_all(&self) -> AppResult<Vec<student::Model>> {
        self.student_repo.find_all().await
    }

    /// Delete a student. Their votes and likes are kept.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.student_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Student {id}")));
        }

        tracing::info!(student_id = id, "Student deleted");
        Ok(())
    }

    /// Get a student together with every vote they cast.
    pub async fn profile(&self, id: i32) -> AppResult<StudentProfile> {
        let student = self.student_repo.get_by_id(id).await?;
        let choices = self.choice_repo.find_by_user(id).await?;

        let mut poll_ids: Vec<i32> = choices.iter().map(|c| c.poll_id).collect();
        poll_ids.sort_unstable();
        poll_ids.dedup();

        let categories: HashMap<i32, String> = self
            .poll_repo
            .find_by_ids(&poll_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p.category))
            .collect();

        let votes = choices
            .into_iter()
            .map(|c| profile_vote(c, &categories))
            .collect();

        Ok(StudentProfile {
            id: student.id,
            name: student.name,
            grade: student.grade,
            votes,
        })
    }
}

fn profile_vote(choice: choice::Model, categories: &HashMap<i32, String>) -> ProfileVote {
    ProfileVote {
        vote_id: choice.poll_id,
        category: categories.get(&choice.poll_id).cloned(),
        photo_choice: choice.photo_choice,
        created_at: choice.created_at.to_rfc3339(),
    }
}
