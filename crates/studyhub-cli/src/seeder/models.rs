//! Seed data and seeding configuration.

use studyhub_models::ids::UserId;
use studyhub_models::resources::{ResourceStatus, Subject};
use studyhub_models::users::Role;

/// Every seeded account uses this password.
pub const SEED_PASSWORD: &str = "password123";

/// Seeded accounts live on this domain; `clear-seed` deletes by it.
pub const SEED_EMAIL_DOMAIN: &str = "example.com";

/// A `(section, batch, semester)` triple with one CR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cohort {
    pub section: String,
    pub batch: String,
    pub semester: String,
}

pub struct UserSeed {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub cohort: usize,
}

pub struct CourseSeed {
    pub course_name: String,
    pub teacher_name: String,
    pub course_password: String,
    pub cohort: usize,
    pub created_by: UserId,
    pub cr_name: String,
    pub cr_email: String,
}

pub struct ResourceSeed {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub subject: Subject,
    pub status: ResourceStatus,
    pub author_id: UserId,
    pub author_name: String,
}

/// Configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub cohorts: usize,
    pub students_per_cohort: usize,
    pub courses_per_cr: usize,
    pub resources: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            cohorts: 6,
            students_per_cohort: 30,
            courses_per_cr: 4,
            resources: 60,
        }
    }
}

impl SeedConfig {
    pub fn new(cohorts: usize) -> Self {
        Self {
            cohorts,
            ..Default::default()
        }
    }

    pub fn with_students(mut self, students_per_cohort: usize) -> Self {
        self.students_per_cohort = students_per_cohort;
        self
    }

    pub fn with_courses(mut self, courses_per_cr: usize) -> Self {
        self.courses_per_cr = courses_per_cr;
        self
    }

    pub fn with_resources(mut self, resources: usize) -> Self {
        self.resources = resources;
        self
    }

    /// CRs plus students.
    pub fn total_users(&self) -> usize {
        self.cohorts * (self.students_per_cohort + 1)
    }
}
