//! Course and enrollment seeding.

use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};

use studyhub_models::ids::{CourseId, UserId};
use studyhub_models::users::Role;

use super::models::{Cohort, CourseSeed, UserSeed};

const COURSE_TITLES: [&str; 10] = [
    "Data Structures",
    "Algorithms",
    "Discrete Mathematics",
    "Operating Systems",
    "Database Systems",
    "Computer Networks",
    "Linear Algebra",
    "Digital Logic Design",
    "Software Engineering",
    "Compiler Design",
];

/// Seeded course passwords are `course-<n>`.
pub fn course_password(idx: usize) -> String {
    format!("course-{}", idx)
}

/// `courses_per_cr` courses for every CR, scoped to the CR's cohort.
pub fn generate_courses(
    users: &[UserSeed],
    user_ids: &[UserId],
    courses_per_cr: usize,
) -> Vec<CourseSeed> {
    users
        .par_iter()
        .zip(user_ids.par_iter())
        .filter(|(user, _)| user.role == Role::Cr)
        .flat_map(|(user, id)| {
            (0..courses_per_cr)
                .map(|i| {
                    let last_name: String = LastName().fake();
                    let idx = user.cohort * courses_per_cr + i;
                    CourseSeed {
                        course_name: COURSE_TITLES[idx % COURSE_TITLES.len()].to_string(),
                        teacher_name: format!("Dr. {}", last_name),
                        course_password: course_password(idx),
                        cohort: user.cohort,
                        created_by: *id,
                        cr_name: user.full_name.clone(),
                        cr_email: user.email.clone(),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_courses(
    db: &PgPool,
    cohorts: &[Cohort],
    courses: &[CourseSeed],
) -> Result<Vec<CourseId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📚 Seeding {} courses...", courses.len());

    let mut tx = db.begin().await?;

    // 10 params per course
    const BATCH_SIZE: usize = 500;

    let mut all_ids = Vec::with_capacity(courses.len());
    for chunk in courses.chunks(BATCH_SIZE) {
        all_ids.extend(insert_courses_chunk(&mut tx, cohorts, chunk).await?);
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} courses in {:?}",
        all_ids.len(),
        start_time.elapsed()
    );

    Ok(all_ids)
}

async fn insert_courses_chunk(
    tx: &mut Transaction<'_, Postgres>,
    cohorts: &[Cohort],
    courses: &[CourseSeed],
) -> Result<Vec<CourseId>, Box<dyn std::error::Error>> {
    if courses.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO courses (course_name, teacher_name, course_password, section, batch, semester, created_by, cr_name, cr_email, thumbnail) VALUES ",
    );

    for (i, _) in courses.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 10;
        let placeholders: Vec<String> = (1..=10).map(|n| format!("${}", p + n)).collect();
        query.push('(');
        query.push_str(&placeholders.join(", "));
        query.push(')');
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for course in courses {
        let cohort = &cohorts[course.cohort];
        q = q
            .bind(&course.course_name)
            .bind(&course.teacher_name)
            .bind(&course.course_password)
            .bind(&cohort.section)
            .bind(&cohort.batch)
            .bind(&cohort.semester)
            .bind(course.created_by)
            .bind(&course.cr_name)
            .bind(&course.cr_email)
            .bind(None::<String>);
    }

    let ids: Vec<CourseId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Enrolls each course's creator plus every other student of its cohort.
pub async fn seed_enrollments(
    db: &PgPool,
    users: &[UserSeed],
    user_ids: &[UserId],
    courses: &[CourseSeed],
    course_ids: &[CourseId],
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📝 Seeding enrollments...");

    let pairs: Vec<(CourseId, UserId)> = courses
        .par_iter()
        .zip(course_ids.par_iter())
        .flat_map(|(course, course_id)| {
            let mut pairs = vec![(*course_id, course.created_by)];
            pairs.extend(
                users
                    .iter()
                    .zip(user_ids)
                    .filter(|(user, _)| user.cohort == course.cohort && user.role == Role::Student)
                    .step_by(2)
                    .map(|(_, user_id)| (*course_id, *user_id)),
            );
            pairs
        })
        .collect();

    let mut tx = db.begin().await?;
    let mut inserted = 0;

    const BATCH_SIZE: usize = 5000;
    for chunk in pairs.chunks(BATCH_SIZE) {
        let mut query = String::from("INSERT INTO course_enrollments (course_id, user_id) VALUES ");
        for (i, _) in chunk.iter().enumerate() {
            if i > 0 {
                query.push_str(", ");
            }
            query.push_str(&format!("(${}, ${})", i * 2 + 1, i * 2 + 2));
        }
        query.push_str(" ON CONFLICT DO NOTHING");

        let mut q = sqlx::query(&query);
        for (course_id, user_id) in chunk {
            q = q.bind(*course_id).bind(*user_id);
        }
        inserted += q.execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} enrollments in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}
