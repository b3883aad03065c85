//! Cohort and user seeding.
//!
//! Each cohort gets one CR and a set of students sharing its section,
//! batch and semester.

use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};

use studyhub_models::ids::UserId;
use studyhub_models::users::Role;

use super::models::{Cohort, SEED_EMAIL_DOMAIN, UserSeed};

const SECTIONS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];
const FIRST_BATCH: usize = 60;
const SEMESTER: &str = "Fall 2025";

/// Cohorts `A/60`, `B/60`, ... `F/60`, then `A/61` and so on.
pub fn generate_cohorts(count: usize) -> Vec<Cohort> {
    (0..count)
        .map(|i| Cohort {
            section: SECTIONS[i % SECTIONS.len()].to_string(),
            batch: (FIRST_BATCH + i / SECTIONS.len()).to_string(),
            semester: SEMESTER.to_string(),
        })
        .collect()
}

/// Generates one CR followed by `students_per_cohort` students per cohort.
pub fn generate_users(
    cohorts: &[Cohort],
    students_per_cohort: usize,
    password_hash: &str,
) -> Vec<UserSeed> {
    cohorts
        .par_iter()
        .enumerate()
        .flat_map(|(cohort_idx, _)| {
            let mut users = Vec::with_capacity(students_per_cohort + 1);
            users.push(generate_user(Role::Cr, cohort_idx, 0, "cr", password_hash));
            for user_idx in 0..students_per_cohort {
                users.push(generate_user(
                    Role::Student,
                    cohort_idx,
                    user_idx,
                    "student",
                    password_hash,
                ));
            }
            users
        })
        .collect()
}

fn generate_user(
    role: Role,
    cohort: usize,
    user_idx: usize,
    role_prefix: &str,
    password_hash: &str,
) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let email = format!(
        "{}.{}+{}{}@{}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        role_prefix,
        cohort * 1000 + user_idx,
        SEED_EMAIL_DOMAIN
    );

    UserSeed {
        full_name: format!("{} {}", first_name, last_name),
        email,
        password_hash: password_hash.to_string(),
        role,
        cohort,
    }
}

/// Seeds cohort users, returning their ids in input order.
pub async fn seed_users(
    db: &PgPool,
    cohorts: &[Cohort],
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "👥 Seeding {} users across {} cohorts...",
        users.len(),
        cohorts.len()
    );

    let ids = insert_users_batch(db, cohorts, users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn insert_users_batch(
    db: &PgPool,
    cohorts: &[Cohort],
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 8 params per user
    const BATCH_SIZE: usize = 800;

    let mut all_ids = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        all_ids.extend(insert_users_chunk(&mut tx, cohorts, chunk).await?);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    cohorts: &[Cohort],
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (full_name, email, password, role, section, batch, semester, is_verified) VALUES ",
    );

    for (i, _) in users.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 8;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6,
            p + 7,
            p + 8
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        let cohort = &cohorts[user.cohort];
        q = q
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(&cohort.section)
            .bind(&cohort.batch)
            .bind(&cohort.semester)
            .bind(true);
    }

    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Deletes seeded accounts; their courses, enrollments and resources
/// cascade. Admins are kept.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let result = sqlx::query("DELETE FROM users WHERE email LIKE $1 AND role <> 'admin'")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
