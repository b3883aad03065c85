//! Demo data for local development.
//!
//! Seeds cohorts of students with one CR each, their courses and
//! enrollments, and a mix of approved and pending resources. All seeded
//! accounts use `@example.com` emails and the password in
//! [`SEED_PASSWORD`](models::SEED_PASSWORD).

pub mod courses;
pub mod models;
pub mod resources;
pub mod users;

use std::time::Instant;

use sqlx::PgPool;

use studyhub_core::hash_password;

pub use models::SeedConfig;

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let total_start = Instant::now();

    println!("🌱 Starting database seeding...");
    println!(
        "   Config: {} cohorts, {} students each, {} courses per CR, {} resources",
        config.cohorts, config.students_per_cohort, config.courses_per_cr, config.resources
    );
    println!();

    clear_all(db).await?;

    // One bcrypt hash shared by every seeded account
    let password_hash = hash_password(models::SEED_PASSWORD)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let cohorts = users::generate_cohorts(config.cohorts);
    let user_seeds = users::generate_users(&cohorts, config.students_per_cohort, &password_hash);
    let user_ids = users::seed_users(db, &cohorts, &user_seeds).await?;

    let course_seeds = courses::generate_courses(&user_seeds, &user_ids, config.courses_per_cr);
    let course_ids = courses::seed_courses(db, &cohorts, &course_seeds).await?;
    courses::seed_enrollments(db, &user_seeds, &user_ids, &course_seeds, &course_ids).await?;

    let resource_seeds = resources::generate_resources(&user_seeds, &user_ids, config.resources);
    resources::seed_resources(db, &resource_seeds).await?;

    println!();
    println!("✅ Seeding completed in {:?}", total_start.elapsed());
    println!(
        "   Log in as any seeded user with password '{}'",
        models::SEED_PASSWORD
    );

    Ok(())
}

/// Removes seeded users; everything they own cascades.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    users::clear_users(db).await?;
    Ok(())
}
