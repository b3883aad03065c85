//! Shared resource seeding.

use std::time::Instant;

use rayon::prelude::*;
use sqlx::PgPool;

use studyhub_models::ids::UserId;
use studyhub_models::resources::{ResourceStatus, Subject};

use super::models::{ResourceSeed, UserSeed};

const LINK_HOSTS: [&str; 4] = [
    "https://drive.example.com/file",
    "https://docs.example.com/d",
    "https://youtube.example.com/watch",
    "https://notes.example.com/n",
];

/// Every fifth resource is left pending; the rest are approved.
pub fn generate_resources(
    users: &[UserSeed],
    user_ids: &[UserId],
    count: usize,
) -> Vec<ResourceSeed> {
    if users.is_empty() {
        return Vec::new();
    }

    (0..count)
        .into_par_iter()
        .map(|i| {
            let author = i % users.len();
            let subject = Subject::ALL[i % Subject::ALL.len()];
            ResourceSeed {
                title: format!("{} notes #{}", capitalize(subject.as_str()), i + 1),
                link: format!("{}/{}", LINK_HOSTS[i % LINK_HOSTS.len()], i + 1),
                description: (i % 3 != 0)
                    .then(|| format!("Study material for {} shared by a classmate", subject)),
                subject,
                status: if i % 5 == 4 {
                    ResourceStatus::Pending
                } else {
                    ResourceStatus::Approved
                },
                author_id: user_ids[author],
                author_name: users[author].full_name.clone(),
            }
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn seed_resources(
    db: &PgPool,
    resources: &[ResourceSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🔗 Seeding {} resources...", resources.len());

    let mut tx = db.begin().await?;
    let mut inserted = 0;

    // 7 params per resource
    const BATCH_SIZE: usize = 1000;
    for chunk in resources.chunks(BATCH_SIZE) {
        let mut query = String::from(
            "INSERT INTO resources (title, link, description, subject, status, author_id, author_name) VALUES ",
        );
        for (i, _) in chunk.iter().enumerate() {
            if i > 0 {
                query.push_str(", ");
            }
            let p = i * 7;
            query.push_str(&format!(
                "(${}, ${}, ${}, ${}, ${}, ${}, ${})",
                p + 1,
                p + 2,
                p + 3,
                p + 4,
                p + 5,
                p + 6,
                p + 7
            ));
        }

        let mut q = sqlx::query(&query);
        for resource in chunk {
            q = q
                .bind(&resource.title)
                .bind(&resource.link)
                .bind(&resource.description)
                .bind(resource.subject)
                .bind(resource.status)
                .bind(resource.author_id)
                .bind(&resource.author_name);
        }
        inserted += q.execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} resources in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}
