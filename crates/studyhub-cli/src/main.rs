use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};

use studyhub_cli::admin::create_admin;
use studyhub_cli::seeder::{self, SeedConfig};
use studyhub_db::init_db_pool;

#[derive(Parser)]
#[command(name = "studyhub-cli")]
#[command(about = "StudyHub CLI tool for administrative tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a verified admin account
    CreateAdmin {
        /// Full name
        #[arg(short, long)]
        name: Option<String>,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Seed the database with demo cohorts, courses and resources
    Seed {
        /// Number of cohorts (one CR each)
        #[arg(short, long, default_value = "6")]
        cohorts: usize,

        /// Students per cohort
        #[arg(short, long, default_value = "30")]
        students: usize,

        /// Courses per CR
        #[arg(long, default_value = "4")]
        courses: usize,

        /// Shared resources
        #[arg(short, long, default_value = "60")]
        resources: usize,
    },
    /// Delete all seeded data
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let db = match init_db_pool().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => {
            let (name, email, password) = match prompt_admin(name, email, password) {
                Ok(values) => values,
                Err(e) => {
                    eprintln!("❌ Failed to read input: {}", e);
                    std::process::exit(1);
                }
            };

            match create_admin(&db, &name, &email, &password).await {
                Ok(id) => {
                    println!("✅ Admin created successfully!");
                    println!("   ID: {}", id);
                    println!("   Email: {}", email.trim().to_lowercase());
                }
                Err(e) => {
                    eprintln!("❌ Failed to create admin: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Seed {
            cohorts,
            students,
            courses,
            resources,
        } => {
            let config = SeedConfig::new(cohorts)
                .with_students(students)
                .with_courses(courses)
                .with_resources(resources);

            if let Err(e) = seeder::seed_all(&db, config).await {
                eprintln!("❌ Seeding failed: {}", e);
                std::process::exit(1);
            }
        }
        Commands::ClearSeed => {
            if let Err(e) = seeder::clear_all(&db).await {
                eprintln!("❌ Failed to clear seeded data: {}", e);
                std::process::exit(1);
            }
            println!("✅ Seeded data cleared");
        }
    }
}

fn prompt_admin(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String, String), dialoguer::Error> {
    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Full name").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    Ok((name, email, password))
}
