use brs_cli::{NewSuperuser, assign_roles, create_superuser, parse_roles, seed_roles};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "brs-cli")]
#[command(about = "BRS CLI - Administrative tools for the BRS identity service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert any missing role of the fixed role catalog
    SeedRoles,
    /// Create a staff superuser account
    CreateSuperuser {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// First name
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Middle name (family name)
        #[arg(short = 'm', long)]
        middle_name: Option<String>,

        /// Last name (patronymic)
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Give roles to a user and create the matching profiles
    AssignRoles {
        username: String,

        /// Role names, e.g. `teacher student`
        #[arg(required = true)]
        roles: Vec<String>,

        /// Replace the current role set instead of adding to it
        #[arg(long)]
        replace: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::SeedRoles => handle_seed_roles(&pool).await,
        Commands::CreateSuperuser {
            username,
            email,
            first_name,
            middle_name,
            last_name,
            password,
        } => {
            handle_create_superuser(
                &pool,
                username,
                email,
                first_name,
                middle_name,
                last_name,
                password,
            )
            .await
        }
        Commands::AssignRoles {
            username,
            roles,
            replace,
        } => handle_assign_roles(&pool, &username, &roles, replace).await,
    }
}

async fn handle_seed_roles(pool: &sqlx::postgres::PgPool) {
    match seed_roles(pool).await {
        Ok(count) => println!("✅ Role catalog seeded ({} added)", count),
        Err(e) => {
            eprintln!("\n❌ Error seeding roles: {}", e);
            std::process::exit(1);
        }
    }
}

fn prompt(value: Option<String>, label: &str, allow_empty: bool) -> String {
    value.unwrap_or_else(|| {
        Input::new()
            .with_prompt(label)
            .allow_empty(allow_empty)
            .interact_text()
            .unwrap_or_else(|e| {
                eprintln!("Failed to read {}: {}", label, e);
                std::process::exit(1);
            })
    })
}

async fn handle_create_superuser(
    pool: &sqlx::postgres::PgPool,
    username: Option<String>,
    email: Option<String>,
    first_name: Option<String>,
    middle_name: Option<String>,
    last_name: Option<String>,
    password: Option<String>,
) {
    let username = prompt(username, "Username", false);
    let email = prompt(email, "Email address", true);
    let first_name = prompt(first_name, "First name", true);
    let middle_name = prompt(middle_name, "Middle name", true);
    let last_name = prompt(last_name, "Last name", true);

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    let new = NewSuperuser {
        username: &username,
        email: &email,
        first_name: &first_name,
        middle_name: &middle_name,
        last_name: &last_name,
        password: &password,
    };

    match create_superuser(pool, new).await {
        Ok(id) => {
            println!("\n✅ Superuser created successfully!");
            println!("   ID: {}", id);
            println!("   Username: {}", username);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating superuser: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_assign_roles(
    pool: &sqlx::postgres::PgPool,
    username: &str,
    roles: &[String],
    replace: bool,
) {
    let roles = match parse_roles(roles) {
        Ok(roles) => roles,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match assign_roles(pool, username, &roles, replace).await {
        Ok(plan) => {
            println!("✅ Roles updated for {}", username);
            println!("   Profiles kept or created: {:?}", plan.ensure);
            println!("   Profiles removed: {:?}", plan.remove);
        }
        Err(e) => {
            eprintln!("\n❌ Error assigning roles: {}", e);
            std::process::exit(1);
        }
    }
}
