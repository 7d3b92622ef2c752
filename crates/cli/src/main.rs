//! Vistapro CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! vp-cli migrate
//!
//! # Create a user
//! vp-cli user create -e jane@vistapro.ng -n "Jane A." -r super_admin
//!
//! # Create a marketer under an admin
//! vp-cli user create -e tunde@vistapro.ng -n "Tunde O." -r marketer --admin-id 4
//!
//! # Seed a fresh database with a demo hierarchy and orders
//! vp-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create users with optional parent assignment
//! - `user list` / `user lock` / `user unlock` / `user delete` - Directory management
//! - `seed` - Seed a demo hierarchy with sample orders (fresh database only)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vp-cli")]
#[command(author, version, about = "Vistapro CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage directory users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed a demo hierarchy with sample orders
    Seed,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`marketer`, `admin`, `super_admin`, `master_admin`, `dealer`)
        #[arg(short, long, default_value = "marketer")]
        role: String,

        /// Parent Admin id (marketers only)
        #[arg(long)]
        admin_id: Option<i32>,

        /// Parent SuperAdmin id (marketers: direct assignment; admins: reporting parent)
        #[arg(long)]
        super_admin_id: Option<i32>,
    },
    /// List live users with a role
    List {
        /// Role to list
        #[arg(short, long, default_value = "marketer")]
        role: String,
    },
    /// Lock a user out of the application
    Lock {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
    /// Unlock a previously locked user
    Unlock {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
    /// Soft-delete a user
    Delete {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vistapro_cli=info,vistapro_server=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                role,
                admin_id,
                super_admin_id,
            } => commands::user::create(&email, &name, &role, admin_id, super_admin_id).await,
            UserAction::List { role } => commands::user::list(&role).await,
            UserAction::Lock { email } => commands::user::set_locked(&email, true).await,
            UserAction::Unlock { email } => commands::user::set_locked(&email, false).await,
            UserAction::Delete { email } => commands::user::delete(&email).await,
        },
        Commands::Seed => commands::seed::run().await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
