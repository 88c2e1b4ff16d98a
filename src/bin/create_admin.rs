//! CLI tool to create the single admin account.
//!
//! Usage:
//!   cargo run --bin create-admin -- --username admin --email admin@example.com --password-hash '<hash>'
//!
//! The password hash is produced by the upstream identity service; this tool
//! stores it as given.

use std::env;

use testledger_lib::config::Config;
use testledger_lib::db::DbPool;
use testledger_lib::error::AppError;
use testledger_lib::services::user_admin;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    let mut username: Option<String> = None;
    let mut email: Option<String> = None;
    let mut password_hash: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--username" | "-u" => {
                i += 1;
                username = args.get(i).cloned();
            }
            "--email" | "-e" => {
                i += 1;
                email = args.get(i).cloned();
            }
            "--password-hash" | "-p" => {
                i += 1;
                password_hash = args.get(i).cloned();
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let (Some(username), Some(email), Some(password_hash)) = (username, email, password_hash)
    else {
        eprintln!("Error: --username, --email and --password-hash are required");
        print_usage();
        std::process::exit(1);
    };

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    let admin = match user_admin::bootstrap_admin(&pool, &username, &email, &password_hash).await {
        Ok(user) => user,
        Err(AppError::Conflict(msg)) => {
            eprintln!("Error: {}", msg);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("Error creating admin: {}", e);
            std::process::exit(1);
        }
    };

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("  Admin Account Created");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!("  ID:        {}", admin.id);
    println!("  Username:  {}", admin.username);
    println!("  Email:     {}", admin.email);
    println!();
    println!("  Send X-User-Id: {} to act as this admin.", admin.id);
    println!("════════════════════════════════════════════════════════════════");
    println!();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: create-admin --username <name> --email <email> --password-hash <hash>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --username, -u       Login name of the admin (required)");
    eprintln!("  --email, -e          Email address (required)");
    eprintln!("  --password-hash, -p  Pre-hashed password (required)");
    eprintln!("  --help, -h           Show this help message");
    eprintln!();
    eprintln!("Exit codes: 0 created, 1 error, 2 an admin already exists");
    eprintln!();
}
