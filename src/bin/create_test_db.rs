use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use finance_tracker::{PasswordHash, create_default_categories, create_user, initialize_db};

/// A utility for creating a test database for the finance tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let mut connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test user test@example.com with the password 'test'...");

    let password_hash = PasswordHash::new("test", PasswordHash::DEFAULT_COST)?;

    let transaction = connection.transaction()?;
    let user = create_user("Test User", "test@example.com", password_hash, &transaction)?;
    create_default_categories(user.id, &transaction)?;
    transaction.commit()?;

    println!("Success!");

    Ok(())
}
