//! Administrator provisioning tool
//!
//! Creates the first console account directly in MongoDB:
//!
//! ```text
//! intake-create-admin --identifier admin@example.org --password '...'
//! ```
//!
//! Refuses to overwrite an existing account with the same identifier.

use clap::Parser;
use tracing::info;

use intake::auth::hash_password;
use intake::db::schemas::{AdminUserDoc, ADMIN_USER_COLLECTION};
use intake::db::MongoClient;

/// Create an Intake administrator account
#[derive(Parser, Debug)]
#[command(name = "intake-create-admin")]
#[command(about = "Create an Intake administrator account")]
struct CreateAdminArgs {
    /// Administrator identifier (email or username)
    #[arg(long)]
    identifier: String,

    /// Administrator password (will be hashed with Argon2id)
    #[arg(long)]
    password: String,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "intake")]
    mongodb_db: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = CreateAdminArgs::parse();

    tracing_subscriber::fmt().with_env_filter("info").init();

    if args.password.len() < 8 {
        anyhow::bail!("Password must be at least 8 characters");
    }

    let mongo = MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await?;
    let collection = mongo
        .collection::<AdminUserDoc>(ADMIN_USER_COLLECTION)
        .await?;

    if collection
        .find_one(bson::doc! { "identifier": &args.identifier })
        .await?
        .is_some()
    {
        anyhow::bail!("Administrator '{}' already exists", args.identifier);
    }

    let password_hash = hash_password(&args.password)?;
    let user = AdminUserDoc::new(args.identifier.clone(), password_hash);
    let id = collection.insert_one(user).await?;

    info!(
        "Administrator '{}' created successfully ({})",
        args.identifier,
        id.to_hex()
    );

    Ok(())
}
