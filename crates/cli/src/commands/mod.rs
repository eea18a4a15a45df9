//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;

/// Read `DATABASE_URL`, loading `.env` first if present.
fn database_url() -> Option<secrecy::SecretString> {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .map(secrecy::SecretString::from)
}
