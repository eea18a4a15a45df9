//! Repository tests against a real `PostgreSQL` database.
//!
//! These tests require:
//! - A reachable database in `DATABASE_URL`
//! - Permission to create the `crm` schema (migrations run automatically)
//!
//! Run with: cargo test -p lead-tracker-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use lead_tracker_core::{Email, LeadPriority, LeadStatus};
use lead_tracker_server::db::{
    AdminRepository, LeadRepository, MIGRATOR, NewAdmin, PgAdminRepository, PgLeadRepository,
    RepositoryError, create_pool,
};
use lead_tracker_server::models::NewLead;
use secrecy::SecretString;
use sqlx::PgPool;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&SecretString::from(url)).await.unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}{nanos}")
}

fn new_lead(name: &str, status: LeadStatus) -> NewLead {
    NewLead {
        name: name.to_owned(),
        email: Email::parse(&format!("{}@example.com", name.to_lowercase())).unwrap(),
        phone: String::new(),
        company: "Acme".to_owned(),
        source: "Website".to_owned(),
        status,
        priority: LeadPriority::Medium,
        notes: String::new(),
        follow_up_date: None,
    }
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL pointing at a PostgreSQL database"]
async fn test_lead_lifecycle() {
    let repo = PgLeadRepository::new(pool().await);
    let name = unique("lead");

    let created = repo.create(new_lead(&name, LeadStatus::New)).await.unwrap();
    assert_eq!(created.status, LeadStatus::New);
    assert_eq!(created.priority, LeadPriority::Medium);

    let fetched = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let mut changes = new_lead(&name, LeadStatus::Converted);
    changes.notes = "Signed".to_owned();
    let updated = repo.update(created.id, changes).await.unwrap().unwrap();
    assert_eq!(updated.status, LeadStatus::Converted);
    assert_eq!(updated.notes, "Signed");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    assert!(repo.delete(created.id).await.unwrap());
    assert!(repo.get(created.id).await.unwrap().is_none());
    assert!(!repo.delete(created.id).await.unwrap());
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL pointing at a PostgreSQL database"]
async fn test_newest_first_and_status_counts() {
    let repo = PgLeadRepository::new(pool().await);
    let before: i64 = repo
        .count_by_status()
        .await
        .unwrap()
        .into_iter()
        .filter(|(status, _)| *status == LeadStatus::Qualified)
        .map(|(_, count)| count)
        .sum();

    let older = repo
        .create(new_lead(&unique("older"), LeadStatus::Qualified))
        .await
        .unwrap();
    let newer = repo
        .create(new_lead(&unique("newer"), LeadStatus::Qualified))
        .await
        .unwrap();

    let listed = repo.list_newest_first().await.unwrap();
    let older_pos = listed.iter().position(|l| l.id == older.id).unwrap();
    let newer_pos = listed.iter().position(|l| l.id == newer.id).unwrap();
    assert!(newer_pos < older_pos);

    let after: i64 = repo
        .count_by_status()
        .await
        .unwrap()
        .into_iter()
        .filter(|(status, _)| *status == LeadStatus::Qualified)
        .map(|(_, count)| count)
        .sum();
    assert_eq!(after, before + 2);

    repo.delete(older.id).await.unwrap();
    repo.delete(newer.id).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL pointing at a PostgreSQL database"]
async fn test_admin_username_is_unique() {
    let repo = PgAdminRepository::new(pool().await);
    let username = unique("admin");
    let admin = NewAdmin {
        username: username.clone(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
        email: None,
    };

    let created = repo.create(admin.clone()).await.unwrap();
    assert_eq!(created.username, username);

    let err = repo.create(admin).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let credentials = repo.find_credentials(&username).await.unwrap().unwrap();
    assert_eq!(credentials.admin.id, created.id);
    assert!(credentials.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL pointing at a PostgreSQL database"]
async fn test_ping() {
    let repo = PgLeadRepository::new(pool().await);
    repo.ping().await.unwrap();
}
