//! In-memory repositories for tests.
//!
//! These mirror the `PostgreSQL` implementations closely enough to drive the
//! HTTP layer: ids are assigned sequentially from 1, listings are ordered by
//! creation time then id, and duplicate usernames are a conflict.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;

use lead_tracker_core::{AdminId, LeadId, LeadStatus};

use super::{AdminCredentials, AdminRepository, LeadRepository, NewAdmin, RepositoryError};
use crate::models::{Admin, Lead, NewLead};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Lead store held in a `Vec`.
#[derive(Debug)]
pub struct InMemoryLeadRepository {
    leads: Mutex<Vec<Lead>>,
    next_id: AtomicI32,
    available: AtomicBool,
}

impl Default for InMemoryLeadRepository {
    fn default() -> Self {
        Self {
            leads: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
            available: AtomicBool::new(true),
        }
    }
}

impl InMemoryLeadRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going down (or coming back).
    ///
    /// While unavailable every operation fails with a database error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::Database(sqlx::Error::PoolClosed))
        }
    }
}

impl LeadRepository for InMemoryLeadRepository {
    fn create(&self, lead: NewLead) -> BoxFuture<'_, Result<Lead, RepositoryError>> {
        async move {
            self.check_available()?;
            let now = Utc::now();
            let stored = Lead {
                id: LeadId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
                name: lead.name,
                email: lead.email,
                phone: lead.phone,
                company: lead.company,
                source: lead.source,
                status: lead.status,
                priority: lead.priority,
                notes: lead.notes,
                follow_up_date: lead.follow_up_date,
                created_at: now,
                updated_at: now,
            };
            lock(&self.leads).push(stored.clone());
            Ok(stored)
        }
        .boxed()
    }

    fn list_newest_first(&self) -> BoxFuture<'_, Result<Vec<Lead>, RepositoryError>> {
        async move {
            self.check_available()?;
            let mut leads = lock(&self.leads).clone();
            leads.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.as_i32().cmp(&a.id.as_i32()))
            });
            Ok(leads)
        }
        .boxed()
    }

    fn get(&self, id: LeadId) -> BoxFuture<'_, Result<Option<Lead>, RepositoryError>> {
        async move {
            self.check_available()?;
            Ok(lock(&self.leads).iter().find(|lead| lead.id == id).cloned())
        }
        .boxed()
    }

    fn update(
        &self,
        id: LeadId,
        lead: NewLead,
    ) -> BoxFuture<'_, Result<Option<Lead>, RepositoryError>> {
        async move {
            self.check_available()?;
            let mut leads = lock(&self.leads);
            let Some(stored) = leads.iter_mut().find(|stored| stored.id == id) else {
                return Ok(None);
            };
            stored.name = lead.name;
            stored.email = lead.email;
            stored.phone = lead.phone;
            stored.company = lead.company;
            stored.source = lead.source;
            stored.status = lead.status;
            stored.priority = lead.priority;
            stored.notes = lead.notes;
            stored.follow_up_date = lead.follow_up_date;
            stored.updated_at = Utc::now();
            Ok(Some(stored.clone()))
        }
        .boxed()
    }

    fn delete(&self, id: LeadId) -> BoxFuture<'_, Result<bool, RepositoryError>> {
        async move {
            self.check_available()?;
            let mut leads = lock(&self.leads);
            let before = leads.len();
            leads.retain(|lead| lead.id != id);
            Ok(leads.len() < before)
        }
        .boxed()
    }

    fn count_by_status(&self) -> BoxFuture<'_, Result<Vec<(LeadStatus, i64)>, RepositoryError>> {
        async move {
            self.check_available()?;
            let leads = lock(&self.leads);
            let counts = LeadStatus::ALL
                .iter()
                .map(|status| {
                    let count = leads.iter().filter(|lead| lead.status == *status).count();
                    (*status, i64::try_from(count).unwrap_or(i64::MAX))
                })
                .filter(|(_, count)| *count > 0)
                .collect();
            Ok(counts)
        }
        .boxed()
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        async move { self.check_available() }.boxed()
    }
}

/// Admin store held in a `Vec`.
#[derive(Debug)]
pub struct InMemoryAdminRepository {
    admins: Mutex<Vec<AdminCredentials>>,
    next_id: AtomicI32,
}

impl Default for InMemoryAdminRepository {
    fn default() -> Self {
        Self {
            admins: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

impl InMemoryAdminRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AdminRepository for InMemoryAdminRepository {
    fn create(&self, admin: NewAdmin) -> BoxFuture<'_, Result<Admin, RepositoryError>> {
        async move {
            let mut admins = lock(&self.admins);
            if admins
                .iter()
                .any(|existing| existing.admin.username == admin.username)
            {
                return Err(RepositoryError::Conflict(
                    "username already exists".to_owned(),
                ));
            }
            let now = Utc::now();
            let stored = Admin {
                id: AdminId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
                username: admin.username,
                email: admin.email,
                created_at: now,
                updated_at: now,
            };
            admins.push(AdminCredentials {
                admin: stored.clone(),
                password_hash: admin.password_hash,
            });
            Ok(stored)
        }
        .boxed()
    }

    fn find_credentials<'a>(
        &'a self,
        username: &'a str,
    ) -> BoxFuture<'a, Result<Option<AdminCredentials>, RepositoryError>> {
        async move {
            Ok(lock(&self.admins)
                .iter()
                .find(|existing| existing.admin.username == username)
                .cloned())
        }
        .boxed()
    }
}
