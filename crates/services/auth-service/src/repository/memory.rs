//! In-process credential store for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use common::{AppError, AppResult};
use domain::{Account, NewAccount};

use super::CredentialStore;

/// Credential store keeping accounts in memory with sequential ids.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().any(|a| a.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().any(|a| a.email == email))
    }

    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        let mut accounts = self.accounts.write().await;

        // Same uniqueness the database enforces
        if accounts
            .iter()
            .any(|a| a.username == account.username || a.email == account.email)
        {
            return Err(AppError::AccountExists);
        }

        let now = Utc::now();
        let created = Account {
            id: accounts.len() as i64 + 1,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        accounts.push(created.clone());

        Ok(created)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
