//! Account repository backed by PostgreSQL through SeaORM.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use tokio::time::Duration;
use tracing::debug;

use common::{AppError, AppResult};
use domain::{Account, NewAccount};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::infra::bounded;

const STORE: &str = "credential store";

#[cfg(test)]
use mockall::automock;

/// Credential store trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>>;

    /// Find account by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// Check whether a username is taken
    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    /// Check whether an email is taken
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Create a new account. A duplicate username or email is `AccountExists`.
    async fn create(&self, account: NewAccount) -> AppResult<Account>;

    /// Check connectivity
    async fn ping(&self) -> AppResult<()>;
}

/// SeaORM implementation of [`CredentialStore`].
pub struct AccountStore {
    db: DatabaseConnection,
    timeout: Duration,
}

impl AccountStore {
    /// Create new repository instance. Every query is bounded by `timeout`.
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

#[async_trait]
impl CredentialStore for AccountStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        let query = AccountEntity::find_by_id(id).one(&self.db);
        let result = bounded(self.timeout, STORE, "find_by_id", query).await?;

        Ok(result.map(Account::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let query = AccountEntity::find()
            .filter(account::Column::Username.eq(username))
            .one(&self.db);
        let result = bounded(self.timeout, STORE, "find_by_username", query).await?;

        Ok(result.map(Account::from))
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let query = AccountEntity::find()
            .filter(account::Column::Username.eq(username))
            .count(&self.db);
        let count = bounded(self.timeout, STORE, "exists_by_username", query).await?;

        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let query = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .count(&self.db);
        let count = bounded(self.timeout, STORE, "exists_by_email", query).await?;

        Ok(count > 0)
    }

    async fn create(&self, account: NewAccount) -> AppResult<Account> {
        let now = Utc::now();
        let model = ActiveModel {
            id: NotSet,
            username: Set(account.username),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let insert = async {
            model.insert(&self.db).await.map_err(|err| match err.sql_err() {
                // Lost a race with a concurrent registration for the same name
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::AccountExists,
                _ => AppError::from(err),
            })
        };
        let created = bounded(self.timeout, STORE, "create", insert).await?;

        debug!(account_id = created.id, "Account created");
        Ok(Account::from(created))
    }

    async fn ping(&self) -> AppResult<()> {
        bounded(self.timeout, STORE, "ping", self.db.ping()).await
    }
}
