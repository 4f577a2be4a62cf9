//! Account persistence.

mod account_repository;
pub mod entities;
mod memory;

pub use account_repository::{AccountStore, CredentialStore};
pub use memory::InMemoryCredentialStore;

#[cfg(test)]
pub use account_repository::MockCredentialStore;
