//! The account backend the quiz talks to.
//!
//! Everything the app needs from persistence goes through [`AccountStore`]:
//! credential checks, account creation, profile lookup and the running
//! answer counters. `db::SqliteStore` is the shipped implementation.

use crate::models::{Role, Stats};
use std::sync::Arc;
use thiserror::Error;

pub type UserId = i64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Email ou senha inválidos")]
    InvalidCredentials,
    #[error("Já existe uma conta com este email")]
    AccountExists,
    #[error("Conta não encontrada")]
    NotFound,
    #[error("Erro no banco de dados: {0}")]
    Backend(String),
}

/// Result of a successful credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignIn {
    pub user_id: UserId,
    pub email_confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub stats: Stats,
    pub email_confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub email: String,
    pub name: String,
    pub role: Role,
}

pub trait AccountStore {
    fn sign_in(&self, email: &str, password: &str) -> Result<SignIn, StoreError>;

    fn sign_up(&self, email: &str, password: &str) -> Result<UserId, StoreError>;

    fn fetch_profile(&self, email: &str) -> Result<Option<Profile>, StoreError>;

    /// Creates the profile with zeroed stats.
    fn create_profile(&self, profile: &NewProfile) -> Result<(), StoreError>;

    /// Overwrites the stored totals with `stats`.
    fn update_stats(&self, email: &str, stats: &Stats) -> Result<(), StoreError>;

    /// Whether a new account must confirm its email before signing in.
    fn requires_confirmation(&self) -> bool {
        false
    }
}

impl<S: AccountStore + ?Sized> AccountStore for Arc<S> {
    fn sign_in(&self, email: &str, password: &str) -> Result<SignIn, StoreError> {
        (**self).sign_in(email, password)
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<UserId, StoreError> {
        (**self).sign_up(email, password)
    }

    fn fetch_profile(&self, email: &str) -> Result<Option<Profile>, StoreError> {
        (**self).fetch_profile(email)
    }

    fn create_profile(&self, profile: &NewProfile) -> Result<(), StoreError> {
        (**self).create_profile(profile)
    }

    fn update_stats(&self, email: &str, stats: &Stats) -> Result<(), StoreError> {
        (**self).update_stats(email, stats)
    }

    fn requires_confirmation(&self) -> bool {
        (**self).requires_confirmation()
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct Account {
        id: UserId,
        password: String,
        confirmed: bool,
    }

    /// In-process store for tests. `failing` makes every call return a
    /// backend error.
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        accounts: Mutex<HashMap<String, Account>>,
        profiles: Mutex<HashMap<String, Profile>>,
        pub require_confirmation: bool,
        pub failing: bool,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        pub fn requiring_confirmation() -> Self {
            Self {
                require_confirmation: true,
                ..Self::default()
            }
        }

        pub fn with_account(self, email: &str, password: &str, name: &str, role: Role) -> Self {
            self.sign_up(email, password).unwrap();
            self.confirm(email);
            self.create_profile(&NewProfile {
                email: email.to_string(),
                name: name.to_string(),
                role,
            })
            .unwrap();
            self
        }

        pub fn confirm(&self, email: &str) {
            if let Some(account) = self.accounts.lock().unwrap().get_mut(email) {
                account.confirmed = true;
            }
            if let Some(profile) = self.profiles.lock().unwrap().get_mut(email) {
                profile.email_confirmed = true;
            }
        }

        pub fn stats(&self, email: &str) -> Option<Stats> {
            self.profiles.lock().unwrap().get(email).map(|p| p.stats)
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.failing {
                Err(StoreError::Backend("store offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl AccountStore for MemoryStore {
        fn sign_in(&self, email: &str, password: &str) -> Result<SignIn, StoreError> {
            self.check()?;
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some(account) if account.password == password => Ok(SignIn {
                    user_id: account.id,
                    email_confirmed: account.confirmed,
                }),
                _ => Err(StoreError::InvalidCredentials),
            }
        }

        fn sign_up(&self, email: &str, password: &str) -> Result<UserId, StoreError> {
            self.check()?;
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(StoreError::AccountExists);
            }
            let id = accounts.len() as UserId + 1;
            accounts.insert(
                email.to_string(),
                Account {
                    id,
                    password: password.to_string(),
                    confirmed: !self.require_confirmation,
                },
            );
            Ok(id)
        }

        fn fetch_profile(&self, email: &str) -> Result<Option<Profile>, StoreError> {
            self.check()?;
            Ok(self.profiles.lock().unwrap().get(email).cloned())
        }

        fn create_profile(&self, profile: &NewProfile) -> Result<(), StoreError> {
            self.check()?;
            let confirmed = self
                .accounts
                .lock()
                .unwrap()
                .get(&profile.email)
                .map(|a| a.confirmed)
                .unwrap_or(false);
            self.profiles.lock().unwrap().insert(
                profile.email.clone(),
                Profile {
                    email: profile.email.clone(),
                    name: profile.name.clone(),
                    role: profile.role,
                    stats: Stats::default(),
                    email_confirmed: confirmed,
                },
            );
            Ok(())
        }

        fn update_stats(&self, email: &str, stats: &Stats) -> Result<(), StoreError> {
            self.check()?;
            match self.profiles.lock().unwrap().get_mut(email) {
                Some(profile) => {
                    profile.stats = *stats;
                    Ok(())
                }
                None => Err(StoreError::NotFound),
            }
        }

        fn requires_confirmation(&self) -> bool {
            self.require_confirmation
        }
    }
}
