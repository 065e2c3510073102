use crate::logger;
use crate::models::{Role, Stats, UserSession};
use crate::store::{AccountStore, NewProfile, StoreError};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 4;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+$").expect("email pattern is valid");
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Por favor, preencha todos os campos")]
    MissingFields,
    #[error("Por favor, insira um email válido")]
    InvalidEmail,
    #[error("A senha deve ter pelo menos 4 caracteres")]
    PasswordTooShort,
    #[error("Por favor, informe seu nome")]
    MissingName,
    #[error("Confirme seu email antes de entrar")]
    EmailNotConfirmed,
    #[error("Perfil não encontrado para este email")]
    ProfileMissing,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a sign-up produced. When confirmation is pending there is no
/// session yet; the user signs in after confirming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    SignedIn(UserSession),
    ConfirmationPending { email: String },
}

/// Form checks run before any store call.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if !EMAIL.is_match(email.trim()) {
        return Err(AuthError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

pub fn sign_in<S: AccountStore + ?Sized>(
    store: &S,
    email: &str,
    password: &str,
) -> Result<UserSession, AuthError> {
    validate_credentials(email, password)?;
    let email = email.trim();
    store.sign_in(email, password)?;

    // The profile is the source of truth for confirmation, not the sign-in reply.
    let profile = match store.fetch_profile(email)? {
        Some(profile) => profile,
        None => {
            // A sign-up that failed between the account and the profile.
            logger::log(&format!("Seeding missing profile for {}", email));
            store.create_profile(&NewProfile {
                email: email.to_string(),
                name: default_name(email).to_string(),
                role: Role::Student,
            })?;
            store
                .fetch_profile(email)?
                .ok_or(AuthError::ProfileMissing)?
        }
    };
    if !profile.email_confirmed {
        logger::log(&format!("Sign-in blocked for {}: email not confirmed", email));
        return Err(AuthError::EmailNotConfirmed);
    }

    logger::log(&format!("Signed in {} as {}", email, profile.role.as_str()));
    Ok(UserSession {
        email: profile.email,
        name: profile.name,
        role: profile.role,
        stats: profile.stats,
    })
}

/// Display name for a profile seeded at sign-in: the part before the `@`.
fn default_name(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

pub fn sign_up<S: AccountStore + ?Sized>(
    store: &S,
    email: &str,
    password: &str,
    name: &str,
    role: Role,
) -> Result<SignUpOutcome, AuthError> {
    validate_credentials(email, password)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::MissingName);
    }
    let email = email.trim();

    match store.sign_up(email, password) {
        Ok(_) => {}
        Err(StoreError::AccountExists) => {
            // Finish an earlier sign-up whose profile was never written.
            let same_password = store.sign_in(email, password).is_ok();
            if !same_password || store.fetch_profile(email)?.is_some() {
                return Err(StoreError::AccountExists.into());
            }
            logger::log(&format!("Resuming sign-up for {}", email));
        }
        Err(e) => return Err(e.into()),
    }
    store.create_profile(&NewProfile {
        email: email.to_string(),
        name: name.to_string(),
        role,
    })?;
    logger::log(&format!("Signed up {} as {}", email, role.as_str()));

    if store.requires_confirmation() {
        return Ok(SignUpOutcome::ConfirmationPending {
            email: email.to_string(),
        });
    }
    Ok(SignUpOutcome::SignedIn(UserSession {
        email: email.to_string(),
        name: name.to_string(),
        role,
        stats: Stats::default(),
    }))
}
