//! Email-keyed user records with a seeded administrator. Every mutating call
//! rewrites the whole collection, which is acceptable at demo scale and keeps
//! the storage schema to a single key.

use derive_more::{Display, Error};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::id::opaque_id;
use crate::store::{StorageBackend, Store, StoreError};

pub const USERS_KEY: &str = "users";

pub const ADMIN_EMAIL: &str = "admin@dolarasia.com";
const ADMIN_CREDENTIAL: &str = "admin123";

#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum IdentityError {
    #[display("email already registered")]
    DuplicateEmail,
    #[display("email or credential did not match")]
    InvalidCredentials,
    #[display("validation failed: {_0}")]
    Validation(#[error(not(source))] String),
    #[display("{_0}")]
    Storage(StoreError),
}

impl From<StoreError> for IdentityError {
    fn from(value: StoreError) -> Self {
        IdentityError::Storage(value)
    }
}

/// The stored record, credential included. Only ever leaves the identity
/// store as a [SessionUser].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub credential: String,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub id_number: String,
    pub is_admin: bool,
    pub created_at: i64,
}

/// A [User] with the credential field stripped. This is the only shape that
/// sessions, responses and admin views ever carry.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub id_number: String,
    pub is_admin: bool,
    pub created_at: i64,
}

impl From<User> for SessionUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            email: value.email,
            full_name: value.full_name,
            phone: value.phone,
            address: value.address,
            id_number: value.id_number,
            is_admin: value.is_admin,
            created_at: value.created_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub id_number: String,
    pub credential: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), IdentityError> {
        let required = [
            (&self.full_name, "full name"),
            (&self.email, "email"),
            (&self.phone, "phone"),
            (&self.address, "address"),
            (&self.id_number, "id number"),
            (&self.credential, "credential"),
        ];
        for (value, field) in required {
            if value.trim().is_empty() {
                return Err(IdentityError::Validation(format!("{field} is required")));
            }
        }
        if !is_valid_email(&self.email) {
            return Err(IdentityError::Validation("email is not valid".to_string()));
        }
        if !is_valid_phone(&self.phone) {
            return Err(IdentityError::Validation(
                "phone is not a valid Indonesian mobile number".to_string(),
            ));
        }
        if self.credential.len() < 6 {
            return Err(IdentityError::Validation(
                "credential must be at least 6 characters".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct IdentityStore;

impl IdentityStore {
    /// Seeds the fixed administrator record if it is missing. Idempotent,
    /// run once per storage lifetime.
    pub fn bootstrap<B: StorageBackend>(store: &mut Store<B>) -> Result<(), IdentityError> {
        let mut users = Self::all_users(store);
        if users.iter().any(|u| u.email == ADMIN_EMAIL) {
            return Ok(());
        }

        users.push(User {
            id: "admin-1".to_string(),
            email: ADMIN_EMAIL.to_string(),
            credential: ADMIN_CREDENTIAL.to_string(),
            full_name: "Admin Dolarasia".to_string(),
            phone: "+62123456789".to_string(),
            address: "Jakarta Office".to_string(),
            id_number: "ADMIN001".to_string(),
            is_admin: true,
            created_at: OffsetDateTime::now_utc().unix_timestamp(),
        });
        Self::save_users(store, &users)?;
        info!("IDENTITY: Seeded administrator record");
        Ok(())
    }

    pub fn register<B: StorageBackend>(
        store: &mut Store<B>,
        request: &RegisterRequest,
    ) -> Result<SessionUser, IdentityError> {
        request.validate()?;

        let mut users = Self::all_users(store);
        if users.iter().any(|u| u.email == request.email) {
            return Err(IdentityError::DuplicateEmail);
        }

        let user = User {
            id: opaque_id(),
            email: request.email.clone(),
            credential: request.credential.clone(),
            full_name: request.full_name.clone(),
            phone: request.phone.clone(),
            address: request.address.clone(),
            id_number: request.id_number.clone(),
            is_admin: false,
            created_at: OffsetDateTime::now_utc().unix_timestamp(),
        };
        users.push(user.clone());
        Self::save_users(store, &users)?;

        info!("IDENTITY: Registered {}", user.email);
        Ok(user.into())
    }

    /// Both fields must match exactly, email comparison included.
    pub fn login<B: StorageBackend>(
        store: &Store<B>,
        email: &str,
        credential: &str,
    ) -> Result<SessionUser, IdentityError> {
        Self::all_users(store)
            .into_iter()
            .find(|u| u.email == email && u.credential == credential)
            .map(SessionUser::from)
            .ok_or(IdentityError::InvalidCredentials)
    }

    pub fn all_users<B: StorageBackend>(store: &Store<B>) -> Vec<User> {
        match store.get(USERS_KEY) {
            Ok(Some(users)) => users,
            Ok(None) => Vec::new(),
            Err(_) => {
                warn!("IDENTITY: Discarding corrupt user collection");
                Vec::new()
            }
        }
    }

    fn save_users<B: StorageBackend>(
        store: &mut Store<B>,
        users: &[User],
    ) -> Result<(), StoreError> {
        store.set(USERS_KEY, &users)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Indonesian mobile numbers: an optional +62/62/0 country prefix, then 8,
/// then a non-zero digit, then 6 to 9 further digits. Spaces and dashes are
/// ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let rest = if let Some(r) = cleaned.strip_prefix("+62") {
        r
    } else if let Some(r) = cleaned.strip_prefix("62") {
        r
    } else if let Some(r) = cleaned.strip_prefix('0') {
        r
    } else {
        return false;
    };

    let mut digits = rest.chars();
    if digits.next() != Some('8') {
        return false;
    }
    let tail: Vec<char> = digits.collect();
    if !tail.iter().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match tail.first() {
        Some('0') | None => false,
        Some(_) => (7..=10).contains(&tail.len()),
    }
}

/// Strength score out of 5 for presentation use. Only the length criterion
/// gates registration.
pub fn credential_score(credential: &str) -> u8 {
    const PUNCTUATION: &str = "!@#$%^&*(),.?\":{}|<>";
    let checks = [
        credential.len() >= 6,
        credential.chars().any(|c| c.is_ascii_uppercase()),
        credential.chars().any(|c| c.is_ascii_lowercase()),
        credential.chars().any(|c| c.is_ascii_digit()),
        credential.chars().any(|c| PUNCTUATION.contains(c)),
    ];
    checks.iter().filter(|passed| **passed).count() as u8
}
