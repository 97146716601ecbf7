use crate::domain::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored user row. Never serialized to clients; see [`SessionUser`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Identity carried by an authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    pub password: String,
}

impl CreateUser {
    /// Trims the free-text fields and rejects blank or malformed ones.
    pub fn normalized(self) -> Result<Self, DomainError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation("El nombre es obligatorio".to_string()));
        }

        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(DomainError::Validation("El email no es válido".to_string()));
        }

        if self.password.is_empty() {
            return Err(DomainError::Validation(
                "La contraseña es obligatoria".to_string(),
            ));
        }

        let phone = match self.phone.map(|p| p.trim().to_string()) {
            Some(p) if p.is_empty() => None,
            Some(p) if !is_valid_phone(&p) => {
                return Err(DomainError::Validation("El teléfono no es válido".to_string()));
            }
            other => other,
        };

        Ok(Self {
            name,
            email,
            phone,
            password: self.password,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Insert payload handed to the user repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
}

/// `local@domain.tld` with no whitespace and a single `@`.
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

/// Mexican phone number: ten digits grouped 3-3-4, optionally prefixed by
/// `52` or `+52`. A single whitespace is allowed after the prefix and
/// between groups.
pub fn is_valid_phone(phone: &str) -> bool {
    if let Some(rest) = phone.strip_prefix("+52") {
        return is_national_number(rest);
    }
    is_national_number(phone) || phone.strip_prefix("52").is_some_and(is_national_number)
}

fn is_national_number(number: &str) -> bool {
    let mut rest = number;
    for len in [3, 3, 4] {
        rest = rest.strip_prefix(char::is_whitespace).unwrap_or(rest);
        let Some((group, tail)) = rest.split_at_checked(len) else {
            return false;
        };
        if !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        rest = tail;
    }
    rest.is_empty()
}
