use chrono::NaiveDate;
use serde_json::Value;
use validator::ValidateEmail;

use super::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) birthday: Option<NaiveDate>,
    /// Opaque notification records; `_id` is the identity key used by the
    /// keyed merge in [`merge_notifications`].
    pub(crate) notifications: Vec<Value>,
}

#[derive(Debug, Clone)]
pub(crate) struct SignupRequest {
    pub(crate) first_name: String,
    pub(crate) last_name: Option<String>,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) confirm_password: String,
}

impl SignupRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let first_name = self.first_name.trim().to_string();
        if first_name.is_empty() {
            return Err(DomainError::Validation {
                field: "firstName",
                message: "must not be empty",
            });
        }
        let email = normalize_email(&self.email)?;
        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        if self.password != self.confirm_password {
            return Err(DomainError::Validation {
                field: "confirmPassword",
                message: "must match password",
            });
        }
        Ok(Self {
            first_name,
            last_name: self.last_name.map(|name| name.trim().to_string()),
            email,
            password: self.password,
            confirm_password: self.confirm_password,
        })
    }

    pub(crate) fn display_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(DomainError::Validation {
                field: "email",
                message: "must not be empty",
            });
        }
        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            email,
            password: self.password,
        })
    }
}

/// Emails are matched exactly as stored; only surrounding whitespace is
/// stripped before the format check.
pub(crate) fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email.to_string())
}

/// Birthdays arrive as `yyyy/mm/dd` only; anything else is rejected before
/// date parsing.
pub(crate) fn parse_birthday(raw: &str) -> Result<NaiveDate, DomainError> {
    let shape_ok = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'/',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(DomainError::Validation {
            field: "birthday",
            message: "must use the yyyy/mm/dd format",
        });
    }
    NaiveDate::parse_from_str(raw, "%Y/%m/%d").map_err(|_| DomainError::Validation {
        field: "birthday",
        message: "must be a real calendar date",
    })
}

/// Update-only keyed merge over notification lists: existing entries whose
/// `_id` appears in `submitted` are replaced by the submitted version, all
/// others are kept untouched, and submitted entries with no existing
/// counterpart are dropped (this is not an upsert). Entries without an `_id`
/// never match.
pub(crate) fn merge_notifications(existing: &[Value], submitted: &[Value]) -> Vec<Value> {
    existing
        .iter()
        .map(|notification| {
            let replacement = notification.get("_id").and_then(|key| {
                submitted
                    .iter()
                    .find(|candidate| candidate.get("_id") == Some(key))
            });
            replacement.unwrap_or(notification).clone()
        })
        .collect()
}
