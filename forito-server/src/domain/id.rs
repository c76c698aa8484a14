use super::error::DomainError;

/// Store-native identifiers are 24 hex characters. Anything else is rejected
/// before a store round trip is attempted.
pub(crate) fn is_well_formed(id: &str) -> bool {
    id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

pub(crate) fn validate(id: &str) -> Result<(), DomainError> {
    if !is_well_formed(id) {
        return Err(DomainError::Validation {
            field: "id",
            message: "must be a 24-character hex identifier",
        });
    }
    Ok(())
}
