use uuid::Uuid;

use crate::error::ApiError;

/// Allows the operation only for the owner of the record. The denial
/// message names the attempted operation, matching the handler it guards.
pub fn check_owner(owner_id: Uuid, caller_id: Uuid, denial: &'static str) -> Result<(), ApiError> {
    if owner_id == caller_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(denial))
    }
}
