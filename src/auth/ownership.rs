use crate::error::AppError;

/// Anything with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

/// The one authorization rule for mutations: only the owner may touch it.
pub fn ensure_owner(resource: &impl Owned, acting_user_id: i64) -> Result<(), AppError> {
    if resource.owner_id() == acting_user_id {
        Ok(())
    } else {
        Err(AppError::NotOwner)
    }
}
