//! Authorization checks run by handlers before any mutation.
//!
//! Each check compares the caller's identity with the identity that owns or is targeted by
//! the resource. A failed check is a refusal (403), never a lookup miss.

use uuid::Uuid;

use crate::error::AppError;

/// The caller must be the owner of the resource being changed.
pub fn ensure_owner(caller: Uuid, owner: Uuid, action: &str) -> Result<(), AppError> {
    if caller == owner {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "You do not have permission to {}",
            action
        )))
    }
}

/// The caller may not act on themselves (e.g. following their own account).
pub fn ensure_not_self(caller: Uuid, target: Uuid, action: &str) -> Result<(), AppError> {
    if caller == target {
        Err(AppError::Forbidden(format!("You cannot {} yourself", action)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes() {
        let id = Uuid::new_v4();
        assert!(ensure_owner(id, id, "edit this post").is_ok());
    }

    #[test]
    fn non_owner_is_forbidden_not_hidden() {
        let err = ensure_owner(Uuid::new_v4(), Uuid::new_v4(), "edit this post").unwrap_err();
        match err {
            AppError::Forbidden(msg) => assert!(msg.contains("edit this post")),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn acting_on_self_is_forbidden() {
        let id = Uuid::new_v4();
        assert!(matches!(
            ensure_not_self(id, id, "follow"),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_not_self(id, Uuid::new_v4(), "follow").is_ok());
    }
}
