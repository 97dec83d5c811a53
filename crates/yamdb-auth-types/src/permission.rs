//! Permission predicates gating HTTP verbs by role and ownership.
//!
//! Every predicate has a collection-level check ([`Permission::has_permission`],
//! run before the handler touches storage) and an object-level check
//! ([`Permission::has_object_permission`], run once the target is loaded).
//! Both default to allow; each predicate overrides the one it constrains.

use http::Method;
use uuid::Uuid;

use crate::identity::Identity;

/// Whether a request only reads (`GET`, `HEAD`, `OPTIONS`) or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    pub fn is_read(self) -> bool {
        self == Self::Read
    }
}

impl From<&Method> for Access {
    fn from(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS {
            Self::Read
        } else {
            Self::Write
        }
    }
}

pub trait Permission {
    fn has_permission(&self, _actor: Option<&Identity>, _access: Access) -> bool {
        true
    }

    /// `author` is the owner of the target object, `None` when it has none.
    fn has_object_permission(
        &self,
        _actor: Option<&Identity>,
        _access: Access,
        _author: Option<Uuid>,
    ) -> bool {
        true
    }
}

fn is_author(actor: Option<&Identity>, author: Option<Uuid>) -> bool {
    matches!((actor, author), (Some(actor), Some(author)) if actor.user_id == author)
}

/// Reads always; writes only by the object's author.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOrReadOnly;

impl Permission for OwnerOrReadOnly {
    fn has_object_permission(
        &self,
        actor: Option<&Identity>,
        access: Access,
        author: Option<Uuid>,
    ) -> bool {
        access.is_read() || is_author(actor, author)
    }
}

/// Reads always; writes only by staff.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminOrReadOnly;

impl Permission for AdminOrReadOnly {
    fn has_permission(&self, actor: Option<&Identity>, access: Access) -> bool {
        access.is_read() || actor.is_some_and(|a| a.is_staff)
    }
}

/// Authenticated admins only, reads included.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminOnly;

impl Permission for AdminOnly {
    fn has_permission(&self, actor: Option<&Identity>, _access: Access) -> bool {
        actor.is_some_and(|a| a.role == yamdb_domain::user::UserRole::Admin)
    }
}

/// Reads always; writes by moderators, admins or the object's author.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOrStaffOrReadOnly;

impl Permission for OwnerOrStaffOrReadOnly {
    fn has_object_permission(
        &self,
        actor: Option<&Identity>,
        access: Access,
        author: Option<Uuid>,
    ) -> bool {
        if access.is_read() {
            return true;
        }
        match actor {
            Some(a) if a.role.is_moderator_or_admin() => true,
            Some(_) => is_author(actor, author),
            None => false,
        }
    }
}

/// Any authenticated caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

impl Permission for Authenticated {
    fn has_permission(&self, actor: Option<&Identity>, _access: Access) -> bool {
        actor.is_some()
    }
}

/// Staff accounts only.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsStaff;

impl Permission for IsStaff {
    fn has_permission(&self, actor: Option<&Identity>, _access: Access) -> bool {
        actor.is_some_and(|a| a.is_staff)
    }
}

/// Either predicate. At object level a side only counts when it also passed
/// its collection-level check.
#[derive(Debug, Clone, Copy, Default)]
pub struct Or<A, B>(pub A, pub B);

impl<A: Permission, B: Permission> Permission for Or<A, B> {
    fn has_permission(&self, actor: Option<&Identity>, access: Access) -> bool {
        self.0.has_permission(actor, access) || self.1.has_permission(actor, access)
    }

    fn has_object_permission(
        &self,
        actor: Option<&Identity>,
        access: Access,
        author: Option<Uuid>,
    ) -> bool {
        (self.0.has_permission(actor, access)
            && self.0.has_object_permission(actor, access, author))
            || (self.1.has_permission(actor, access)
                && self.1.has_object_permission(actor, access, author))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PermissionDenied {
    #[error("authentication credentials were not provided")]
    NotAuthenticated,
    #[error("you do not have permission to perform this action")]
    Forbidden,
}

fn denied(actor: Option<&Identity>) -> PermissionDenied {
    match actor {
        None => PermissionDenied::NotAuthenticated,
        Some(_) => PermissionDenied::Forbidden,
    }
}

/// Collection-level check.
pub fn authorize(
    permission: &impl Permission,
    actor: Option<&Identity>,
    access: Access,
) -> Result<(), PermissionDenied> {
    if permission.has_permission(actor, access) {
        Ok(())
    } else {
        Err(denied(actor))
    }
}

/// Object-level check against the target's author.
pub fn authorize_object(
    permission: &impl Permission,
    actor: Option<&Identity>,
    access: Access,
    author: Option<Uuid>,
) -> Result<(), PermissionDenied> {
    if permission.has_object_permission(actor, access, author) {
        Ok(())
    } else {
        Err(denied(actor))
    }
}
