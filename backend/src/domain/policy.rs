//! Authorization policy: pure decisions over users, actions, and ownership.
//!
//! Every function here is side-effect free and fails closed. The role set
//! is a closed enumeration, so the match arms below are exhaustive by
//! construction; an unknown role can never reach these checks.

use crate::domain::user::{Role, User, UserId};

/// Whether the user may list every record rather than only their own.
pub fn can_list_all(user: &User) -> bool {
    matches!(user.role(), Role::Hod)
}

/// Whether the user may approve or reject records.
///
/// Denial is a Forbidden outcome for an authenticated caller, distinct
/// from an unauthenticated one.
pub fn can_approve(user: &User) -> bool {
    matches!(user.role(), Role::Hod)
}

/// Whether the user may delete the record owned by `owner`.
pub fn can_mutate(user: &User, owner: &UserId) -> bool {
    matches!(user.role(), Role::Hod) || user.id() == owner
}

/// Whether the user may create records.
///
/// Both roles may upload; the account must still be approved, so an
/// account revoked mid-session loses the ability to create.
pub fn can_create(user: &User) -> bool {
    user.approved()
}

#[cfg(test)]
mod tests {
    //! Role and ownership decision matrix.
    use rstest::rstest;

    use super::*;
    use crate::domain::user::{DisplayName, EmailAddress, Role, User, UserId};

    fn user_with(role: Role, approved: bool) -> User {
        User::new(
            UserId::random(),
            DisplayName::new("Test User").expect("valid display name"),
            EmailAddress::new("user@demo.local").expect("valid email"),
            role,
            None,
            approved,
        )
    }

    #[rstest]
    #[case(Role::Hod, true)]
    #[case(Role::Staff, false)]
    fn only_hod_lists_all(#[case] role: Role, #[case] allowed: bool) {
        assert_eq!(can_list_all(&user_with(role, true)), allowed);
    }

    #[rstest]
    #[case(Role::Hod, true)]
    #[case(Role::Staff, false)]
    fn only_hod_approves(#[case] role: Role, #[case] allowed: bool) {
        assert_eq!(can_approve(&user_with(role, true)), allowed);
    }

    #[rstest]
    #[case(Role::Hod, false, true)]
    #[case(Role::Hod, true, true)]
    #[case(Role::Staff, true, true)]
    #[case(Role::Staff, false, false)]
    fn mutation_requires_hod_or_ownership(
        #[case] role: Role,
        #[case] owns_record: bool,
        #[case] allowed: bool,
    ) {
        let user = user_with(role, true);
        let owner = if owns_record {
            user.id().clone()
        } else {
            UserId::random()
        };
        assert_eq!(can_mutate(&user, &owner), allowed);
    }

    #[rstest]
    #[case(Role::Hod, true, true)]
    #[case(Role::Staff, true, true)]
    #[case(Role::Hod, false, false)]
    #[case(Role::Staff, false, false)]
    fn creation_requires_an_approved_account(
        #[case] role: Role,
        #[case] approved: bool,
        #[case] allowed: bool,
    ) {
        assert_eq!(can_create(&user_with(role, approved)), allowed);
    }
}
