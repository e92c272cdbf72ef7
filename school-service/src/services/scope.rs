//! Institution scope selection.
//!
//! Picks exactly one active institution id per request. The decision
//! table is security relevant: branch 2 (explicit-but-rejected header)
//! falls back through the system-wide default, branch 3 (no header)
//! deliberately does not, so a caller who never chose an institution is
//! never handed system-wide data. Keep the asymmetry.

use uuid::Uuid;

use crate::models::Role;

/// The client's preferred-institution signal, as read from the
/// `x-institution-id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredInstitution {
    /// Header not supplied at all.
    Absent,
    /// Header supplied but not a parseable id.
    Invalid,
    /// Header supplied with a parseable id.
    Id(Uuid),
}

impl PreferredInstitution {
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            None => PreferredInstitution::Absent,
            Some(raw) => match raw.trim().parse::<Uuid>() {
                Ok(id) => PreferredInstitution::Id(id),
                Err(_) => PreferredInstitution::Invalid,
            },
        }
    }
}

/// Resolve the active institution for a request.
///
/// `accessible` is the caller's accessible-institution set in stable
/// order (primary institution first, then explicit links).
pub fn select_active_institution(
    role: Role,
    preferred: PreferredInstitution,
    primary: Option<Uuid>,
    accessible: &[Uuid],
    system_active: Option<Uuid>,
) -> Option<Uuid> {
    match preferred {
        // Branch 1: honored header. Admins may address any institution
        // by id; everyone else must be entitled to it (membership or
        // the system-wide active institution).
        PreferredInstitution::Id(id)
            if role == Role::Admin
                || accessible.contains(&id)
                || system_active == Some(id) =>
        {
            Some(id)
        }
        // Branch 2: explicit but rejected (or unparseable) header.
        // Fall back to something usable, including the system-wide
        // default as a last resort.
        PreferredInstitution::Id(_) | PreferredInstitution::Invalid => primary
            .or_else(|| accessible.first().copied())
            .or(system_active),
        // Branch 3: no header. Never guess the system-wide default.
        PreferredInstitution::Absent => primary.or_else(|| accessible.first().copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_header_honored_for_member() {
        let v = ids(2);
        let active = select_active_institution(
            Role::Teacher,
            PreferredInstitution::Id(v[1]),
            Some(v[0]),
            &v,
            None,
        );
        assert_eq!(active, Some(v[1]));
    }

    #[test]
    fn test_header_honored_for_system_active() {
        let v = ids(2);
        let system = Uuid::new_v4();
        let active = select_active_institution(
            Role::Teacher,
            PreferredInstitution::Id(system),
            Some(v[0]),
            &v,
            Some(system),
        );
        assert_eq!(active, Some(system));
    }

    #[test]
    fn test_admin_bypasses_membership() {
        let foreign = Uuid::new_v4();
        let active = select_active_institution(
            Role::Admin,
            PreferredInstitution::Id(foreign),
            None,
            &[],
            None,
        );
        assert_eq!(active, Some(foreign));
    }

    #[test]
    fn test_rejected_header_falls_back_to_primary() {
        let v = ids(2);
        let foreign = Uuid::new_v4();
        let active = select_active_institution(
            Role::Teacher,
            PreferredInstitution::Id(foreign),
            Some(v[0]),
            &v,
            None,
        );
        assert_eq!(active, Some(v[0]));
    }

    #[test]
    fn test_rejected_header_falls_back_to_first_accessible() {
        let v = ids(2);
        let foreign = Uuid::new_v4();
        let active = select_active_institution(
            Role::Teacher,
            PreferredInstitution::Id(foreign),
            None,
            &v,
            None,
        );
        assert_eq!(active, Some(v[0]));
    }

    #[test]
    fn test_rejected_header_falls_back_to_system_active_last() {
        let foreign = Uuid::new_v4();
        let system = Uuid::new_v4();
        let active = select_active_institution(
            Role::Teacher,
            PreferredInstitution::Id(foreign),
            None,
            &[],
            Some(system),
        );
        assert_eq!(active, Some(system));
    }

    #[test]
    fn test_unparseable_header_treated_as_rejected() {
        let v = ids(1);
        let active = select_active_institution(
            Role::Teacher,
            PreferredInstitution::from_header(Some("not-a-uuid")),
            Some(v[0]),
            &v,
            None,
        );
        assert_eq!(active, Some(v[0]));
    }

    #[test]
    fn test_no_header_uses_primary_then_accessible() {
        let v = ids(2);
        let active = select_active_institution(
            Role::Student,
            PreferredInstitution::Absent,
            None,
            &v,
            Some(Uuid::new_v4()),
        );
        assert_eq!(active, Some(v[0]));
    }

    #[test]
    fn test_no_header_never_falls_back_to_system_active() {
        let system = Uuid::new_v4();
        let active = select_active_institution(
            Role::Student,
            PreferredInstitution::Absent,
            None,
            &[],
            Some(system),
        );
        assert_eq!(active, None);
    }

    #[test]
    fn test_from_header_parsing() {
        assert_eq!(
            PreferredInstitution::from_header(None),
            PreferredInstitution::Absent
        );
        assert_eq!(
            PreferredInstitution::from_header(Some("garbage")),
            PreferredInstitution::Invalid
        );
        let id = Uuid::new_v4();
        assert_eq!(
            PreferredInstitution::from_header(Some(&id.to_string())),
            PreferredInstitution::Id(id)
        );
    }
}
