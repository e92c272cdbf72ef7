//! Scoped query filter builder.
//!
//! Translates the resolved request scope into the predicate every
//! downstream query must apply. The filter can never be broader than
//! what the resolver produced, and an unresolvable scope matches zero
//! rows rather than all of them.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::Role;

/// Institution predicate for one entity family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstitutionFilter {
    /// No institution restriction (admin browsing without a selection).
    Unrestricted,
    /// Constrained strictly to one institution.
    Only(Uuid),
    /// Constrained to the caller's accessible set.
    AnyOf(Vec<Uuid>),
    /// Matches zero rows. Fail closed, never open.
    DenyAll,
}

/// Build the institution filter for a resolved request scope.
pub fn institution_filter(
    role: Role,
    active_institution_id: Option<Uuid>,
    accessible_institution_ids: &[Uuid],
) -> InstitutionFilter {
    match (role, active_institution_id) {
        // Admins browsing a specific institution still see only that
        // institution's rows.
        (_, Some(id)) => InstitutionFilter::Only(id),
        (Role::Admin, None) => InstitutionFilter::Unrestricted,
        (_, None) => {
            if accessible_institution_ids.is_empty() {
                InstitutionFilter::DenyAll
            } else {
                InstitutionFilter::AnyOf(accessible_institution_ids.to_vec())
            }
        }
    }
}

impl InstitutionFilter {
    /// Append this filter as a SQL predicate over `column` (for
    /// example `institution_id` or, transitively, `c.institution_id`).
    pub fn push_predicate(&self, qb: &mut QueryBuilder<'_, Postgres>, column: &str) {
        match self {
            InstitutionFilter::Unrestricted => {
                qb.push("TRUE");
            }
            InstitutionFilter::Only(id) => {
                qb.push(column).push(" = ").push_bind(*id);
            }
            InstitutionFilter::AnyOf(ids) => {
                qb.push(column).push(" = ANY(").push_bind(ids.clone()).push(")");
            }
            InstitutionFilter::DenyAll => {
                qb.push("FALSE");
            }
        }
    }

    /// Whether a specific institution id passes this filter. Used to
    /// validate mutations before they touch the store.
    pub fn allows(&self, institution_id: Uuid) -> bool {
        match self {
            InstitutionFilter::Unrestricted => true,
            InstitutionFilter::Only(id) => *id == institution_id,
            InstitutionFilter::AnyOf(ids) => ids.contains(&institution_id),
            InstitutionFilter::DenyAll => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_without_selection_is_unrestricted() {
        let filter = institution_filter(Role::Admin, None, &[]);
        assert_eq!(filter, InstitutionFilter::Unrestricted);
        assert!(filter.allows(Uuid::new_v4()));
    }

    #[test]
    fn test_admin_with_selection_is_constrained() {
        let id = Uuid::new_v4();
        let filter = institution_filter(Role::Admin, Some(id), &[]);
        assert_eq!(filter, InstitutionFilter::Only(id));
        assert!(!filter.allows(Uuid::new_v4()));
    }

    #[test]
    fn test_active_institution_constrains_strictly() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let filter = institution_filter(Role::Teacher, Some(id), &[id, other]);
        assert_eq!(filter, InstitutionFilter::Only(id));
        assert!(!filter.allows(other));
    }

    #[test]
    fn test_accessible_set_fallback() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let filter = institution_filter(Role::Secretary, None, &ids);
        assert_eq!(filter, InstitutionFilter::AnyOf(ids.clone()));
        assert!(filter.allows(ids[1]));
    }

    #[test]
    fn test_no_scope_fails_closed() {
        let filter = institution_filter(Role::Guardian, None, &[]);
        assert_eq!(filter, InstitutionFilter::DenyAll);
        assert!(!filter.allows(Uuid::new_v4()));
    }

    #[test]
    fn test_predicate_sql_only() {
        let id = Uuid::new_v4();
        let mut qb = QueryBuilder::new("SELECT * FROM students WHERE ");
        InstitutionFilter::Only(id).push_predicate(&mut qb, "institution_id");
        assert_eq!(qb.sql(), "SELECT * FROM students WHERE institution_id = $1");
    }

    #[test]
    fn test_predicate_sql_any_of() {
        let ids = vec![Uuid::new_v4()];
        let mut qb = QueryBuilder::new("SELECT * FROM students WHERE ");
        InstitutionFilter::AnyOf(ids).push_predicate(&mut qb, "institution_id");
        assert_eq!(
            qb.sql(),
            "SELECT * FROM students WHERE institution_id = ANY($1)"
        );
    }

    #[test]
    fn test_predicate_sql_deny_all() {
        let mut qb = QueryBuilder::new("SELECT * FROM students WHERE ");
        InstitutionFilter::DenyAll.push_predicate(&mut qb, "institution_id");
        assert_eq!(qb.sql(), "SELECT * FROM students WHERE FALSE");
    }
}
