use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use aeroclub_domain::booking::Role;

/// One row of the per-role booking-form policy: whether a field is shown and
/// whether it must be filled in before the form submits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldPolicyEntry {
    pub field: String,
    pub role: Role,
    pub required: bool,
    pub visible: bool,
}

/// Role-dependent required/visible lookup for booking-form fields. Pure data:
/// administrators relax or tighten fields per role through configuration, the
/// validator just consults the table.
#[derive(Debug, Clone)]
pub struct FieldPolicySet {
    entries: HashMap<(String, Role), FieldPolicyEntry>,
}

impl FieldPolicySet {
    pub fn new(entries: Vec<FieldPolicyEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| ((e.field.clone(), e.role), e))
            .collect();
        Self { entries }
    }

    /// Unknown (field, role) pairs default to not required.
    pub fn is_field_required(&self, field: &str, role: Role) -> bool {
        self.entries
            .get(&(field.to_string(), role))
            .map(|e| e.required)
            .unwrap_or(false)
    }

    /// Unknown (field, role) pairs default to visible.
    pub fn is_field_visible(&self, field: &str, role: Role) -> bool {
        self.entries
            .get(&(field.to_string(), role))
            .map(|e| e.visible)
            .unwrap_or(true)
    }

    /// Built-in table overlaid with configured rows; an override for an
    /// existing (field, role) pair replaces the default entry.
    pub fn with_overrides(overrides: Vec<FieldPolicyEntry>) -> Self {
        let mut entries = default_policies();
        entries.extend(overrides);
        Self::new(entries)
    }

    /// Field names the given role must fill in, in a stable order.
    pub fn required_fields(&self, role: Role) -> Vec<&str> {
        let mut fields: Vec<&str> = self
            .entries
            .values()
            .filter(|e| e.role == role && e.required)
            .map(|e| e.field.as_str())
            .collect();
        fields.sort_unstable();
        fields
    }
}

impl Default for FieldPolicySet {
    fn default() -> Self {
        Self::new(default_policies())
    }
}

/// Built-in policy table. Mirrors club practice: students book through an
/// instructor and must name how the flight is paid; instructors and admins
/// can leave both open (solo slots, maintenance ferries, block bookings).
pub fn default_policies() -> Vec<FieldPolicyEntry> {
    let mut entries = Vec::new();

    for role in [Role::Admin, Role::Instructor, Role::Student] {
        for field in ["student_id", "aircraft_id", "start", "end"] {
            entries.push(FieldPolicyEntry {
                field: field.to_string(),
                role,
                required: true,
                visible: true,
            });
        }
    }

    entries.push(FieldPolicyEntry {
        field: "instructor_id".to_string(),
        role: Role::Student,
        required: true,
        visible: true,
    });
    entries.push(FieldPolicyEntry {
        field: "payment_type".to_string(),
        role: Role::Student,
        required: true,
        visible: true,
    });
    // Ops notes are an instructor/admin facility, hidden from the student form
    entries.push(FieldPolicyEntry {
        field: "notes".to_string(),
        role: Role::Student,
        required: false,
        visible: false,
    });

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookup_for_unknown_pairs() {
        let policies = FieldPolicySet::default();

        assert!(!policies.is_field_required("tail_wheel_endorsement", Role::Admin));
        assert!(policies.is_field_visible("tail_wheel_endorsement", Role::Admin));
    }

    #[test]
    fn test_student_policy_tighter_than_admin() {
        let policies = FieldPolicySet::default();

        assert!(policies.is_field_required("instructor_id", Role::Student));
        assert!(!policies.is_field_required("instructor_id", Role::Admin));

        assert!(policies.is_field_required("payment_type", Role::Student));
        assert!(!policies.is_field_required("payment_type", Role::Instructor));

        assert!(!policies.is_field_visible("notes", Role::Student));
        assert!(policies.is_field_visible("notes", Role::Instructor));
    }

    #[test]
    fn test_configured_entries_replace_defaults() {
        let policies = FieldPolicySet::new(vec![FieldPolicyEntry {
            field: "payment_type".to_string(),
            role: Role::Instructor,
            required: true,
            visible: true,
        }]);

        assert!(policies.is_field_required("payment_type", Role::Instructor));
        assert!(!policies.is_field_required("payment_type", Role::Student));
    }

    #[test]
    fn test_overrides_relax_a_default_entry() {
        let policies = FieldPolicySet::with_overrides(vec![FieldPolicyEntry {
            field: "payment_type".to_string(),
            role: Role::Student,
            required: false,
            visible: true,
        }]);

        // Relaxed by the override, while the rest of the defaults survive
        assert!(!policies.is_field_required("payment_type", Role::Student));
        assert!(policies.is_field_required("instructor_id", Role::Student));
    }

    #[test]
    fn test_required_fields_stable_order() {
        let policies = FieldPolicySet::default();
        let first = policies.required_fields(Role::Student);
        let second = policies.required_fields(Role::Student);

        assert_eq!(first, second);
        assert!(first.contains(&"instructor_id"));
        assert!(!policies.required_fields(Role::Admin).contains(&"instructor_id"));
    }
}
