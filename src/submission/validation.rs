//! Conditional validation rules for submissions
//!
//! Rules are an ordered table of (trigger, requirement) pairs. Evaluation
//! walks the table top to bottom and stops at the FIRST violated rule,
//! reporting exactly one field — submitters correct one thing at a time,
//! and the reported field depends on table order, so the order here is part
//! of the observable behavior.
//!
//! Base requirements (service name, process flow, interaction category) are
//! checked before the conditional table, matching the original two-pass form
//! validation.

use crate::submission::form::{AccessMode, InteractionCategory, SubmissionForm};

/// A single violated rule: which field is missing and why it was required
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub field: &'static str,
    pub message: &'static str,
}

/// One conditional rule: when `trigger` holds, `satisfied` must too
struct Rule {
    field: &'static str,
    message: &'static str,
    trigger: fn(&SubmissionForm) -> bool,
    satisfied: fn(&SubmissionForm) -> bool,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// The canonical rule table, in evaluation order
static RULES: &[Rule] = &[
    Rule {
        field: "offices_count",
        message: "This field is required when Access Mode is \"Physical Only\".",
        trigger: |f| f.access_mode == AccessMode::PhysicalOnly,
        satisfied: |f| f.offices_count.is_some_and(|n| n > 0),
    },
    Rule {
        field: "kpi_details",
        message: "This field is required when \"Has KPI\" is selected.",
        trigger: |f| f.has_kpi,
        satisfied: |f| filled(&f.kpi_details),
    },
    Rule {
        field: "system_name",
        message: "This field is required when \"Supported by IT System\" is selected.",
        trigger: |f| f.supported_by_it_system,
        satisfied: |f| filled(&f.system_name),
    },
    Rule {
        field: "hosting_location",
        message: "This field is required when \"Supported by IT System\" is selected.",
        trigger: |f| f.supported_by_it_system,
        satisfied: |f| f.hosting_location.is_some(),
    },
    Rule {
        field: "funding_details",
        message: "This field is required when \"Supported by IT System\" is selected.",
        trigger: |f| f.supported_by_it_system,
        satisfied: |f| filled(&f.funding_details),
    },
    Rule {
        field: "integrated_systems",
        message: "This field is required when \"System Integrated\" is selected.",
        trigger: |f| f.system_integrated,
        satisfied: |f| filled(&f.integrated_systems),
    },
    Rule {
        field: "g2g_beneficiary_count",
        message: "This field is required when \"G2G\" is selected in Interaction Category.",
        trigger: |f| f.interaction_category.contains(&InteractionCategory::G2G),
        satisfied: |f| f.g2g_beneficiary_count.is_some(),
    },
    Rule {
        field: "customer_satisfaction_rating",
        message: "This field is required when \"Customer Satisfaction Measured\" is selected.",
        trigger: |f| f.customer_satisfaction_measured,
        satisfied: |f| filled(&f.customer_satisfaction_rating),
    },
    Rule {
        field: "standards_details",
        message: "This field is required when \"Complies with Standards\" is selected.",
        trigger: |f| f.complies_with_standards,
        satisfied: |f| filled(&f.standards_details),
    },
    Rule {
        field: "support_channels",
        message: "At least one support channel is required when \"Support Available\" is selected.",
        trigger: |f| f.support_available,
        satisfied: |f| !f.support_channels.is_empty(),
    },
];

/// Validate a submission, reporting the first violation only
pub fn validate(form: &SubmissionForm) -> Result<(), RuleViolation> {
    // Base requirements first
    if form.service_name.trim().is_empty() {
        return Err(RuleViolation {
            field: "service_name",
            message: "This field is required.",
        });
    }
    if form.interaction_category.is_empty() {
        return Err(RuleViolation {
            field: "interaction_category",
            message: "Select at least one interaction category.",
        });
    }
    if form.process_flow.trim().is_empty() {
        return Err(RuleViolation {
            field: "process_flow",
            message: "This field is required.",
        });
    }

    // Conditional rules, first violation wins
    for rule in RULES {
        if (rule.trigger)(form) && !(rule.satisfied)(form) {
            return Err(RuleViolation {
                field: rule.field,
                message: rule.message,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::form::{HostingLocation, SupportChannel};

    /// A submission that passes every rule
    fn valid_form() -> SubmissionForm {
        serde_json::from_str(
            r#"{
                "service_name": "Business Registration",
                "interaction_category": ["G2B"],
                "process_flow": "Apply, review, certificate issued",
                "access_mode": "Digital Only"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_form_passes() {
        assert_eq!(validate(&valid_form()), Ok(()));
    }

    #[test]
    fn test_base_requirements_checked_first() {
        let mut form = valid_form();
        form.service_name = "   ".into();
        // Also trip a conditional rule; the base failure must win
        form.has_kpi = true;

        let violation = validate(&form).unwrap_err();
        assert_eq!(violation.field, "service_name");
    }

    #[test]
    fn test_empty_interaction_category_rejected() {
        let mut form = valid_form();
        form.interaction_category.clear();
        assert_eq!(
            validate(&form).unwrap_err().field,
            "interaction_category"
        );
    }

    #[test]
    fn test_physical_only_requires_offices() {
        let mut form = valid_form();
        form.access_mode = AccessMode::PhysicalOnly;

        assert_eq!(validate(&form).unwrap_err().field, "offices_count");

        form.offices_count = Some(0);
        assert_eq!(validate(&form).unwrap_err().field, "offices_count");

        form.offices_count = Some(2);
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_kpi_requires_details() {
        let mut form = valid_form();
        form.has_kpi = true;
        assert_eq!(validate(&form).unwrap_err().field, "kpi_details");

        form.kpi_details = Some("Average processing time".into());
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_it_system_requires_name_hosting_and_funding() {
        let mut form = valid_form();
        form.supported_by_it_system = true;

        // Reported field follows table order as the gaps are filled in
        assert_eq!(validate(&form).unwrap_err().field, "system_name");

        form.system_name = Some("eServices Portal".into());
        assert_eq!(validate(&form).unwrap_err().field, "hosting_location");

        form.hosting_location = Some(HostingLocation::Cloud);
        assert_eq!(validate(&form).unwrap_err().field, "funding_details");

        form.funding_details = Some("Government".into());
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_integrated_requires_description() {
        let mut form = valid_form();
        form.system_integrated = true;
        assert_eq!(validate(&form).unwrap_err().field, "integrated_systems");

        form.integrated_systems = Some("National ID registry".into());
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_g2g_requires_beneficiary_count() {
        let mut form = valid_form();
        form.interaction_category = vec![InteractionCategory::G2C, InteractionCategory::G2G];
        assert_eq!(
            validate(&form).unwrap_err().field,
            "g2g_beneficiary_count"
        );

        form.g2g_beneficiary_count = Some(14);
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_satisfaction_requires_rating() {
        let mut form = valid_form();
        form.customer_satisfaction_measured = true;
        assert_eq!(
            validate(&form).unwrap_err().field,
            "customer_satisfaction_rating"
        );

        form.customer_satisfaction_rating = Some("4.2 / 5".into());
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_standards_require_details() {
        let mut form = valid_form();
        form.complies_with_standards = true;
        assert_eq!(validate(&form).unwrap_err().field, "standards_details");

        form.standards_details = Some("ISO 27001".into());
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_support_requires_channel() {
        let mut form = valid_form();
        form.support_available = true;
        assert_eq!(validate(&form).unwrap_err().field, "support_channels");

        form.support_channels = vec![SupportChannel::CallCenter];
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_first_violation_wins() {
        // Trip rules 1 and 2 at once; only offices_count is reported
        let mut form = valid_form();
        form.access_mode = AccessMode::PhysicalOnly;
        form.has_kpi = true;

        assert_eq!(validate(&form).unwrap_err().field, "offices_count");

        // Fixing the first unmasks the second
        form.offices_count = Some(3);
        assert_eq!(validate(&form).unwrap_err().field, "kpi_details");
    }

    #[test]
    fn test_whitespace_only_details_rejected() {
        let mut form = valid_form();
        form.has_kpi = true;
        form.kpi_details = Some("   ".into());
        assert_eq!(validate(&form).unwrap_err().field, "kpi_details");
    }

    #[test]
    fn test_untriggered_rules_do_not_fire() {
        // Optional dependents may stay empty when their trigger is off
        let form = valid_form();
        assert!(form.kpi_details.is_none());
        assert!(form.support_channels.is_empty());
        assert_eq!(validate(&form), Ok(()));
    }
}
