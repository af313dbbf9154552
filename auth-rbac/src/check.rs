use crate::models::{CheckResponse, Grant, PermissionCheck};

/// Whether `grants` permit `action` on `subject`.
///
/// An empty action or subject is never permitted, so a blank value can't
/// fall through to a wildcard grant.
pub fn can_with_grants(grants: &[Grant], action: &str, subject: &str) -> bool {
    matching_grant(grants, action, subject).is_some()
}

/// First grant that permits `action` on `subject`
pub fn matching_grant<'a>(grants: &'a [Grant], action: &str, subject: &str) -> Option<&'a Grant> {
    if action.is_empty() || subject.is_empty() {
        return None;
    }
    grants.iter().find(|grant| grant.matches(action, subject))
}

/// Answer several checks against one grant set
pub fn batch_check(grants: &[Grant], checks: &[PermissionCheck]) -> Vec<CheckResponse> {
    checks
        .iter()
        .map(|check| {
            let matched = matching_grant(grants, &check.action, &check.subject);
            CheckResponse {
                allowed: matched.is_some(),
                matched_grant: matched.cloned(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manage_all_permits_everything() {
        let grants = vec![Grant::new("manage", "all")];
        assert!(can_with_grants(&grants, "delete", "user"));
        assert!(can_with_grants(&grants, "publish", "emergency"));
    }

    #[test]
    fn test_action_wildcard() {
        let grants = vec![Grant::new("*", "media")];
        assert!(can_with_grants(&grants, "publish", "media"));
        assert!(!can_with_grants(&grants, "publish", "screen"));
    }

    #[test]
    fn test_subject_mismatch() {
        let grants = vec![Grant::new("read", "media")];
        assert!(!can_with_grants(&grants, "read", "screen"));
        assert!(can_with_grants(&grants, "read", "media"));
    }

    #[test]
    fn test_empty_action_or_subject_denied() {
        let grants = vec![Grant::new("*", "*"), Grant::new("manage", "all")];
        assert!(!can_with_grants(&grants, "", "media"));
        assert!(!can_with_grants(&grants, "read", ""));
        assert!(!can_with_grants(&grants, "", ""));
    }

    #[test]
    fn test_no_grants() {
        assert!(!can_with_grants(&[], "read", "screen"));
    }

    #[test]
    fn test_batch_check_reports_matched_grant() {
        let grants = vec![Grant::new("read", "screen"), Grant::new("*", "media")];
        let responses = batch_check(
            &grants,
            &[
                PermissionCheck::new("read", "screen"),
                PermissionCheck::new("delete", "media"),
                PermissionCheck::new("delete", "schedule"),
            ],
        );

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].matched_grant, Some(Grant::new("read", "screen")));
        assert_eq!(responses[1].matched_grant, Some(Grant::new("*", "media")));
        assert!(!responses[2].allowed);
        assert!(responses[2].matched_grant.is_none());
    }
}
