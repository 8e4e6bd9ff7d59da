// Helper functions for safe logging and response shaping

use serde::Serialize;

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 {
            format!("{}***@{}", &parts[0][..1.min(parts[0].len())], parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
#[allow(dead_code)]
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Status/message body used by delete endpoints and the status route:
/// `{"status": 200, "msg": "Car deleted successfully."}`
#[derive(Serialize, Debug)]
pub struct StatusMessage {
    pub status: u16,
    pub msg: String,
}

impl StatusMessage {
    pub fn new(status: u16, msg: &str) -> Self {
        Self {
            status,
            msg: msg.to_string(),
        }
    }
}

/// Partial-merge normalization: a present but blank string counts as absent,
/// so it never overwrites the stored value.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("user@example.com"), "u***@example.com");
        assert_eq!(safe_email_log("ab"), "***@***.***");
        assert_eq!(safe_email_log("no-at-sign"), "***@***.***");
    }

    #[test]
    fn test_non_empty_filters_blank_values() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(
            non_empty(Some("Tesla".to_string())),
            Some("Tesla".to_string())
        );
    }
}
