/// Field validation for the check-in wizard
///
/// Each wizard step gates its "next" action on these checks. A failed
/// check reports exactly one reason and leaves the step unchanged;
/// the visitor corrects the input and tries again.
use std::sync::LazyLock;

use regex::Regex;

/// Shape check for email addresses: local@domain.tld, no whitespace
/// and no second @ on either side. Deliberately loose beyond that.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// One reason a step transition was blocked.
///
/// The display strings are the exact notices shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter both your first name and last name.")]
    NameMissing,
    #[error("Please complete all fields.")]
    ContactIncomplete,
    #[error("Please enter a valid email address.")]
    EmailInvalid,
    #[error("Please enter a valid 10-digit phone number.")]
    PhoneInvalid,
    #[error("You must agree to the Visitor Agreement & Confidentiality Form to continue.")]
    AgreementRequired,
    #[error("Please take your photo before continuing.")]
    PhotoMissing,
}

/// Check that an email address is plausibly shaped.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check that a phone number is exactly 10 digits.
/// No formatting characters are tolerated.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit())
}

/// Gate for the name step: both names must be non-empty after trimming.
pub fn validate_name(first_name: &str, last_name: &str) -> Result<(), ValidationError> {
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(ValidationError::NameMissing);
    }
    Ok(())
}

/// Gate for the contact step.
///
/// Checks run in a fixed order and the first failure wins:
/// completeness, then email shape, then phone shape.
pub fn validate_contact(
    email: &str,
    phone: &str,
    purpose: &str,
    finding: &str,
) -> Result<(), ValidationError> {
    let email = email.trim();
    let phone = phone.trim();
    if email.is_empty() || phone.is_empty() || purpose.is_empty() || finding.trim().is_empty() {
        return Err(ValidationError::ContactIncomplete);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::EmailInvalid);
    }
    if !is_valid_phone(phone) {
        return Err(ValidationError::PhoneInvalid);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("visitor.name@example.co.uk"));
        assert!(!is_valid_email("abc"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@@b.c"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_shapes() {
        assert!(is_valid_phone("1234567890"));
        assert!(!is_valid_phone("123-456-7890"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("12345678901"));
        assert!(!is_valid_phone("12345abcde"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_name_gate() {
        assert_eq!(validate_name("Ada", "Lovelace"), Ok(()));
        assert_eq!(validate_name("", "Lovelace"), Err(ValidationError::NameMissing));
        assert_eq!(validate_name("Ada", "   "), Err(ValidationError::NameMissing));
    }

    #[test]
    fn test_contact_gate_check_order() {
        // First failing check wins: completeness before email, email before phone.
        assert_eq!(
            validate_contact("", "", "", ""),
            Err(ValidationError::ContactIncomplete)
        );
        assert_eq!(
            validate_contact("not-an-email", "bad-phone", "Meeting", "Dana"),
            Err(ValidationError::EmailInvalid)
        );
        assert_eq!(
            validate_contact("a@b.c", "bad-phone", "Meeting", "Dana"),
            Err(ValidationError::PhoneInvalid)
        );
        assert_eq!(validate_contact("a@b.c", "1234567890", "Meeting", "Dana"), Ok(()));
    }
}
