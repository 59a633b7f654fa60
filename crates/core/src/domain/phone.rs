// Phone Number Normalization

/// Normalize a user-supplied phone number for storage and rate limiting.
///
/// Rules (US-centric, matching the login form's expectations):
/// - an explicit `+` prefix wins: keep `+` plus the digits as given
/// - 10 digits: assume US, prepend `+1`
/// - 11 digits starting with 1: US with country code, prepend `+`
/// - anything else: prepend `+` to the digits as-is
pub fn normalize_phone_number(phone: &str) -> String {
    let cleaned = phone.trim();
    let has_plus = cleaned.starts_with('+');

    let digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();

    if has_plus && !digits.is_empty() {
        return format!("+{}", digits);
    }

    if digits.len() == 10 {
        return format!("+1{}", digits);
    }

    if digits.len() == 11 && digits.starts_with('1') {
        return format!("+{}", digits);
    }

    format!("+{}", digits)
}

/// Best-effort conversion of a free-form host contact into an E.164 number.
///
/// Stricter than `normalize_phone_number`: the reminder job must not text
/// something that merely looks digit-ish (an email, a street address).
/// Returns `None` unless the digit count matches a US number.
pub fn host_contact_to_e164(contact: &str) -> Option<String> {
    let digits: String = contact.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 10 {
        Some(format!("+1{}", digits))
    } else if digits.len() == 11 && digits.starts_with('1') {
        Some(format!("+{}", digits))
    } else {
        None
    }
}
