//! Field validators for member input.
//!
//! Each validator trims and normalises one raw field and either returns the
//! validated newtype or a [`MemberError::InvalidField`] naming the field, the
//! raw value and the rule it broke. Validators are pure and perform no I/O.

use std::sync::OnceLock;

use regex::Regex;

use super::error::{FieldViolation, MemberError, MemberField};
use super::member::{EmailAddress, MemberChanges, MemberName, MemberPatch, NewMember, PhoneNumber};

/// Minimum name length after trimming.
pub const NAME_MIN_LEN: usize = 2;
/// Maximum name length after trimming.
pub const NAME_MAX_LEN: usize = 100;
/// Maximum email length after trimming (RFC 5321).
pub const EMAIL_MAX_LEN: usize = 254;
/// Maximum stored phone length, formatting included.
pub const PHONE_MAX_LEN: usize = 20;
/// Minimum digit count once formatting is stripped.
pub const PHONE_MIN_DIGITS: usize = 8;
/// Maximum digit count once formatting is stripped (ITU-T E.164).
pub const PHONE_MAX_DIGITS: usize = 15;

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        // Length is enforced separately; this constrains allowed characters.
        Regex::new(r"^[a-zA-Z0-9\s\-'.]+$")
            .unwrap_or_else(|error| panic!("name regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn is_phone_formatting(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '(' | ')' | '+' | '.')
}

/// Validate and trim a member name.
///
/// # Examples
/// ```
/// use member_directory::domain::validation::validate_name;
///
/// let name = validate_name("  Ada Lovelace ").expect("valid name");
/// assert_eq!(name.as_str(), "Ada Lovelace");
/// ```
pub fn validate_name(raw: &str) -> Result<MemberName, MemberError> {
    let invalid = |reason| MemberError::invalid_field(MemberField::Name, raw, reason);

    if raw.is_empty() {
        return Err(invalid(FieldViolation::Required));
    }

    let normalized = raw.trim();
    if normalized.is_empty() {
        return Err(invalid(FieldViolation::Empty));
    }

    let length = normalized.chars().count();
    if length < NAME_MIN_LEN {
        return Err(invalid(FieldViolation::TooShort { min: NAME_MIN_LEN }));
    }
    if length > NAME_MAX_LEN {
        return Err(invalid(FieldViolation::TooLong { max: NAME_MAX_LEN }));
    }

    if !name_regex().is_match(normalized) {
        return Err(invalid(FieldViolation::InvalidCharacters));
    }

    Ok(MemberName::from_normalized(normalized.to_owned()))
}

/// Validate, trim and lower-case an email address.
///
/// Idempotent on accepted input: validating an already validated address
/// returns the same value.
///
/// # Examples
/// ```
/// use member_directory::domain::validation::validate_email;
///
/// let email = validate_email(" JOHN@Example.COM ").expect("valid email");
/// assert_eq!(email.as_str(), "john@example.com");
/// ```
pub fn validate_email(raw: &str) -> Result<EmailAddress, MemberError> {
    let invalid = |reason| MemberError::invalid_field(MemberField::Email, raw, reason);

    if raw.is_empty() {
        return Err(invalid(FieldViolation::Required));
    }

    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(invalid(FieldViolation::Empty));
    }
    if normalized.chars().count() > EMAIL_MAX_LEN {
        return Err(invalid(FieldViolation::TooLong { max: EMAIL_MAX_LEN }));
    }
    if !email_regex().is_match(&normalized) {
        return Err(invalid(FieldViolation::InvalidFormat));
    }
    if normalized.contains("..") {
        return Err(invalid(FieldViolation::ConsecutiveDots));
    }
    if normalized.starts_with('.') || normalized.ends_with('.') {
        return Err(invalid(FieldViolation::LeadingOrTrailingDot));
    }

    Ok(EmailAddress::from_normalized(normalized))
}

/// Validate an optional phone number.
///
/// Missing, empty and whitespace-only input is treated as "no phone" and
/// yields `Ok(None)`. Accepted numbers keep the caller's formatting.
///
/// # Examples
/// ```
/// use member_directory::domain::validation::validate_phone;
///
/// let phone = validate_phone(Some(" +62 812-3456-7890 ")).expect("valid phone");
/// assert_eq!(phone.expect("present").as_str(), "+62 812-3456-7890");
/// assert_eq!(validate_phone(Some("   ")).expect("blank is absent"), None);
/// ```
pub fn validate_phone(raw: Option<&str>) -> Result<Option<PhoneNumber>, MemberError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let invalid = |reason| MemberError::invalid_field(MemberField::Phone, raw, reason);

    let normalized = raw.trim();
    if normalized.is_empty() {
        return Ok(None);
    }
    if normalized.chars().count() > PHONE_MAX_LEN {
        return Err(invalid(FieldViolation::TooLong { max: PHONE_MAX_LEN }));
    }

    let digits: String = normalized
        .chars()
        .filter(|c| !is_phone_formatting(*c))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(FieldViolation::InvalidCharacters));
    }

    let digit_count = digits.len();
    if digit_count < PHONE_MIN_DIGITS {
        return Err(invalid(FieldViolation::TooFewDigits {
            min: PHONE_MIN_DIGITS,
        }));
    }
    if digit_count > PHONE_MAX_DIGITS {
        return Err(invalid(FieldViolation::TooManyDigits {
            max: PHONE_MAX_DIGITS,
        }));
    }

    Ok(Some(PhoneNumber::from_normalized(normalized.to_owned())))
}

/// Validate every field of a new member, name first, then email, then phone.
///
/// The first failing field short-circuits the rest.
pub fn validate_all(
    name: &str,
    email: &str,
    phone: Option<&str>,
) -> Result<NewMember, MemberError> {
    let name = validate_name(name)?;
    let email = validate_email(email)?;
    let phone = validate_phone(phone)?;
    Ok(NewMember { name, email, phone })
}

/// Validate only the fields present in a partial update.
///
/// Validation is all-or-nothing: either every supplied field is valid and a
/// complete change-set is returned, or the first failure is reported and
/// nothing is applied. A supplied phone that normalises to absent clears the
/// stored number.
pub fn validate_changes(patch: &MemberPatch) -> Result<MemberChanges, MemberError> {
    let name = patch.name.as_deref().map(validate_name).transpose()?;
    let email = patch.email.as_deref().map(validate_email).transpose()?;
    let phone = match patch.phone.as_deref() {
        Some(raw) => Some(validate_phone(Some(raw))?),
        None => None,
    };
    Ok(MemberChanges { name, email, phone })
}
