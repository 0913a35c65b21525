use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{FieldViolation, ValidationError};
use crate::models::Customer;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w!#$%&'*+/=?^`{|}~-]+(?:\.[\w!#$%&'*+/=?^`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$")
        .expect("Invalid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("Invalid phone regex"));

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;

/// Validator for customer records.
pub struct Validator;

impl Validator {
    /// Validate name: non-blank, 2 to 50 characters.
    pub fn validate_name(name: &str) -> Result<(), FieldViolation> {
        if name.trim().is_empty() {
            return Err(FieldViolation::new("name", "must not be blank"));
        }
        let len = name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
            return Err(FieldViolation::new(
                "name",
                format!(
                    "size must be between {} and {} (was {})",
                    NAME_MIN_LEN, NAME_MAX_LEN, len
                ),
            ));
        }
        Ok(())
    }

    /// Validate optional email. Absent or empty passes.
    pub fn validate_email(email: Option<&str>) -> Result<(), FieldViolation> {
        match email {
            Some(e) if !e.is_empty() && !EMAIL_RE.is_match(e) => Err(FieldViolation::new(
                "email",
                "must be a well-formed email address",
            )),
            _ => Ok(()),
        }
    }

    /// Validate optional phone. If present, must be exactly 10 digits.
    pub fn validate_phone(phone: Option<&str>) -> Result<(), FieldViolation> {
        match phone {
            Some(p) if !PHONE_RE.is_match(p) => {
                Err(FieldViolation::new("phone", "must be exactly 10 digits"))
            }
            _ => Ok(()),
        }
    }

    /// Validate a required free-text field.
    pub fn validate_not_blank(field: &'static str, value: &str) -> Result<(), FieldViolation> {
        if value.trim().is_empty() {
            return Err(FieldViolation::new(field, "must not be blank"));
        }
        Ok(())
    }

    /// Collect every violation on a customer.
    pub fn violations(customer: &Customer) -> Vec<FieldViolation> {
        [
            Self::validate_name(&customer.name),
            Self::validate_email(customer.email.as_deref()),
            Self::validate_phone(customer.phone.as_deref()),
            Self::validate_not_blank("address", &customer.address),
            Self::validate_not_blank("companyName", &customer.company_name),
            Self::validate_not_blank("industryType", &customer.industry_type),
            Self::validate_not_blank("customerStatus", &customer.customer_status),
            Self::validate_not_blank("accountManager", &customer.account_manager),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    /// Validate a complete customer record.
    pub fn validate_customer(customer: &Customer) -> Result<(), ValidationError> {
        let violations = Self::violations(customer);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }

    /// Validate a batch. Field names are prefixed with the entry's position,
    /// e.g. `[1].phone`.
    pub fn validate_batch(customers: &[Customer]) -> Result<(), ValidationError> {
        Self::validate_entries(customers.iter().enumerate())
    }

    /// Validate selected batch entries, keyed by their position in the batch.
    pub fn validate_entries<'a>(
        entries: impl IntoIterator<Item = (usize, &'a Customer)>,
    ) -> Result<(), ValidationError> {
        let violations: Vec<FieldViolation> = entries
            .into_iter()
            .flat_map(|(i, c)| {
                Self::violations(c).into_iter().map(move |v| {
                    FieldViolation::new(format!("[{}].{}", i, v.field), v.message)
                })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}
