use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Storage-assigned identity of a customer.
pub type CustomerId = i64;

/// Treat an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A customer account.
///
/// `customer_id` is `None` until the record has been saved; the store is the
/// only component that hands out identities. Required text fields default to
/// empty strings when missing or `null` in a payload so that validation, not
/// deserialization, reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub industry_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_manager: String,
    /// Last-modified marker supplied by the caller.
    #[serde(default)]
    pub audit: Option<DateTime<Utc>>,
}

impl Customer {
    /// Returns a copy carrying the given id.
    pub fn with_id(mut self, id: CustomerId) -> Self {
        self.customer_id = Some(id);
        self
    }

    /// Overwrite every mutable field with the values from `update`.
    /// The identity of `self` is left untouched.
    pub fn merge_from(&mut self, update: &Customer) {
        self.name = update.name.clone();
        self.email = update.email.clone();
        self.phone = update.phone.clone();
        self.address = update.address.clone();
        self.company_name = update.company_name.clone();
        self.industry_type = update.industry_type.clone();
        self.customer_status = update.customer_status.clone();
        self.account_manager = update.account_manager.clone();
        self.audit = update.audit;
    }
}
