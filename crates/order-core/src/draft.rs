//! Order Draft
//!
//! Text-field state of the order form and its synchronous validation.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::backend::OrderFields;
use crate::ids::RecordId;
use crate::models::{Address, Customer, LineItem, ServiceOrder};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field-level validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// No customer was picked; tracked apart from the text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("select a customer")]
pub struct MissingCustomer;

pub fn require_customer(customer: Option<&Customer>) -> Result<&Customer, MissingCustomer> {
    customer.ok_or(MissingCustomer)
}

fn check_required(errors: &mut ValidationErrors, field: &'static str, value: &str, max: usize) {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "required");
    } else {
        check_max(errors, field, value, max);
    }
}

fn check_max(errors: &mut ValidationErrors, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("at most {} characters", max));
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

// ========================
// Order Draft
// ========================

/// Scalar order fields as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    pub address: Address,
    pub same_address: bool,
    pub has_animals: bool,
    pub has_elderly: bool,
    pub has_allergic: bool,
    pub value: String,
    pub payment_terms: String,
    pub warranty: String,
    pub notes: String,
    /// `YYYY-MM-DD`, as produced by date inputs
    pub start_date: String,
    pub finish_date: String,
}

/// Draft that passed validation, with typed values
#[derive(Debug, Clone, PartialEq)]
pub struct ValidOrder {
    pub address: Address,
    pub has_animals: bool,
    pub has_elderly: bool,
    pub has_allergic: bool,
    pub value: Decimal,
    pub payment_terms: String,
    pub warranty: String,
    pub notes: String,
    pub start_date: NaiveDate,
    pub finish_date: Option<NaiveDate>,
}

impl OrderDraft {
    /// Populate the form from a loaded order (edit mode)
    pub fn from_order(order: &ServiceOrder) -> Self {
        let same_address = order
            .customer
            .as_ref()
            .map(|customer| customer.address == order.address)
            .unwrap_or(false);
        Self {
            address: order.address.clone(),
            same_address,
            has_animals: order.has_animals,
            has_elderly: order.has_elderly,
            has_allergic: order.has_allergic,
            value: order.value.to_string(),
            payment_terms: order.payment_terms.clone(),
            warranty: order.warranty.clone(),
            notes: order.notes.clone(),
            start_date: order.start_date.format(DATE_FORMAT).to_string(),
            finish_date: order
                .finish_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ValidOrder, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let address = &self.address;

        let zip_digits = address.zip_code.chars().filter(char::is_ascii_digit).count();
        let zip_clean = address.zip_code.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '.');
        if address.zip_code.trim().is_empty() {
            errors.add("zip_code", "required");
        } else if zip_digits != crate::address::ZIP_LEN || !zip_clean {
            errors.add("zip_code", format!("must have {} digits", crate::address::ZIP_LEN));
        }
        check_required(&mut errors, "street", &address.street, 120);
        check_required(&mut errors, "district", &address.district, 60);
        check_required(&mut errors, "city", &address.city, 60);
        let state = address.state.trim();
        if state.is_empty() {
            errors.add("state", "required");
        } else if state.chars().count() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.add("state", "must be a 2-letter code");
        }

        let value = match self.value.trim() {
            "" => {
                errors.add("value", "required");
                None
            }
            raw => match Decimal::from_str(&raw.replace(',', ".")) {
                Ok(v) if v.is_sign_negative() => {
                    errors.add("value", "must not be negative");
                    None
                }
                Ok(v) => Some(v),
                Err(_) => {
                    errors.add("value", "must be a number");
                    None
                }
            },
        };

        check_max(&mut errors, "payment_terms", &self.payment_terms, 255);
        check_max(&mut errors, "warranty", &self.warranty, 255);
        check_max(&mut errors, "notes", &self.notes, 1000);

        let start_date = if self.start_date.trim().is_empty() {
            errors.add("start_date", "required");
            None
        } else {
            let parsed = parse_date(&self.start_date);
            if parsed.is_none() {
                errors.add("start_date", "invalid date");
            }
            parsed
        };

        let finish_date = if self.finish_date.trim().is_empty() {
            None
        } else {
            match parse_date(&self.finish_date) {
                None => {
                    errors.add("finish_date", "invalid date");
                    None
                }
                Some(finish) => {
                    if start_date.is_some_and(|start| finish < start) {
                        errors.add("finish_date", "must not be before the start date");
                    }
                    Some(finish)
                }
            }
        };

        let (Some(value), Some(start_date)) = (value, start_date) else {
            return Err(errors);
        };

        errors.into_result(ValidOrder {
            address: Address {
                zip_code: address.zip_code.chars().filter(char::is_ascii_digit).collect(),
                street: address.street.trim().to_string(),
                district: address.district.trim().to_string(),
                city: address.city.trim().to_string(),
                state: state.to_ascii_uppercase(),
            },
            has_animals: self.has_animals,
            has_elderly: self.has_elderly,
            has_allergic: self.has_allergic,
            value,
            payment_terms: self.payment_terms.trim().to_string(),
            warranty: self.warranty.trim().to_string(),
            notes: self.notes.trim().to_string(),
            start_date,
            finish_date,
        })
    }
}

impl ValidOrder {
    pub fn into_fields(self, customer_id: &str) -> OrderFields {
        OrderFields {
            customer_id: customer_id.to_string(),
            address: self.address,
            has_animals: self.has_animals,
            has_elderly: self.has_elderly,
            has_allergic: self.has_allergic,
            value: self.value,
            payment_terms: self.payment_terms,
            warranty: self.warranty,
            notes: self.notes,
            start_date: self.start_date,
            finish_date: self.finish_date,
        }
    }
}

// ========================
// Line Item Draft
// ========================

/// Line item editor fields
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemDraft {
    pub name: String,
    pub details: String,
    pub quantity: String,
}

impl Default for LineItemDraft {
    fn default() -> Self {
        Self { name: String::new(), details: String::new(), quantity: "1".to_string() }
    }
}

impl LineItemDraft {
    pub fn from_item(item: &LineItem) -> Self {
        Self {
            name: item.name.clone(),
            details: item.details.clone(),
            quantity: item.quantity.to_string(),
        }
    }

    /// Validate into a row carrying `id`; the changeset assigns the order index
    pub fn validate(&self, id: RecordId) -> Result<LineItem, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_required(&mut errors, "name", &self.name, 80);
        check_max(&mut errors, "details", &self.details, 255);
        let quantity = match self.quantity.trim().parse::<u32>() {
            Ok(q) if q >= 1 => q,
            _ => {
                errors.add("quantity", "must be at least 1");
                0
            }
        };
        errors.into_result(LineItem {
            id,
            name: self.name.trim().to_string(),
            details: self.details.trim().to_string(),
            quantity,
            order: 0,
            service_order_id: None,
        })
    }
}
