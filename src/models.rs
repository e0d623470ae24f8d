//! Frontend Models
//!
//! Domain entities come from `order-core`; this module adds display helpers.

pub use order_core::{
    Customer, LineItem, RecordId, ServiceCatalogEntry, ServiceOrder, TagAssociation, TagDefinition,
    TagKind,
};

use rust_decimal::Decimal;

/// `1234.5` -> `1,234.50`
pub fn format_money(value: &Decimal) -> String {
    let rounded = value.round_dp(2);
    let text = format!("{:.2}", rounded);
    let (sign, text) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, cents) = text.split_once('.').unwrap_or((text, "00"));
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}.{}", sign, grouped, cents)
}

/// One-line address for list rows
pub fn address_line(order: &ServiceOrder) -> String {
    let a = &order.address;
    [a.street.as_str(), a.district.as_str(), a.city.as_str(), a.state.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(&Decimal::new(12345, 1)), "1,234.50");
        assert_eq!(format_money(&Decimal::new(99, 0)), "99.00");
        assert_eq!(format_money(&Decimal::new(-1000000, 2)), "-10,000.00");
    }
}
