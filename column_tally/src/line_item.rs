//! Parsing of the products cell of a transaction export.
//!
//! A cell holds one product per line, each written as
//! `Name (Amount: 20.00 USD, Quantity: 1, Registration Type: Regular)`,
//! possibly followed by `Total:` and `Transaction ID:` lines.

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::num::IntErrorKind;

use crate::config::{LineItem, Price};

pub const UNSPECIFIED_TYPE: &str = "Unspecified";

static LINE_ITEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(.*?)\s*\(Amount:\s*([\d\.]+).*?, Quantity:\s*(\d+)(?:, Registration Type:\s*([^,)]+))?.*?\)",
    )
    .unwrap()
});

// Committee weights only need the name and the quantity: the amount may be written
// in any form.
static WEIGHT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(.*?)\s*\(Amount:.*?, Quantity:\s*(\d+)(?:, Registration Type:\s*(.*?))?.*?\)")
        .unwrap()
});

/// Parses a quantity made of digits. Quantities too large for a u64 are clamped.
fn parse_quantity(digits: &str) -> u64 {
    match digits.parse::<u64>() {
        Ok(q) => q,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
            warn!("parse_quantity: {:?} clamped to {}", digits, u64::MAX);
            u64::MAX
        }
        Err(e) => {
            warn!("parse_quantity: cannot read {:?}: {}", digits, e);
            0
        }
    }
}

fn product_lines(cell: &str) -> impl Iterator<Item = &str> {
    cell.split('\n')
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with("Total:") && !l.starts_with("Transaction ID:"))
}

/// Parses a single product line. Returns None if the line does not look like a product.
pub fn parse_line_item(line: &str) -> Option<LineItem> {
    let caps = LINE_ITEM_REGEX.captures(line)?;
    let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
    // The amount pattern also accepts things like "1.2.3": count those as free.
    let price = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(Price::from_amount)
        .unwrap_or(Price::ZERO);
    let quantity = parse_quantity(caps.get(3)?.as_str());
    let registration_type = caps
        .get(4)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| UNSPECIFIED_TYPE.to_string());
    Some(LineItem {
        name: name.to_string(),
        price,
        quantity,
        registration_type,
    })
}

/// All the products found in a cell.
pub fn line_items(cell: &str) -> Vec<LineItem> {
    product_lines(cell)
        .filter_map(|l| {
            let item = parse_line_item(l);
            if item.is_none() {
                debug!("line_items: no product in line {:?}", l);
            }
            item
        })
        .collect()
}

/// Only the products with `Registration` in their name count as registrations.
pub fn is_registration(item: &LineItem) -> bool {
    item.name.contains("Registration")
}

/// The number of registrations purchased in a products cell.
pub fn registration_quantity(cell: &str) -> u64 {
    line_items(cell)
        .iter()
        .filter(|item| is_registration(item))
        .fold(0, |acc, item| acc.saturating_add(item.quantity))
}

/// The weight of a row in the committee counts: its number of registrations.
///
/// Unlike [registration_quantity], the amount is not read, so lines such as
/// `Registration (Amount: $20.00, Quantity: 2)` still count.
pub fn registration_weight(cell: &str) -> u64 {
    product_lines(cell)
        .filter_map(|l| WEIGHT_REGEX.captures(l))
        .filter(|caps| caps[1].trim().contains("Registration"))
        .fold(0, |acc, caps| acc.saturating_add(parse_quantity(&caps[2])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(line: &str, name: &str, price: Price, quantity: u64, registration_type: &str) {
        let item = parse_line_item(line);
        assert_eq!(
            item,
            Some(LineItem {
                name: name.to_string(),
                price,
                quantity,
                registration_type: registration_type.to_string(),
            }),
            "line: {:?}",
            line
        );
    }

    #[test]
    fn standard_line() {
        check(
            "WACYPAA 27 Registration (Amount: 20.00 USD, Quantity: 1)",
            "WACYPAA 27 Registration",
            Price::from_whole(20),
            1,
            "Unspecified",
        );
        check(
            "WACYPAA 27 Registration (Amount: 25.00 USD, Quantity: 1)",
            "WACYPAA 27 Registration",
            Price::from_whole(25),
            1,
            "Unspecified",
        );
    }

    #[test]
    fn with_registration_type() {
        check(
            "WACYPAA 27 Registration (Amount: 35.00 USD, Quantity: 2, Registration Type: Scholarship)",
            "WACYPAA 27 Registration",
            Price::from_whole(35),
            2,
            "Scholarship",
        );
    }

    #[test]
    fn zero_and_decimal_amounts() {
        check(
            "Scholarship Donation (Amount: 0.00 USD, Quantity: 1)",
            "Scholarship Donation",
            Price::ZERO,
            1,
            "Unspecified",
        );
        check(
            "Merch (Amount: 12.50 USD, Quantity: 1)",
            "Merch",
            Price(1250),
            1,
            "Unspecified",
        );
    }

    #[test]
    fn weird_spacing() {
        check(
            " Weird Spaced Registration  (Amount:  50.00   USD, Quantity:  1 )",
            "Weird Spaced Registration",
            Price::from_whole(50),
            1,
            "Unspecified",
        );
    }

    #[test]
    fn other_trailing_field() {
        check(
            "Product (Amount: 10.00 USD, Quantity: 1, some other field: value)",
            "Product",
            Price::from_whole(10),
            1,
            "Unspecified",
        );
    }

    #[test]
    fn unparseable_amount_is_free() {
        check(
            "Odd Registration (Amount: 1.2.3 USD, Quantity: 4)",
            "Odd Registration",
            Price::ZERO,
            4,
            "Unspecified",
        );
    }

    #[test]
    fn not_a_product() {
        assert_eq!(parse_line_item("Thanks for registering!"), None);
        assert_eq!(parse_line_item("Item (Amount: free, Quantity: 1)"), None);
    }

    #[test]
    fn huge_quantities_are_clamped() {
        let item = parse_line_item("Registration (Amount: 20.00 USD, Quantity: 99999999999999999999)");
        assert_eq!(item.map(|i| i.quantity), Some(u64::MAX));
        let cell = "Registration (Amount: 20.00 USD, Quantity: 18446744073709551615)\n\
                    Registration (Amount: 20.00 USD, Quantity: 1)";
        assert_eq!(registration_quantity(cell), u64::MAX);
        assert_eq!(registration_weight(cell), u64::MAX);
    }

    #[test]
    fn weight_ignores_the_amount_format() {
        assert_eq!(
            registration_weight("WACYPAA 27 Registration (Amount: $20.00 USD, Quantity: 2)"),
            2
        );
        assert_eq!(
            registration_weight("WACYPAA 27 Registration (Amount: USD 20.00, Quantity: 3)"),
            3
        );
        // The registration counter still needs a plain number.
        assert_eq!(
            registration_quantity("WACYPAA 27 Registration (Amount: $20.00 USD, Quantity: 2)"),
            0
        );
        let cell = "Conference Registration (Amount: 20.00 USD, Quantity: 2, Registration Type: Regular)\n\
                    T-Shirt (Amount: 15.00 USD, Quantity: 4)\n\
                    Total: 55.00 USD";
        assert_eq!(registration_weight(cell), 2);
    }

    #[test]
    fn multi_line_cell() {
        let cell = "Conference Registration (Amount: 20.00 USD, Quantity: 2)\n\
                    T-Shirt (Amount: 15.00 USD, Quantity: 1)\n\
                    \n\
                    Total: 55.00 USD\n\
                    Transaction ID: 12345 (Amount: 1.00 USD, Quantity: 9)";
        let items = line_items(cell);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "T-Shirt");
        assert_eq!(registration_quantity(cell), 2);
    }
}
