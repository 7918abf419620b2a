use log::debug;
use std::collections::BTreeMap;

use crate::config::*;
use crate::line_item::{is_registration, line_items};

/// Accumulates the registrations found in the products column, one row at a time.
///
/// ```
/// use column_tally::registrations::RegistrationTally;
///
/// let mut tally = RegistrationTally::new();
/// tally.add_cell("Conference Registration (Amount: 20.00 USD, Quantity: 2)");
/// tally.add_cell("");
/// let summary = tally.finish();
/// assert_eq!(summary.total_rows, 2);
/// assert_eq!(summary.total_registrations, 2);
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RegistrationTally {
    total_rows: u64,
    total_registrations: u64,
    rows_without_matches: u64,
    breakdown: TallyCounts,
    by_price: BTreeMap<Price, u64>,
}

impl RegistrationTally {
    pub fn new() -> RegistrationTally {
        RegistrationTally::default()
    }

    pub fn add_cell(&mut self, cell: &str) {
        self.total_rows += 1;
        if cell.is_empty() {
            return;
        }

        let items = line_items(cell);
        if items.is_empty() && !cell.trim().is_empty() {
            debug!("add_cell: row {}: no product found", self.total_rows);
            self.rows_without_matches += 1;
        }

        for item in items.iter().filter(|item| is_registration(item)) {
            self.total_registrations = self.total_registrations.saturating_add(item.quantity);
            let key = format!("{} - {}", item.name, item.registration_type);
            self.breakdown.add(&key, item.quantity);
            let by_price = self.by_price.entry(item.price).or_insert(0);
            *by_price = by_price.saturating_add(item.quantity);
        }
    }

    pub fn finish(&self) -> RegistrationSummary {
        let fixed: Vec<Price> = PRICE_POINTS.iter().map(|p| Price::from_whole(*p)).collect();
        let price_points: Vec<(Price, u64)> = fixed
            .iter()
            .map(|p| (*p, self.by_price.get(p).cloned().unwrap_or(0)))
            .collect();
        // BTreeMap iteration is already in increasing price order.
        let other_prices: Vec<(Price, u64)> = self
            .by_price
            .iter()
            .filter(|(p, _)| !fixed.contains(p))
            .map(|(p, c)| (*p, *c))
            .collect();
        RegistrationSummary {
            total_rows: self.total_rows,
            total_registrations: self.total_registrations,
            rows_without_matches: self.rows_without_matches,
            price_points,
            other_prices,
            breakdown: self.breakdown.most_common(),
        }
    }
}

/// Counts the registrations over all the cells of a column.
pub fn count_registrations<'a, I>(cells: I) -> RegistrationSummary
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tally = RegistrationTally::new();
    for cell in cells {
        tally.add_cell(cell);
    }
    tally.finish()
}
