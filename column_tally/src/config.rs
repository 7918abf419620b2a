// ********* Counting data structures ***********

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::Display;

/// A counter that remembers the order in which keys were first seen.
///
/// Reports list entries by decreasing count and fall back on the first-seen
/// order for ties, so the insertion order has to be kept around.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TallyCounts {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl TallyCounts {
    pub fn new() -> TallyCounts {
        TallyCounts::default()
    }

    pub fn add(&mut self, key: &str, n: u64) {
        match self.index.get(key) {
            Some(idx) => {
                let count = &mut self.entries[*idx].1;
                *count = count.saturating_add(n);
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), n));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|idx| self.entries[*idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0, |acc: u64, (_, c)| acc.saturating_add(*c))
    }

    /// The entries, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, u64)> {
        self.entries.iter()
    }

    /// The entries by decreasing count. Ties keep the first-seen order.
    pub fn most_common(&self) -> Vec<(String, u64)> {
        let mut res = self.entries.clone();
        res.sort_by(|a, b| b.1.cmp(&a.1));
        res
    }
}

/// An amount of money, stored in cents.
///
/// Amounts are rounded to the nearest cent, so `12.347` is shown as `12.35` and
/// amounts closer than a cent share the same bucket.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct Price(pub u64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_whole(units: u64) -> Price {
        Price(units * 100)
    }

    pub fn from_amount(amount: f64) -> Price {
        if amount.is_finite() && amount > 0.0 {
            Price((amount * 100.0).round() as u64)
        } else {
            Price::ZERO
        }
    }

    pub fn is_whole(&self) -> bool {
        self.0 % 100 == 0
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.0 / 100)
        } else {
            // f64 formatting drops the trailing zero: 12.50 -> 12.5
            write!(f, "{}", self.0 as f64 / 100.0)
        }
    }
}

/// One product entry of a products cell, such as
/// `Conference Registration (Amount: 20.00 USD, Quantity: 1)`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LineItem {
    pub name: String,
    pub price: Price,
    pub quantity: u64,
    pub registration_type: String,
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RegistrationSummary {
    pub total_rows: u64,
    pub total_registrations: u64,
    /// Rows with some content in which no line item was recognized.
    pub rows_without_matches: u64,
    /// The fixed price points, always reported.
    pub price_points: Vec<(Price, u64)>,
    /// All the other prices, in increasing order.
    pub other_prices: Vec<(Price, u64)>,
    /// Counts by `"{name} - {registration type}"`, by decreasing count.
    pub breakdown: Vec<(String, u64)>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CommitteeSummary {
    pub threshold: u64,
    pub total_rows: u64,
    pub total_registrations: u64,
    /// The groups with a weighted count above the threshold, by decreasing count.
    pub listed: Vec<(String, u64)>,
    pub listed_total: u64,
    pub yes_unspecified: u64,
    pub not_specified: u64,
    /// Groups mentioned with a weight of exactly one.
    pub dissimilar: u64,
    /// Groups seen more than once but fewer times than the threshold.
    pub below_threshold: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SimilarityGroup {
    /// The root value comes first, then the values it absorbed.
    pub members: Vec<(String, u64)>,
}

impl SimilarityGroup {
    pub fn total(&self) -> u64 {
        self.members
            .iter()
            .fold(0, |acc: u64, (_, c)| acc.saturating_add(*c))
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct SimilaritySummary {
    pub total_rows: u64,
    pub non_empty: u64,
    pub cutoff: f64,
    pub top_matches: Vec<(String, u64)>,
    pub groups: Vec<SimilarityGroup>,
}

/// Errors that prevent an analysis from completing.
#[derive(PartialEq, Debug, Clone)]
pub enum TallyErrors {
    /// The similarity cutoff must be a ratio between 0 and 1.
    InvalidCutoff(f64),
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::InvalidCutoff(c) => {
                write!(f, "similarity cutoff must be within [0, 1], got {}", c)
            }
        }
    }
}

// ********* Configuration **********

pub const NOT_SPECIFIED: &str = "Not Specified / Not a YPAA";
pub const YES_UNSPECIFIED: &str = "Yes, Unspecified Group";
pub const HOST_ADVISORY: &str = "Host / Advisory (Unspecified YPAA)";

/// The price points that are always reported, in whole units.
pub const PRICE_POINTS: [u64; 7] = [0, 20, 25, 30, 35, 40, 50];

/// Variations and typos mapped to the committee name they stand for.
/// The order matters: substring matching takes the first hit.
pub const DEFAULT_ALIASES: [(&str, &str); 19] = [
    ("SALTYPAA", "UCYPAA"),
    ("SLUTYPAA", "UCYPAA"),
    ("SLTYPAA", "UCYPAA"),
    ("UCPAA", "UCYPAA"),
    ("BUTTEY", "BUTTEYPAA"),
    ("WAC", "WACYPAA"),
    ("WACY", "WACYPAA"),
    ("SACY", "SACYPAA"),
    ("RENVY", "RENVYPAA"),
    ("RENYPAA", "RENVYPAA"),
    ("SWAC", "SWACYPAA"),
    ("SWACYPA", "SWACYPAA"),
    ("BURQUYPAA", "BURQYPAA"),
    ("BURQYPQAA", "BURQYPAA"),
    ("NACYPA", "NACYPAA"),
    ("CCPAA", "CCYPAA"),
    ("BELLYPA", "BELLYPAA"),
    ("BACY", "BACYPAA"),
    ("TITY", "TITYPAA"),
];

pub const DEFAULT_NO_RESPONSES: [&str; 16] = [
    "",
    "nan",
    "no",
    "nope",
    "not yet",
    "not right now",
    "maybe",
    "not currently",
    "not at this time",
    "hell no",
    "naur",
    "n",
    "not yet!",
    "not this year",
    "there isnt one near me :(",
    "negative/supporter/cheerleader",
];

pub const DEFAULT_YES_RESPONSES: [&str; 5] = ["yes", "why yes i am", "yes .", "yea", "yes!"];

/// The alias table and the answer sets used to normalize committee names.
///
/// The answer sets are compared against the trimmed, lowercased answer.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CommitteeRules {
    pub aliases: Vec<(String, String)>,
    pub no_responses: HashSet<String>,
    pub yes_responses: HashSet<String>,
}

impl CommitteeRules {
    pub fn empty() -> CommitteeRules {
        CommitteeRules {
            aliases: Vec::new(),
            no_responses: HashSet::new(),
            yes_responses: HashSet::new(),
        }
    }

    /// Adds aliases after the existing ones. Aliases are stored uppercased,
    /// canonical names as given.
    pub fn add_aliases(&mut self, aliases: &[(String, String)]) {
        for (alias, canonical) in aliases {
            self.aliases
                .push((alias.trim().to_uppercase(), canonical.trim().to_string()));
        }
    }

    pub fn add_no_responses(&mut self, answers: &[String]) {
        self.no_responses
            .extend(answers.iter().map(|s| s.trim().to_lowercase()));
    }

    pub fn add_yes_responses(&mut self, answers: &[String]) {
        self.yes_responses
            .extend(answers.iter().map(|s| s.trim().to_lowercase()));
    }
}

impl Default for CommitteeRules {
    fn default() -> CommitteeRules {
        CommitteeRules {
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(a, c)| (a.to_string(), c.to_string()))
                .collect(),
            no_responses: DEFAULT_NO_RESPONSES.iter().map(|s| s.to_string()).collect(),
            yes_responses: DEFAULT_YES_RESPONSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct GroupingRules {
    /// Minimum similarity ratio for two values to land in the same group.
    pub cutoff: f64,
    /// Number of exact matches to report.
    pub top: usize,
}

impl GroupingRules {
    pub const DEFAULT_RULES: GroupingRules = GroupingRules {
        cutoff: 0.8,
        top: 10,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_keep_first_seen_order_on_ties() {
        let mut c = TallyCounts::new();
        c.add("b", 1);
        c.add("a", 2);
        c.add("c", 1);
        c.add("b", 1);
        assert_eq!(c.get("b"), Some(2));
        assert_eq!(c.total(), 5);
        assert_eq!(
            c.most_common(),
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn price_display() {
        assert_eq!(Price::from_amount(20.0).to_string(), "20");
        assert_eq!(Price::from_amount(12.5).to_string(), "12.5");
        assert_eq!(Price::from_amount(0.0).to_string(), "0");
        assert_eq!(Price::from_amount(3.05).to_string(), "3.05");
        assert_eq!(Price::from_whole(35), Price(3500));
        assert_eq!(Price::from_amount(12.347).to_string(), "12.35");
        assert_eq!(Price::from_amount(12.3449), Price::from_amount(12.3351));
    }

    #[test]
    fn counts_saturate() {
        let mut c = TallyCounts::new();
        c.add("a", u64::MAX);
        c.add("a", 1);
        c.add("b", 1);
        assert_eq!(c.get("a"), Some(u64::MAX));
        assert_eq!(c.total(), u64::MAX);
    }

    #[test]
    fn default_rules_are_normalized() {
        let rules = CommitteeRules::default();
        assert_eq!(rules.aliases.len(), 19);
        assert_eq!(rules.aliases[5], ("WAC".to_string(), "WACYPAA".to_string()));
        assert!(rules.no_responses.contains(""));
        assert!(rules.yes_responses.contains("yes!"));
    }
}
