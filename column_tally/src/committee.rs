//! Normalization of free-text committee answers.
//!
//! Survey answers name zero, one or several committees, with typos, nicknames and
//! all sorts of separators. Each answer is turned into a list of canonical names
//! that can be counted.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::*;
use crate::line_item::registration_weight;

static SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/,&]|\s+and\s+").unwrap());

static COMMITTEE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([a-z]*YPAA)\b").unwrap());

/// Maps a committee name to its canonical form. Unknown names are only uppercased.
pub fn normalize_committee_name(name: &str, rules: &CommitteeRules) -> String {
    let upper_name = name.to_uppercase();
    rules
        .aliases
        .iter()
        .find(|(alias, _)| *alias == upper_name)
        .map(|(_, canonical)| canonical.clone())
        .unwrap_or(upper_name)
}

/// Extracts the canonical committee names mentioned in an answer.
///
/// The result is never empty: answers that do not name any committee map to one of
/// the [NOT_SPECIFIED] or [YES_UNSPECIFIED] labels, or to the answer itself in title case.
pub fn extract_groups(raw: &str, rules: &CommitteeRules) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return vec![NOT_SPECIFIED.to_string()];
    }

    let lower = trimmed.to_lowercase();
    if rules.no_responses.contains(&lower) {
        return vec![NOT_SPECIFIED.to_string()];
    }
    if rules.yes_responses.contains(&lower) {
        return vec![YES_UNSPECIFIED.to_string()];
    }

    let mut found: Vec<String> = Vec::new();
    for part in SEPARATOR_REGEX.split(raw) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some(group) = match_part(part, rules) {
            if !found.contains(&group) {
                found.push(group);
            }
        }
    }

    if !found.is_empty() {
        return found;
    }
    if lower.contains("yes") {
        return vec![YES_UNSPECIFIED.to_string()];
    }
    debug!("extract_groups: no committee in {:?}", raw);
    vec![title_case(trimmed)]
}

fn match_part(part: &str, rules: &CommitteeRules) -> Option<String> {
    if let Some(caps) = COMMITTEE_REGEX.captures(part) {
        return Some(normalize_committee_name(&caps[1], rules));
    }

    let part_lower = part.to_lowercase();
    if let Some((_, canonical)) = rules
        .aliases
        .iter()
        .find(|(alias, _)| part_lower.contains(&alias.to_lowercase()))
    {
        return Some(canonical.clone());
    }

    if part_lower.contains("host") || part_lower.contains("advisory") {
        return Some(HOST_ADVISORY.to_string());
    }
    None
}

/// Uppercases the first letter of each word and lowercases the rest.
/// A word starts after any character that is not a letter.
pub fn title_case(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                res.extend(c.to_lowercase());
            } else {
                res.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            res.push(c);
            prev_is_letter = false;
        }
    }
    res
}

/// Weighted committee counts.
///
/// Each row counts as many times as the number of registrations bought in that row,
/// and rows without any registration are ignored.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CommitteeTally {
    rules: CommitteeRules,
    total_rows: u64,
    total_registrations: u64,
    counts: TallyCounts,
}

impl CommitteeTally {
    pub fn new(rules: &CommitteeRules) -> CommitteeTally {
        CommitteeTally {
            rules: rules.clone(),
            total_rows: 0,
            total_registrations: 0,
            counts: TallyCounts::new(),
        }
    }

    /// Adds a row. A missing cell means that the row was shorter than the header.
    pub fn add_row(&mut self, committee_cell: Option<&str>, products_cell: Option<&str>) {
        self.total_rows += 1;
        let weight = products_cell.map(registration_weight).unwrap_or(0);
        if weight == 0 {
            return;
        }
        self.total_registrations = self.total_registrations.saturating_add(weight);

        let groups = match committee_cell {
            Some(cell) => extract_groups(cell, &self.rules),
            None => vec![NOT_SPECIFIED.to_string()],
        };
        debug!(
            "add_row: row {}: weight {} groups {:?}",
            self.total_rows, weight, groups
        );
        for group in groups.iter() {
            self.counts.add(group, weight);
        }
    }

    /// The raw weighted counts, in first-seen order.
    pub fn counts(&self) -> &TallyCounts {
        &self.counts
    }

    pub fn summarize(&self, threshold: u64) -> CommitteeSummary {
        let mut listed: Vec<(String, u64)> = Vec::new();
        let mut yes_unspecified: u64 = 0;
        let mut not_specified: u64 = 0;
        let mut dissimilar = 0;
        let mut below_threshold: u64 = 0;
        for (group, count) in self.counts.iter() {
            match (group.as_str(), *count) {
                (NOT_SPECIFIED, c) => not_specified = not_specified.saturating_add(c),
                (YES_UNSPECIFIED, c) => yes_unspecified = yes_unspecified.saturating_add(c),
                (_, 1) => dissimilar += 1,
                (g, c) if c >= threshold => listed.push((g.to_string(), c)),
                (_, c) => below_threshold = below_threshold.saturating_add(c),
            }
        }
        listed.sort_by(|a, b| b.1.cmp(&a.1));
        let listed_total = listed.iter().fold(0, |acc: u64, (_, c)| acc.saturating_add(*c));
        CommitteeSummary {
            threshold,
            total_rows: self.total_rows,
            total_registrations: self.total_registrations,
            listed,
            listed_total,
            yes_unspecified,
            not_specified,
            dissimilar,
            below_threshold,
        }
    }
}
