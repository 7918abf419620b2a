use log::{debug, info};
use std::collections::HashSet;

use crate::config::*;
use crate::similarity::similarity_ratio;

/// Counts the trimmed, non-empty values of a column.
pub fn value_counts<'a, I>(values: I) -> TallyCounts
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = TallyCounts::new();
    for v in values {
        let v = v.trim();
        if !v.is_empty() {
            counts.add(v, 1);
        }
    }
    counts
}

/// Groups the distinct values that look alike.
///
/// The values are visited in sorted order. Each value that is not part of a group yet
/// starts a new group and pulls in all the later values that are similar enough to it.
/// The comparison ignores case. Only the groups with at least two members are returned,
/// the largest (by total count) first.
pub fn group_similar(
    counts: &TallyCounts,
    cutoff: f64,
) -> Result<Vec<SimilarityGroup>, TallyErrors> {
    if !(0.0..=1.0).contains(&cutoff) {
        return Err(TallyErrors::InvalidCutoff(cutoff));
    }

    let mut unique_vals: Vec<&(String, u64)> = counts.iter().collect();
    unique_vals.sort_by(|a, b| a.0.cmp(&b.0));
    let lowered: Vec<String> = unique_vals.iter().map(|(v, _)| v.to_lowercase()).collect();
    let lengths: Vec<usize> = unique_vals.iter().map(|(v, _)| v.chars().count()).collect();

    let mut visited: HashSet<usize> = HashSet::new();
    let mut groups: Vec<SimilarityGroup> = Vec::new();
    for i in 0..unique_vals.len() {
        if visited.contains(&i) {
            continue;
        }
        visited.insert(i);
        let mut members = vec![unique_vals[i].clone()];

        // Values with very different lengths cannot reach the cutoff: skip the ratio.
        let max_len_diff = lengths[i] as f64 * (1.0 - cutoff) + 2.0;
        for j in (i + 1)..unique_vals.len() {
            if visited.contains(&j) {
                continue;
            }
            let len_diff = (lengths[i] as f64 - lengths[j] as f64).abs();
            if len_diff > max_len_diff {
                continue;
            }
            let ratio = similarity_ratio(&lowered[i], &lowered[j]);
            if ratio >= cutoff {
                debug!(
                    "group_similar: {:?} ~ {:?} ({:.3})",
                    unique_vals[i].0, unique_vals[j].0, ratio
                );
                members.push(unique_vals[j].clone());
                visited.insert(j);
            }
        }

        if members.len() > 1 {
            groups.push(SimilarityGroup { members });
        }
    }

    groups.sort_by(|a, b| b.total().cmp(&a.total()));
    info!(
        "group_similar: {} distinct values, {} groups",
        unique_vals.len(),
        groups.len()
    );
    Ok(groups)
}

/// Exact and fuzzy duplicates among the values of a column.
pub fn analyze_similarity<'a, I>(
    values: I,
    rules: &GroupingRules,
) -> Result<SimilaritySummary, TallyErrors>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total_rows: u64 = 0;
    let counts = value_counts(values.into_iter().inspect(|_| total_rows += 1));
    let groups = group_similar(&counts, rules.cutoff)?;
    let mut top_matches = counts.most_common();
    top_matches.truncate(rules.top);
    Ok(SimilaritySummary {
        total_rows,
        non_empty: counts.total(),
        cutoff: rules.cutoff,
        top_matches,
        groups,
    })
}
