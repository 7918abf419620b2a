// Plain text reports and JSON summaries of the analyses.

use std::io::{Result, Write};

use column_tally::{CommitteeSummary, Price, RegistrationSummary, SimilaritySummary};
use serde_json::json;
use serde_json::Value as JSValue;

fn counts_js(key_name: &str, counts: &[(String, u64)]) -> JSValue {
    JSValue::Array(
        counts
            .iter()
            .map(|(k, c)| json!({ key_name: k, "count": c }))
            .collect(),
    )
}

fn prices_js(counts: &[(Price, u64)]) -> JSValue {
    JSValue::Array(
        counts
            .iter()
            .map(|(p, c)| json!({ "price": p.to_string(), "count": c }))
            .collect(),
    )
}

pub fn write_registration_report<W: Write>(out: &mut W, s: &RegistrationSummary) -> Result<()> {
    writeln!(out, "\nTotal rows processed: {}", s.total_rows)?;
    writeln!(out, "Total Registrations Counted: {}", s.total_registrations)?;
    if s.rows_without_matches > 0 {
        writeln!(
            out,
            "Rows with content but no pattern matches: {}",
            s.rows_without_matches
        )?;
    }

    writeln!(out, "\nRegistrations by Price Point:")?;
    for (price, count) in s.price_points.iter() {
        writeln!(out, "  ${}: {}", price, count)?;
    }
    if !s.other_prices.is_empty() {
        writeln!(out, "  Other Prices:")?;
        for (price, count) in s.other_prices.iter() {
            writeln!(out, "    ${}: {}", price, count)?;
        }
    }

    writeln!(out, "\nBreakdown by Type:")?;
    for (key, count) in s.breakdown.iter() {
        writeln!(out, "  {}: {}", key, count)?;
    }
    Ok(())
}

pub fn registration_summary_js(s: &RegistrationSummary) -> JSValue {
    json!({
        "totalRows": s.total_rows,
        "totalRegistrations": s.total_registrations,
        "rowsWithoutMatches": s.rows_without_matches,
        "pricePoints": prices_js(&s.price_points),
        "otherPrices": prices_js(&s.other_prices),
        "breakdown": counts_js("type", &s.breakdown),
    })
}

pub fn write_committee_report<W: Write>(out: &mut W, s: &CommitteeSummary) -> Result<()> {
    writeln!(
        out,
        "\n--- Filtered Group Mentions (Weighted by Registration Count >= {}) ---",
        s.threshold
    )?;
    writeln!(out, "{:<40} | Weighted Count", "YPAA Group / Conference")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for (group, count) in s.listed.iter() {
        writeln!(out, "{:<40} | {}", group, count)?;
    }

    writeln!(out, "\n--- Summary ---")?;
    writeln!(out, "Total Rows Processed: {}", s.total_rows)?;
    writeln!(
        out,
        "Total Registered Attendees Counted: {}",
        s.total_registrations
    )?;
    writeln!(
        out,
        "Weighted Mentions Grouped by a YPAA/Conference: {}",
        s.listed_total
    )?;
    writeln!(
        out,
        "Weighted Mentions indicating a 'Yes' but no specific YPAA: {}",
        s.yes_unspecified
    )?;
    writeln!(
        out,
        "Weighted Mentions indicating 'No' or blank: {}",
        s.not_specified
    )?;
    writeln!(
        out,
        "Weighted Mentions that were 'Very Dissimilar' (One-off entries): {}",
        s.dissimilar
    )?;
    if s.below_threshold > 0 {
        writeln!(
            out,
            "Weighted Mentions below the threshold of {}: {}",
            s.threshold, s.below_threshold
        )?;
    }
    Ok(())
}

pub fn committee_summary_js(s: &CommitteeSummary) -> JSValue {
    json!({
        "threshold": s.threshold,
        "totalRows": s.total_rows,
        "totalRegistrations": s.total_registrations,
        "listed": counts_js("group", &s.listed),
        "listedTotal": s.listed_total,
        "yesUnspecified": s.yes_unspecified,
        "notSpecified": s.not_specified,
        "dissimilar": s.dissimilar,
        "belowThreshold": s.below_threshold,
    })
}

pub fn write_similarity_report<W: Write>(out: &mut W, s: &SimilaritySummary) -> Result<()> {
    writeln!(out, "Total Rows: {}", s.total_rows)?;
    writeln!(out, "Non-empty Values: {}", s.non_empty)?;

    writeln!(out, "\n--- Top Exact Matches ---")?;
    for (val, count) in s.top_matches.iter() {
        writeln!(out, "'{}': {}", val, count)?;
    }

    writeln!(out, "\n--- Similarity Grouping (cutoff={}) ---", s.cutoff)?;
    writeln!(
        out,
        "Grouping values that look similar (potential typos or variations)..."
    )?;
    if s.groups.is_empty() {
        writeln!(out, "No similar groups found.")?;
    }
    for group in s.groups.iter() {
        writeln!(out, "\nGroup:")?;
        for (val, count) in group.members.iter() {
            writeln!(out, "  - '{}' (Count: {})", val, count)?;
        }
        writeln!(out, "  [Total in group: {}]", group.total())?;
    }
    Ok(())
}

pub fn similarity_summary_js(s: &SimilaritySummary) -> JSValue {
    let groups: Vec<JSValue> = s
        .groups
        .iter()
        .map(|g| {
            json!({
                "members": counts_js("value", &g.members),
                "total": g.total(),
            })
        })
        .collect();
    json!({
        "totalRows": s.total_rows,
        "nonEmpty": s.non_empty,
        "cutoff": s.cutoff,
        "topMatches": counts_js("value", &s.top_matches),
        "groups": groups,
    })
}
