mod config;
pub mod committee;
pub mod grouping;
pub mod line_item;
pub mod manual;
pub mod registrations;
pub mod similarity;

pub use crate::committee::{extract_groups, normalize_committee_name, CommitteeTally};
pub use crate::config::*;
pub use crate::grouping::{analyze_similarity, group_similar, value_counts};
pub use crate::line_item::{
    line_items, parse_line_item, registration_quantity, registration_weight,
};
pub use crate::registrations::{count_registrations, RegistrationTally};
pub use crate::similarity::similarity_ratio;
