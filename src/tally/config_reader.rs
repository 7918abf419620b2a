use crate::tally::io_csv::{TextEncoding, DEFAULT_ENCODINGS};
use crate::tally::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

/// Minimum weighted count for a committee to be listed.
pub const DEFAULT_THRESHOLD: u64 = 2;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AliasEntry {
    pub alias: String,
    pub canonical: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitteeSettings {
    pub aliases: Option<Vec<AliasEntry>>,
    #[serde(rename = "noResponses")]
    pub no_responses: Option<Vec<String>>,
    #[serde(rename = "yesResponses")]
    pub yes_responses: Option<Vec<String>>,
    /// Replace the built-in aliases and answers instead of extending them.
    #[serde(rename = "replaceDefaults")]
    pub replace_defaults: Option<bool>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilaritySettings {
    pub cutoff: Option<f64>,
    pub top: Option<usize>,
}

/// The content of the optional configuration file. Everything has a default.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TallyConfig {
    pub encodings: Option<Vec<String>>,
    pub threshold: Option<u64>,
    pub committee: Option<CommitteeSettings>,
    pub similarity: Option<SimilaritySettings>,
}

impl TallyConfig {
    /// The encodings to try, in order.
    pub fn encodings(&self) -> TallyResult<Vec<TextEncoding>> {
        match &self.encodings {
            None => Ok(DEFAULT_ENCODINGS.to_vec()),
            Some(names) if names.is_empty() => whatever!("the list of encodings is empty"),
            Some(names) => names.iter().map(|n| TextEncoding::from_name(n)).collect(),
        }
    }

    pub fn committee_rules(&self) -> CommitteeRules {
        let settings = match &self.committee {
            Some(s) => s,
            None => return CommitteeRules::default(),
        };
        let mut rules = if settings.replace_defaults == Some(true) {
            CommitteeRules::empty()
        } else {
            CommitteeRules::default()
        };
        if let Some(aliases) = &settings.aliases {
            let pairs: Vec<(String, String)> = aliases
                .iter()
                .map(|a| (a.alias.clone(), a.canonical.clone()))
                .collect();
            rules.add_aliases(&pairs);
        }
        if let Some(answers) = &settings.no_responses {
            rules.add_no_responses(answers);
        }
        if let Some(answers) = &settings.yes_responses {
            rules.add_yes_responses(answers);
        }
        debug!("committee_rules: {} aliases", rules.aliases.len());
        rules
    }

    /// The command line value wins over the file, which wins over the default.
    pub fn threshold(&self, from_cli: Option<u64>) -> u64 {
        from_cli.or(self.threshold).unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn grouping_rules(&self, cutoff: Option<f64>, top: Option<usize>) -> GroupingRules {
        let defaults = GroupingRules::DEFAULT_RULES;
        let settings = self.similarity.clone().unwrap_or_default();
        GroupingRules {
            cutoff: cutoff.or(settings.cutoff).unwrap_or(defaults.cutoff),
            top: top.or(settings.top).unwrap_or(defaults.top),
        }
    }
}

pub fn read_config(path: &str) -> BTallyResult<TallyConfig> {
    info!("Opening configuration file {:?}", path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: TallyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> BTallyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
