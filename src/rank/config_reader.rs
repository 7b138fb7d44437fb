use crate::rank::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "listName")]
    pub list_name: String,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigItem {
    pub id: Option<String>,
    pub title: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContributionSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "personIdColumnIndex")]
    _person_id_column_index: Option<JSValue>,
    #[serde(rename = "firstRankColumnIndex")]
    _first_rank_column_index: Option<JSValue>,
    #[serde(rename = "firstRowIndex")]
    _first_row_index: Option<JSValue>,
}

// The indexes are 1-based in the configuration, 0-based in the code.
impl ContributionSource {
    pub fn person_id_column_index(&self) -> RankResult<usize> {
        read_js_index(&self._person_id_column_index, 1)
    }

    pub fn first_rank_column_index(&self) -> RankResult<usize> {
        read_js_index(&self._first_rank_column_index, 2)
    }

    pub fn first_row_index(&self) -> RankResult<usize> {
        read_js_index(&self._first_row_index, 1)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListRules {
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<String>,
    #[serde(rename = "unknownItems")]
    pub unknown_items: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub items: Vec<ConfigItem>,
    #[serde(rename = "contributionSources", default)]
    pub contribution_sources: Vec<ContributionSource>,
    #[serde(default)]
    pub rules: ListRules,
}

pub fn read_list_config(path: String) -> BRankResult<ListConfig> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let config: ListConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: String) -> BRankResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_js_index(x: &Option<JSValue>, default_value: usize) -> RankResult<usize> {
    let idx = match x {
        None | Some(JSValue::Null) => default_value,
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {})?,
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .context(ParsingJsonNumberSnafu {})?,
        _ => None.context(ParsingJsonNumberSnafu {})?,
    };
    // Index 0 does not exist in the 1-based convention.
    idx.checked_sub(1).context(ParsingJsonNumberSnafu {})
}
