use log::{debug, info, warn};

use pairwise_ranking::builder::Builder;
use pairwise_ranking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::rank::config_reader::*;
use crate::rank::interactive::run_interactive;
use crate::rank::io_common::{make_item_id, now_millis, simplify_file_name};

pub mod config_reader;
pub mod interactive;
pub mod io_common;
pub mod io_csv;
pub mod io_json;

#[derive(Debug, Snafu)]
pub enum RankError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing a number in the configuration"))]
    ParsingJsonNumber {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},

    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("CSV line {lineno} is too short"))]
    CsvLineToShort { lineno: usize },

    #[snafu(display("Error while computing the consensus"))]
    Aggregation { source: RankingErrors },

    #[snafu(display("Error talking to the terminal"))]
    Terminal { source: std::io::Error },
    #[snafu(display("The ranking session was stopped before the end"))]
    SessionAborted {},

    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RankResult<T> = Result<T, RankError>;
pub type BRankResult<T> = Result<T, Box<RankError>>;

/// What is written for each contribution with --save-contributions, and read back by
/// the json provider.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ContributionRecord {
    #[serde(rename = "personId")]
    pub person_id: String,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub ranking: Vec<String>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

impl From<&Contribution> for ContributionRecord {
    fn from(c: &Contribution) -> Self {
        ContributionRecord {
            person_id: c.person_id.clone(),
            display_name: c.display_name.clone(),
            ranking: c.ranking.clone(),
            updated_at: c.updated_at,
        }
    }
}

impl From<ContributionRecord> for Contribution {
    fn from(r: ContributionRecord) -> Self {
        Contribution {
            person_id: r.person_id,
            display_name: r.display_name,
            ranking: r.ranking,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct SummaryConfig {
    list: String,
    contributions: String,
    tiebreak: String,
}

fn tiebreak_name(mode: TieBreakMode) -> String {
    match mode {
        TieBreakMode::UseItemOrder => "useItemOrder".to_string(),
        TieBreakMode::Random(seed) => format!("random({})", seed),
    }
}

fn result_to_json(res: &ConsensusResult) -> Vec<JSValue> {
    res.order
        .iter()
        .zip(res.scores.iter())
        .enumerate()
        .map(|(idx, (item, score))| {
            json!({
                "rank": idx + 1,
                "id": item.id,
                "title": item.title,
                "score": score.score.to_string()
            })
        })
        .collect()
}

fn build_summary_js(list_name: &str, rules: &AggregationRules, res: &ConsensusResult) -> JSValue {
    let c = SummaryConfig {
        list: list_name.to_string(),
        contributions: res.contribution_count.to_string(),
        tiebreak: tiebreak_name(rules.tiebreak_mode),
    };
    json!({
        "config": c,
        "results": result_to_json(res) })
}

/// Combines the rules of the configuration with the overrides of the command line.
fn validate_rules(list_rules: &ListRules, args: &Args) -> RankResult<AggregationRules> {
    let mode = args
        .tiebreak
        .clone()
        .or_else(|| list_rules.tiebreak_mode.clone())
        .unwrap_or_else(|| "useItemOrder".to_string());
    let res = AggregationRules {
        tiebreak_mode: match mode.as_str() {
            "useItemOrder" => TieBreakMode::UseItemOrder,
            "random" => {
                let seed = match (args.seed, list_rules.random_seed.clone()) {
                    (Some(s), _) => s,
                    (None, Some(s)) => match s.parse::<u32>() {
                        Result::Ok(x) => x,
                        Err(_) => whatever!("Cannot parse the random seed {:?}", s),
                    },
                    (None, None) => whatever!("The random tiebreak mode needs a seed"),
                };
                TieBreakMode::Random(seed)
            }
            x => {
                whatever!("Cannot use tiebreak mode {:?}: unknown mode", x)
            }
        },
        unknown_item_mode: match list_rules.unknown_items.as_deref() {
            None | Some("reject") => UnknownItemMode::Reject,
            Some("ignore") => UnknownItemMode::Ignore,
            Some(x) => {
                whatever!("Cannot understand the unknownItems option {:?}", x)
            }
        },
    };
    Ok(res)
}

fn read_contributions(
    path: String,
    provider: &str,
    source: &ContributionSource,
) -> BRankResult<Vec<Contribution>> {
    info!("Attempting to read contribution file {:?}", path);
    match provider {
        "json" => io_json::read_json_contributions(path),
        "csv" => io_csv::read_csv_contributions(path, source),
        x => Err(Box::new(RankError::Whatever {
            message: format!("Provider not implemented {:?}", x),
            source: None,
        })),
    }
}

// Items are taken in the order in which they are first mentioned.
fn infer_items(contributions: &[Contribution]) -> Vec<Item> {
    let mut items: Vec<Item> = Vec::new();
    for c in contributions.iter() {
        for id in c.ranking.iter() {
            if !items.iter().any(|it| it.id == *id) {
                items.push(Item::new(id, id));
            }
        }
    }
    items
}

fn config_items(config: &ListConfig) -> Vec<Item> {
    config
        .items
        .iter()
        .enumerate()
        .map(|(idx, it)| Item {
            id: match it.id.clone() {
                Some(x) if !x.is_empty() => x,
                _ => format!("item-{}", idx + 1),
            },
            title: it.title.clone(),
        })
        .collect()
}

fn write_output(dest: &str, contents: &str) -> RankResult<()> {
    if dest == "stdout" {
        println!("{}", contents);
        Ok(())
    } else {
        fs::write(dest, contents).context(WritingFileSnafu { path: dest })
    }
}

/// Runs an interactive session on the terminal for the new items, or for the whole list.
fn rank_on_terminal<R: BufRead, W: Write>(
    args: &Args,
    items: &mut Vec<Item>,
    current_order: Vec<Item>,
    input: &mut R,
    out: &mut W,
) -> RankResult<Vec<Item>> {
    let mut batch = if args.rank {
        BatchSession::from_scratch(items.clone())
    } else {
        let mut new_items: Vec<Item> = Vec::new();
        for title in args.add.clone().unwrap_or_default() {
            let id = make_item_id(&title, items);
            let item = Item { id, title };
            items.push(item.clone());
            new_items.push(item);
        }
        BatchSession::new(current_order, new_items)
    };
    run_interactive(&mut batch, input, out)?;
    Ok(batch.into_result())
}

pub fn run_list(args: &Args) -> BRankResult<()> {
    run_list_with(args, &mut std::io::stdin().lock(), &mut std::io::stdout())
}

pub fn run_list_with<R: BufRead, W: Write>(
    args: &Args,
    input: &mut R,
    out: &mut W,
) -> BRankResult<()> {
    let config: Option<ListConfig> = match args.config.clone() {
        Some(path) => Some(read_list_config(path)?),
        None => None,
    };
    info!("config: {:?}", config);

    let default_rules = ListRules::default();
    let rules = validate_rules(
        config.as_ref().map(|c| &c.rules).unwrap_or(&default_rules),
        args,
    )?;

    // The contributions, from the command line or from the sources of the configuration.
    let mut contributions: Vec<Contribution> = Vec::new();
    if let Some(path) = args.input.clone() {
        let provider = args.input_type.clone().unwrap_or_else(|| "json".to_string());
        let mut data = read_contributions(path, &provider, &ContributionSource::default())?;
        contributions.append(&mut data);
    } else if let (Some(config_path), Some(c)) = (args.config.clone(), config.as_ref()) {
        let root_p: PathBuf = Path::new(config_path.as_str())
            .parent()
            .context(MissingParentDirSnafu {})?
            .to_path_buf();
        for source in c.contribution_sources.iter() {
            let p: PathBuf = root_p.join(&source.file_path);
            let mut data =
                read_contributions(p.as_path().display().to_string(), &source.provider, source)?;
            contributions.append(&mut data);
        }
    }
    debug!("contributions: {:?}", contributions);

    let mut items: Vec<Item> = match config.as_ref() {
        Some(c) => config_items(c),
        None => infer_items(&contributions),
    };

    let list_name: String = match (config.as_ref(), args.input.as_ref()) {
        (Some(c), _) => c.output_settings.list_name.clone(),
        (None, Some(p)) => simplify_file_name(p),
        (None, None) => "list".to_string(),
    };

    let mut builder = Builder::new(&rules)
        .and_then(|b| b.items_with_ids(&items))
        .context(AggregationSnafu {})?;
    for c in contributions.iter() {
        builder.upsert_contribution(c).context(AggregationSnafu {})?;
    }

    if args.rank || args.add.is_some() {
        let current = builder.build().context(AggregationSnafu {})?;
        let ranked = rank_on_terminal(args, &mut items, current.order, input, out)?;
        let ranking: Vec<String> = ranked.iter().map(|it| it.id.clone()).collect();
        info!("Interactive ranking: {:?}", ranking);

        // The list may have grown: start again from the new list.
        let previous: Vec<Contribution> = builder.contributions().to_vec();
        builder = Builder::new(&rules)
            .and_then(|b| b.items_with_ids(&items))
            .context(AggregationSnafu {})?;
        for c in previous.iter() {
            builder.upsert_contribution(c).context(AggregationSnafu {})?;
        }
        match args.person.clone() {
            Some(person_id) => {
                builder
                    .upsert_contribution(&Contribution {
                        person_id,
                        display_name: None,
                        ranking,
                        updated_at: Some(now_millis()),
                    })
                    .context(AggregationSnafu {})?;
            }
            None => {
                warn!("No --person given: the interactive ranking is not recorded as a contribution");
            }
        }
    }

    if let Some(path) = args.save_contributions.clone() {
        let records: Vec<ContributionRecord> = builder
            .contributions()
            .iter()
            .map(ContributionRecord::from)
            .collect();
        let js = serde_json::to_string_pretty(&records).context(ParsingJsonSnafu {})?;
        write_output(&path, &js)?;
    }

    let result = builder.build().context(AggregationSnafu {})?;
    info!("res {:?}", result);

    let result_js = build_summary_js(&list_name, &rules, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    let dest: String = args
        .out
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.output_settings.output_path.clone()))
        .unwrap_or_else(|| "stdout".to_string());
    write_output(&dest, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = args.reference.clone() {
        let summary_ref = read_summary(summary_p)?;
        info!("summary: {:?}", summary_ref);
        if summary_ref != result_js {
            let pretty_js_summary_ref =
                serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return Err(Box::new(RankError::ReferenceMismatch {}));
        }
    }

    Ok(())
}

#[cfg(test)]
fn run_list_test(test_name: &str, args: Args) -> BRankResult<()> {
    let test_dir = format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), test_name);
    info!("Running test {}", test_name);
    let full = Args {
        config: Some(format!("{}/{}_config.json", test_dir, test_name)),
        reference: Some(format!("{}/{}_expected_summary.json", test_dir, test_name)),
        out: Some("stdout".to_string()),
        ..args
    };
    run_list_with(&full, &mut std::io::empty(), &mut std::io::sink())
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    let _ = env_logger::builder().is_test(true).try_init();
    let res = run_list_test(test_name, Args::default());
    if let Err(e) = &res {
        eprintln!("An error occured {}", e);
    }
    assert!(res.is_ok(), "{} failed", test_name);
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Cursor;

    #[test]
    fn unanimous_test() {
        test_wrapper("unanimous_test");
    }

    #[test]
    fn partial_csv_test() {
        test_wrapper("partial_csv_test");
    }

    #[test]
    fn no_contributions_test() {
        test_wrapper("no_contributions_test");
    }

    #[test]
    fn ignore_unknown_test() {
        test_wrapper("ignore_unknown_test");
    }

    #[test]
    fn unknown_items_are_rejected_by_default() {
        // Same contributions as ignore_unknown_test, with the default rules.
        let res = run_list_test("reject_unknown_test", Args::default());
        assert!(matches!(
            res.map_err(|e| *e),
            Err(RankError::Aggregation {
                source: RankingErrors::UnknownItemIdentity { .. }
            })
        ));
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        let res = run_list_test(
            "unanimous_test",
            Args {
                tiebreak: Some("random".to_string()),
                seed: Some(3),
                ..Args::default()
            },
        );
        // The tiebreak name differs in the summary.
        assert!(matches!(res.map_err(|e| *e), Err(RankError::ReferenceMismatch {})));
    }

    #[test]
    fn unknown_tiebreak_mode() {
        let res = validate_rules(
            &ListRules::default(),
            &Args {
                tiebreak: Some("coinFlip".to_string()),
                ..Args::default()
            },
        );
        assert!(res.is_err());
    }

    #[test]
    fn random_tiebreak_needs_a_seed() {
        let rules = ListRules {
            tiebreak_mode: Some("random".to_string()),
            random_seed: None,
            unknown_items: None,
        };
        assert!(validate_rules(&rules, &Args::default()).is_err());
        let rules = ListRules {
            random_seed: Some("12".to_string()),
            ..rules
        };
        assert_eq!(
            validate_rules(&rules, &Args::default()).unwrap().tiebreak_mode,
            TieBreakMode::Random(12)
        );
    }

    #[test]
    fn infer_items_from_contributions() {
        let cs = vec![
            Contribution::new("p1", &["b", "a"]),
            Contribution::new("p2", &["c", "a"]),
        ];
        let ids: Vec<String> = infer_items(&cs).into_iter().map(|it| it.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn add_item_records_a_contribution() {
        let dir = std::env::temp_dir().join(format!("pairrank-add-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let saved = dir.join("saved.json");
        let summary = dir.join("summary.json");
        let args = Args {
            config: Some(format!(
                "{}/tests/data/unanimous_test/unanimous_test_config.json",
                env!("CARGO_MANIFEST_DIR")
            )),
            add: Some(vec!["Dune".to_string()]),
            person: Some("p1".to_string()),
            save_contributions: Some(saved.display().to_string()),
            out: Some(summary.display().to_string()),
            ..Args::default()
        };
        // Consensus is [b, a, c]: Dune vs a, then Dune vs b, then keep.
        let mut input = Cursor::new("1\n1\ny\n".as_bytes());
        let mut out: Vec<u8> = Vec::new();
        run_list_with(&args, &mut input, &mut out).unwrap();

        let records: Vec<ContributionRecord> =
            serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();
        assert_eq!(records.len(), 3);
        let p1 = records.iter().find(|r| r.person_id == "p1").unwrap();
        assert_eq!(p1.ranking, vec!["dune", "b", "a", "c"]);
        assert!(p1.updated_at.is_some());

        let js: JSValue = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(js["results"].as_array().unwrap().len(), 4);
        assert_eq!(js["results"][0]["id"], "b");
        fs::remove_dir_all(&dir).unwrap();
    }
}
