use clap::Parser;

/// This is a program to rank a list with pairwise questions, and to merge the rankings of
/// several people into a consensus.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file describing the list: items, contribution sources and rules.
    /// For more information about the file format, read the manual of the pairwise_ranking crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing a summary in JSON format. If provided, pairrank will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the consensus will be written in JSON
    /// format to the given location. Setting this option overrides the path that may be specified
    /// with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the contributions are read from this file instead of the
    /// sources listed with the --config option. Without --config, the items are inferred from the
    /// contributions.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default json) The type of the input: json or csv.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// If passed as an argument, the whole list is ranked interactively from scratch.
    /// Cannot be used with --add.
    #[clap(long, takes_value = false, conflicts_with = "add")]
    pub rank: bool,

    /// (repeatable) The title of a new item to insert interactively into the current consensus.
    #[clap(long, value_parser)]
    pub add: Option<Vec<String>>,

    /// (optional) The id of the person answering the questions. The outcome of the interactive
    /// session is recorded as the contribution of this person, replacing a previous one.
    #[clap(long, value_parser)]
    pub person: Option<String>,

    /// (file path, optional) If specified, all the contributions (including the one recorded
    /// during this run) are written to this file in JSON format.
    #[clap(long, value_parser)]
    pub save_contributions: Option<String>,

    /// (useItemOrder or random) Overrides the tiebreak mode of the configuration.
    #[clap(long, value_parser)]
    pub tiebreak: Option<String>,

    /// Overrides the seed of the random tiebreak.
    #[clap(long, value_parser)]
    pub seed: Option<u32>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_and_add_conflict() {
        assert!(Args::try_parse_from(["pairrank", "--rank", "--add", "Dune"]).is_err());

        let args = Args::try_parse_from(["pairrank", "--add", "Dune", "--add", "Emma"]).unwrap();
        assert_eq!(args.add, Some(vec!["Dune".to_string(), "Emma".to_string()]));
        assert!(!args.rank);
        assert!(Args::try_parse_from(["pairrank", "--rank"]).unwrap().rank);
    }
}
