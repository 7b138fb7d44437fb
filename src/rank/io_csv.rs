// Primitives for reading CSV files.

use std::fs::File;

use crate::rank::*;

/// One contribution per line: the person id, then the item ids, highest rank first.
/// An empty cell ends the ranking.
pub fn read_csv_contributions(
    path: String,
    cfs: &ContributionSource,
) -> BRankResult<Vec<Contribution>> {
    let id_idx = cfs.person_id_column_index()?;
    let ranks_start_col = cfs.first_rank_column_index()?;

    let mut res: Vec<Contribution> = Vec::new();
    let (records, row_offset) = get_records(&path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        let person_id = line
            .get(id_idx)
            .context(CsvLineToShortSnafu { lineno })?
            .trim()
            .to_string();
        if person_id.is_empty() && line.iter().all(|s| s.trim().is_empty()) {
            debug!("read_csv_contributions: skipping empty line {:?}", lineno);
            continue;
        }

        let ranking: Vec<String> = line
            .iter()
            .skip(ranks_start_col)
            .map(|s| s.trim())
            .take_while(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        debug!(
            "read_csv_contributions: lineno: {:?} person: {:?} ranking: {:?}",
            lineno, person_id, &ranking
        );

        res.push(Contribution {
            person_id,
            display_name: None,
            ranking,
            updated_at: None,
        });
    }
    Ok(res)
}

fn get_records(
    path: &str,
    cfs: &ContributionSource,
) -> RankResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    for _ in 0..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_partial_rankings() {
        let path = format!(
            "{}/tests/data/partial_csv_test/contributions.csv",
            env!("CARGO_MANIFEST_DIR")
        );
        let cs = read_csv_contributions(path, &ContributionSource::default()).unwrap();
        assert_eq!(
            cs,
            vec![
                Contribution::new("p1", &["a", "c"]),
                Contribution::new("p2", &["c", "a", "b"]),
            ]
        );
    }

    #[test]
    fn header_row_is_skipped() {
        let dir = std::env::temp_dir().join(format!("pairrank-csv-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("with_header.csv");
        fs::write(&path, "person,first,second\nann,x,\n\nbob,y,x\n").unwrap();
        let source: ContributionSource =
            serde_json::from_str(r#"{ "provider": "csv", "filePath": "", "firstRowIndex": 2 }"#)
                .unwrap();
        let cs = read_csv_contributions(path.display().to_string(), &source).unwrap();
        assert_eq!(
            cs,
            vec![
                Contribution::new("ann", &["x"]),
                Contribution::new("bob", &["y", "x"]),
            ]
        );
        fs::remove_dir_all(&dir).unwrap();
    }
}
