// Primitives for reading contributions in JSON format.

use crate::rank::*;

pub fn read_json_contributions(path: String) -> BRankResult<Vec<Contribution>> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let records: Vec<ContributionRecord> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_json_contributions: {} records", records.len());
    Ok(records.into_iter().map(Contribution::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields() {
        let js = r#"[
            { "personId": "p1", "ranking": ["a", "b"] },
            { "personId": "p2", "displayName": "Bea", "ranking": [], "updatedAt": 1700000000000 }
        ]"#;
        let records: Vec<ContributionRecord> = serde_json::from_str(js).unwrap();
        let cs: Vec<Contribution> = records.into_iter().map(Contribution::from).collect();
        assert_eq!(cs[0], Contribution::new("p1", &["a", "b"]));
        assert_eq!(cs[1].display_name, Some("Bea".to_string()));
        assert_eq!(cs[1].updated_at, Some(1700000000000));
        assert!(cs[1].ranking.is_empty());
    }

    #[test]
    fn missing_file() {
        let res = read_json_contributions("/nonexistent/contributions.json".to_string());
        assert!(matches!(res.map_err(|e| *e), Err(RankError::OpeningJson { .. })));
    }
}
