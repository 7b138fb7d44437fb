pub use crate::config::*;

use log::debug;

/// A builder for assembling a list of items and the contributions of several people.
///
/// Items are referred to by their title, which is convenient when contributions are
/// typed in by hand.
///
/// ```
/// pub use pairwise_ranking::builder::Builder;
/// pub use pairwise_ranking::AggregationRules;
/// # use pairwise_ranking::RankingErrors;
///
/// let mut builder = Builder::new(&AggregationRules::DEFAULT_RULES)?
///     .items(&["Alien".to_string(), "Brazil".to_string()])?;
///
/// builder.add_contribution_simple("ann", &["Brazil".to_string(), "Alien".to_string()])?;
///
/// let result = builder.build()?;
/// assert_eq!(result.order[0].title, "Brazil");
///
/// # Ok::<(), RankingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: AggregationRules,
    pub(crate) _items: Vec<Item>,
    pub(crate) _contributions: Vec<Contribution>,
}

impl Builder {
    pub fn new(rules: &AggregationRules) -> Result<Builder, RankingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _items: Vec::new(),
            _contributions: Vec::new(),
        })
    }

    /// Sets the list of items from their titles. The ids are `item-1`, `item-2`, ...
    /// following the list order.
    pub fn items(self, titles: &[String]) -> Result<Builder, RankingErrors> {
        let with_ids: Vec<Item> = titles
            .iter()
            .enumerate()
            .map(|(idx, title)| Item {
                id: format!("item-{}", idx + 1),
                title: title.clone(),
            })
            .collect();
        self.items_with_ids(&with_ids)
    }

    /// Sets the list of items. Setting the items drops the contributions added so far.
    pub fn items_with_ids(self, items: &[Item]) -> Result<Builder, RankingErrors> {
        for (idx, it) in items.iter().enumerate() {
            if items[..idx].iter().any(|other| other.id == it.id) {
                return Err(RankingErrors::DuplicateItemIdentity(it.id.clone()));
            }
        }
        Ok(Builder {
            _rules: self._rules,
            _items: items.to_vec(),
            _contributions: Vec::new(),
        })
    }

    /// Adds the ranking of one person, given as titles, highest rank first.
    ///
    /// It is the simplest use case for most cases.
    pub fn add_contribution_simple(
        &mut self,
        person_id: &str,
        titles: &[String],
    ) -> Result<(), RankingErrors> {
        let mut ranking: Vec<String> = Vec::new();
        for title in titles {
            match self._items.iter().find(|it| it.title == *title) {
                Some(it) => ranking.push(it.id.clone()),
                None => {
                    return Err(RankingErrors::UnknownItemIdentity {
                        person_id: person_id.to_string(),
                        item_id: title.clone(),
                    })
                }
            }
        }
        self.upsert_contribution(&Contribution {
            person_id: person_id.to_string(),
            display_name: None,
            ranking,
            updated_at: None,
        })
    }

    /// Records the contribution of a person. A person has at most one contribution: a
    /// new submission replaces the previous one, unless it is older than the one already
    /// recorded.
    pub fn upsert_contribution(&mut self, contribution: &Contribution) -> Result<(), RankingErrors> {
        if contribution.person_id.is_empty() {
            return Err(RankingErrors::EmptyContributor);
        }
        let existing = self
            ._contributions
            .iter()
            .position(|c| c.person_id == contribution.person_id);
        match existing {
            Some(idx) => match (self._contributions[idx].updated_at, contribution.updated_at) {
                (Some(current), Some(incoming)) if incoming < current => {
                    debug!(
                        "upsert_contribution: keeping the newer contribution of {:?}",
                        contribution.person_id
                    );
                }
                _ => {
                    debug!(
                        "upsert_contribution: replacing the contribution of {:?}",
                        contribution.person_id
                    );
                    self._contributions[idx] = contribution.clone();
                }
            },
            None => self._contributions.push(contribution.clone()),
        }
        Ok(())
    }

    pub fn items_list(&self) -> &[Item] {
        &self._items
    }

    pub fn contributions(&self) -> &[Contribution] {
        &self._contributions
    }

    /// Runs the aggregation over the current contributions.
    pub fn build(&self) -> Result<ConsensusResult, RankingErrors> {
        crate::run_aggregation_stats(&self._items, &self._contributions, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(ts: &[&str]) -> Vec<String> {
        ts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn items_get_positional_ids() {
        let builder = Builder::new(&AggregationRules::DEFAULT_RULES)
            .unwrap()
            .items(&titles(&["A", "B"]))
            .unwrap();
        assert_eq!(
            builder.items_list(),
            &[Item::new("item-1", "A"), Item::new("item-2", "B")]
        );
    }

    #[test]
    fn resubmission_replaces() {
        let mut builder = Builder::new(&AggregationRules::DEFAULT_RULES)
            .unwrap()
            .items(&titles(&["A", "B", "C"]))
            .unwrap();
        builder
            .add_contribution_simple("ann", &titles(&["A", "B", "C"]))
            .unwrap();
        builder
            .add_contribution_simple("ann", &titles(&["C", "B", "A"]))
            .unwrap();
        assert_eq!(builder.contributions().len(), 1);
        assert_eq!(
            builder.contributions()[0].ranking,
            vec!["item-3", "item-2", "item-1"]
        );
        let res = builder.build().unwrap();
        assert_eq!(res.order[0].title, "C");
    }

    #[test]
    fn older_resubmission_is_dropped() {
        let mut builder = Builder::new(&AggregationRules::DEFAULT_RULES)
            .unwrap()
            .items_with_ids(&[Item::new("a", "A"), Item::new("b", "B")])
            .unwrap();
        let mut newer = Contribution::new("ann", &["b", "a"]);
        newer.updated_at = Some(2000);
        let mut older = Contribution::new("ann", &["a", "b"]);
        older.updated_at = Some(1000);
        builder.upsert_contribution(&newer).unwrap();
        builder.upsert_contribution(&older).unwrap();
        assert_eq!(builder.contributions(), &[newer.clone()]);

        let mut latest = Contribution::new("ann", &["a"]);
        latest.updated_at = Some(3000);
        builder.upsert_contribution(&latest).unwrap();
        assert_eq!(builder.contributions(), &[latest]);
    }

    #[test]
    fn unknown_title() {
        let mut builder = Builder::new(&AggregationRules::DEFAULT_RULES)
            .unwrap()
            .items(&titles(&["A"]))
            .unwrap();
        assert_eq!(
            builder.add_contribution_simple("ann", &titles(&["Z"])),
            Err(RankingErrors::UnknownItemIdentity {
                person_id: "ann".to_string(),
                item_id: "Z".to_string()
            })
        );
        assert!(builder.contributions().is_empty());
    }

    #[test]
    fn contribution_needs_a_person() {
        let mut builder = Builder::new(&AggregationRules::DEFAULT_RULES)
            .unwrap()
            .items_with_ids(&[Item::new("a", "A")])
            .unwrap();
        assert_eq!(
            builder.upsert_contribution(&Contribution::new("", &["a"])),
            Err(RankingErrors::EmptyContributor)
        );
        assert!(builder.contributions().is_empty());
    }

    #[test]
    fn duplicate_ids() {
        let res = Builder::new(&AggregationRules::DEFAULT_RULES)
            .unwrap()
            .items_with_ids(&[Item::new("a", "A"), Item::new("a", "B")]);
        assert!(matches!(res, Err(RankingErrors::DuplicateItemIdentity(id)) if id == "a"));
    }
}
