/*!

This is the long-form manual for `pairwise_ranking` and `pairrank`.

## Ranking with pairwise questions

A ranking session inserts new items, one at a time, into a list that is already
ranked. For each new item (the candidate), the session keeps the range of positions
where the candidate may still go, and asks the person to compare the candidate with
the item in the middle of that range:

- preferring the candidate keeps the upper half of the range,
- preferring the other item keeps the lower half.

When the range is empty, the candidate is inserted there. Placing an item in a list
of `n` items takes at most `ceil(log2(n + 1))` questions. There is no "equal"
answer.

Ranking a list from nothing uses the first item as the seed and inserts all the
others.

Every question shown is recorded, so that the session can go back one question at a
time, also across items. Going back after the last answer shows the last question
again.

## Consensus

The rankings of several people over the same list are merged with positional
(Borda) scoring. With `n` items in the list, an item at position `p` (0 being the
top) in a ranking gets `n - p` points. An item that a person did not rank counts as
being in the last position, `n - 1`. The consensus is the list sorted by decreasing
total score.

Items with the same score are ordered with one of the tiebreak modes:

* `useItemOrder` (default): the order of the list of items.
* `random`: a SHA-256 hash of the seed and the item id. It cannot be guessed in
  advance but gives the same result for the same seed.

Without any contribution, the consensus is the list itself. All the items then tie at 0 points.

A contribution that refers to an item outside of the list is rejected by default
(`"unknownItems": "reject"`). With `"unknownItems": "ignore"`, such entries are
skipped: the position of an item only counts the items of the list ranked before
it. The same holds for an item ranked twice: only its first mention counts.

## Command line

```bash
pairrank --config movies.json --add "Casablanca" --person ann --out stdout
```

The configuration file is in JSON:

```json
{
  "outputSettings": { "listName": "Movies", "outputPath": "movies_summary.json" },
  "items": [
    { "id": "alien", "title": "Alien" },
    { "id": "brazil", "title": "Brazil" }
  ],
  "contributionSources": [ { "provider": "json", "filePath": "contributions.json" } ],
  "rules": { "tiebreakMode": "useItemOrder", "unknownItems": "reject" }
}
```

### `json` contributions

```json
[
  { "personId": "ann", "ranking": ["brazil", "alien"], "updatedAt": 1700000000000 },
  { "personId": "bob", "displayName": "Bob", "ranking": ["alien"] }
]
```

### `csv` contributions

One row per person: the id of the person, then the item ids, highest rank first.
Empty cells end the ranking.

```text
ann,brazil,alien
bob,alien,
```

The options `personIdColumnIndex`, `firstRankColumnIndex` and `firstRowIndex`
(1-based) of a source control where the data starts.

 */
