//! Leaderboard projection over aggregate tables

use crate::aggregate::AggregateTable;

/// Pseudo-subcategory that sums every metric under a category.
pub const TOTAL_SUBCATEGORY: &str = "total";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
}

/// Ranked (display name, score) pairs, descending by score. Ties keep the
/// table's original column order; scores are raw numbers - presentational
/// transforms (ticks into hours, thousands separators) belong to whatever
/// renders the board.
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rank players on one stat category.
///
/// With [`TOTAL_SUBCATEGORY`], every metric row under `category` sums into
/// the score; otherwise the single (category, subcategory) row is used. A
/// category with no matching rows ranks everyone at zero.
pub fn rank(table: &AggregateTable, category: &str, subcategory: &str) -> Leaderboard {
    let total = subcategory == TOTAL_SUBCATEGORY;
    let mut matched_rows = 0usize;

    let mut entries: Vec<LeaderboardEntry> = table
        .columns()
        .iter()
        .map(|name| LeaderboardEntry {
            name: name.clone(),
            score: 0,
        })
        .collect();

    for (key, cells) in table.rows() {
        if key.category() != Some(category) {
            continue;
        }
        if !total && key.metric() != Some(subcategory) {
            continue;
        }
        matched_rows += 1;
        for entry in &mut entries {
            entry.score += cells.get(&entry.name).copied().unwrap_or(0);
        }
    }

    if matched_rows == 0 {
        log::debug!("no rows matched {} / {}", category, subcategory);
    }

    sort_descending(&mut entries);
    Leaderboard { entries }
}

/// Rank players by how many advancements they achieved (non-zero cells in
/// the advancements table).
pub fn rank_advancement_counts(table: &AggregateTable) -> Leaderboard {
    let mut entries: Vec<LeaderboardEntry> = table
        .columns()
        .iter()
        .map(|name| LeaderboardEntry {
            name: name.clone(),
            score: 0,
        })
        .collect();

    for (_, cells) in table.rows() {
        for entry in &mut entries {
            if cells.get(&entry.name).copied().unwrap_or(0) != 0 {
                entry.score += 1;
            }
        }
    }

    sort_descending(&mut entries);
    Leaderboard { entries }
}

/// Stable descending sort: tied scores keep their column order.
fn sort_descending(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::RowKey;
    use std::collections::BTreeMap;

    fn table_of(players: &[(&str, &[(&str, i64)])]) -> AggregateTable {
        let mut table = AggregateTable::new();
        for (name, pairs) in players {
            let values: BTreeMap<RowKey, i64> = pairs
                .iter()
                .map(|(path, v)| (RowKey::from_dotted(path), *v))
                .collect();
            table.merge(&values, name);
        }
        table.fill_missing(0);
        table
    }

    #[test]
    fn test_rank_single_metric() {
        let table = table_of(&[
            ("Alice", &[("minecraft:custom.minecraft:jump", 5)]),
            ("Bob", &[("minecraft:custom.minecraft:jump", 3)]),
        ]);

        let board = rank(&table, "minecraft:custom", "minecraft:jump");

        assert_eq!(board.entries[0].name, "Alice");
        assert_eq!(board.entries[0].score, 5);
        assert_eq!(board.entries[1].name, "Bob");
        assert_eq!(board.entries[1].score, 3);
    }

    #[test]
    fn test_rank_with_wrapper_segment() {
        // Same addressing works when the source nested everything under a
        // top-level wrapper object.
        let table = table_of(&[
            ("Alice", &[("stats.minecraft:custom.minecraft:jump", 5)]),
            ("Bob", &[("stats.minecraft:custom.minecraft:jump", 9)]),
        ]);

        let board = rank(&table, "minecraft:custom", "minecraft:jump");
        assert_eq!(board.entries[0].name, "Bob");
    }

    #[test]
    fn test_rank_total_sums_category() {
        let table = table_of(&[
            ("Alice", &[("s.cat.m1", 5), ("s.cat.m2", 7), ("s.other.m1", 100)]),
            ("Bob", &[("s.cat.m1", 20)]),
        ]);

        let board = rank(&table, "cat", TOTAL_SUBCATEGORY);

        assert_eq!(board.entries[0].name, "Bob");
        assert_eq!(board.entries[0].score, 20);
        assert_eq!(board.entries[1].name, "Alice");
        assert_eq!(board.entries[1].score, 12);
    }

    #[test]
    fn test_sort_is_non_increasing_and_ties_stable() {
        let table = table_of(&[
            ("P1", &[("s.cat.m", 3)]),
            ("P2", &[("s.cat.m", 7)]),
            ("P3", &[("s.cat.m", 3)]),
        ]);

        let board = rank(&table, "cat", "m");
        let scores: Vec<i64> = board.entries.iter().map(|e| e.score).collect();

        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        // P1 and P3 tie at 3; column order puts P1 first.
        assert_eq!(board.entries[1].name, "P1");
        assert_eq!(board.entries[2].name, "P3");
    }

    #[test]
    fn test_unmatched_category_ranks_zeros() {
        let table = table_of(&[("Alice", &[("s.cat.m", 3)])]);
        let board = rank(&table, "nope", "m");

        assert_eq!(board.len(), 1);
        assert_eq!(board.entries[0].score, 0);
    }

    #[test]
    fn test_advancement_counts() {
        let table = table_of(&[
            ("Alice", &[("mod:story/root", 1), ("mod:story/branch", 1)]),
            ("Bob", &[("mod:story/root", 1), ("mod:story/branch", 0)]),
        ]);

        let board = rank_advancement_counts(&table);

        assert_eq!(board.entries[0].name, "Alice");
        assert_eq!(board.entries[0].score, 2);
        assert_eq!(board.entries[1].score, 1);
    }
}
