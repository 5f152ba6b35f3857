use std::collections::HashMap;

/// One row of an already-aggregated population. Averages must be rounded
/// to two decimals before ranking so float noise cannot split a tie.
#[derive(Debug, Clone)]
pub(crate) struct RankEntry {
    pub(crate) id: String,
    pub(crate) average: f64,
}

/// 1-based rank per id, computed on a sorted copy so the caller's row order
/// survives. Equal averages receive strictly increasing ranks in caller
/// order; there is no shared/competition ranking. Known limitation.
pub(crate) fn rank_rows(rows: &[RankEntry]) -> HashMap<String, u32> {
    let mut sorted: Vec<&RankEntry> = rows.iter().collect();
    sorted.sort_by(|a, b| b.average.total_cmp(&a.average));

    sorted
        .iter()
        .enumerate()
        .map(|(index, entry)| (entry.id.clone(), index as u32 + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, average: f64) -> RankEntry {
        RankEntry { id: id.to_string(), average }
    }

    #[test]
    fn ranks_map_back_to_caller_order() {
        let rows = vec![entry("1", 80.0), entry("2", 90.0), entry("3", 80.0)];
        let ranks = rank_rows(&rows);
        assert_eq!(ranks.get("2"), Some(&1));
        assert_eq!(ranks.get("1"), Some(&2));
        assert_eq!(ranks.get("3"), Some(&3));
    }

    #[test]
    fn ties_rank_in_caller_order() {
        let rows = vec![entry("a", 50.0), entry("b", 50.0), entry("c", 50.0)];
        let ranks = rank_rows(&rows);
        assert_eq!(ranks.get("a"), Some(&1));
        assert_eq!(ranks.get("b"), Some(&2));
        assert_eq!(ranks.get("c"), Some(&3));
    }

    #[test]
    fn no_score_rows_rank_last_without_gaps() {
        let rows = vec![entry("b", 0.0), entry("a", 50.0), entry("c", 0.0)];
        let ranks = rank_rows(&rows);
        assert_eq!(ranks.get("a"), Some(&1));
        assert_eq!(ranks.get("b"), Some(&2));
        assert_eq!(ranks.get("c"), Some(&3));

        let mut positions: Vec<u32> = ranks.values().copied().collect();
        positions.sort_unstable();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn empty_population_yields_empty_map() {
        assert!(rank_rows(&[]).is_empty());
    }
}
