//! Rank display formatting

use std::collections::BTreeSet;

/// Plain display token for a collection of observed ranks, plus the
/// highlight decision. Destination-specific markup (bold, color, code
/// spans) is applied by the renderers, never here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankDisplay {
    pub token: String,
    pub highlight: bool,
}

/// Collapse observed 1-based ranks into `[min]` or `[min - max]`.
/// Highlight iff the best rank is at or above the threshold position.
/// An empty collection yields an empty token and no highlight.
pub fn format_ranks<I>(ranks: I, threshold: u32) -> RankDisplay
where
    I: IntoIterator<Item = u32>,
{
    let unique: BTreeSet<u32> = ranks.into_iter().collect();
    let (min, max) = match (unique.first(), unique.last()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => return RankDisplay::default(),
    };

    let token = if min == max {
        format!("[{}]", min)
    } else {
        format!("[{} - {}]", min, max)
    };

    RankDisplay { token, highlight: min <= threshold }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_rank_token() {
        let display = format_ranks([3], 10);
        assert_eq!(display.token, "[3]");
        assert!(display.highlight);
    }

    #[test]
    fn range_token_dedupes_and_sorts() {
        let display = format_ranks([7, 3, 7, 5], 10);
        assert_eq!(display.token, "[3 - 7]");
    }

    #[test]
    fn highlight_uses_best_rank_only() {
        assert!(!format_ranks([11, 40], 10).highlight);
        assert!(format_ranks([10, 40], 10).highlight);
    }

    #[test]
    fn empty_ranks_yield_empty_token() {
        assert_eq!(format_ranks([], 10), RankDisplay::default());
    }
}
