use crate::models::KeywordSet;

/// Jaccard index of two keyword sets.
///
/// Defined as 0 (not NaN) when either set is empty.
pub fn jaccard(a: &KeywordSet, b: &KeywordSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> KeywordSet {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_sets() {
        assert_eq!(jaccard(&set(&[]), &set(&[])), 0.0);
        assert_eq!(jaccard(&set(&["soleil"]), &set(&[])), 0.0);
    }

    #[test]
    fn test_identity_and_symmetry() {
        let vocabulary = ["soleil", "énergie", "lumière", "chaleur", "astre", "rayon"];

        // Every subset pair drawn from a small vocabulary
        let subsets: Vec<KeywordSet> = (0u32..(1 << vocabulary.len()))
            .map(|mask| {
                vocabulary
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, w)| w.to_string())
                    .collect()
            })
            .collect();

        for a in &subsets {
            if !a.is_empty() {
                assert_eq!(jaccard(a, a), 1.0);
            }
            for b in &subsets {
                let ab = jaccard(a, b);
                assert_eq!(ab, jaccard(b, a));
                assert!((0.0..=1.0).contains(&ab));
            }
        }
    }

    #[test]
    fn test_partial_overlap() {
        let a = set(&["solar", "energy", "panel", "light", "heat"]);
        let b = set(&["solar", "energy", "panel", "light"]);
        assert!((jaccard(&a, &b) - 0.8).abs() < 1e-12);
    }
}
