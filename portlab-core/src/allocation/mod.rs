//! Allocation policy — scores in, target weights out.
//!
//! `target_weights` is a pure function of its inputs: no hidden state, so a
//! backtest replayed with the same scores produces the same weights. Ties
//! in score are broken by symbol lexical order, which keeps the ranking
//! deterministic across runs and platforms.

pub mod profile;

pub use profile::{AllocationProfile, ConfigError, RiskProfile, WeightingScheme};

use crate::domain::Symbol;
use std::collections::BTreeMap;

/// Compute target position weights from universe scores.
///
/// Weights are non-negative and sum to at most 1; the residual is the
/// target cash fraction. Symbols absent from the result have target
/// weight 0, which forces liquidation at the next execution step.
pub fn target_weights(
    scores: &BTreeMap<Symbol, f64>,
    profile: &AllocationProfile,
) -> BTreeMap<Symbol, f64> {
    // Rank by score descending; BTreeMap iteration already yields symbols
    // in lexical order, and the stable sort preserves that for ties.
    let mut ranked: Vec<(&Symbol, f64)> = scores
        .iter()
        .filter(|(_, score)| score.is_finite())
        .map(|(sym, score)| (sym, *score))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let selected = &ranked[..profile.top_n.min(ranked.len())];
    if selected.is_empty() {
        return BTreeMap::new();
    }

    let k = selected.len();
    let raw: Vec<f64> = match profile.weighting {
        WeightingScheme::EqualWeight => vec![1.0 / k as f64; k],
        WeightingScheme::RankWeight => {
            // Best symbol gets k parts, worst gets 1 part.
            let total: f64 = (1..=k).sum::<usize>() as f64;
            (0..k).map(|i| (k - i) as f64 / total).collect()
        }
    };

    let mut weights: BTreeMap<Symbol, f64> = selected
        .iter()
        .zip(raw)
        .map(|((sym, _), w)| ((*sym).clone(), w.min(profile.max_position_pct)))
        .collect();

    rescale_if_overweight(&mut weights);
    weights
}

/// Build target weights from externally supplied picks (symbol, weight).
///
/// Used by daily mode when a picks file carries pre-assigned weights:
/// weights are normalized to sum 1, capped per position, and rescaled.
pub fn weights_from_picks(
    picks: &[(Symbol, f64)],
    profile: &AllocationProfile,
) -> BTreeMap<Symbol, f64> {
    let total: f64 = picks.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return BTreeMap::new();
    }
    let mut weights: BTreeMap<Symbol, f64> = picks
        .iter()
        .filter(|(_, w)| *w > 0.0)
        .map(|(sym, w)| (sym.clone(), (w / total).min(profile.max_position_pct)))
        .collect();
    rescale_if_overweight(&mut weights);
    weights
}

/// Scale all weights down proportionally if they sum above 1.
fn rescale_if_overweight(weights: &mut BTreeMap<Symbol, f64>) {
    let sum: f64 = weights.values().sum();
    if sum > 1.0 {
        for w in weights.values_mut() {
            *w /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> BTreeMap<Symbol, f64> {
        pairs.iter().map(|(s, v)| (s.to_string(), *v)).collect()
    }

    #[test]
    fn top_n_selects_highest_scores() {
        let profile = AllocationProfile::frictionless(2, 1.0);
        let weights = target_weights(&scores(&[("A", 1.0), ("B", 3.0), ("C", 2.0)]), &profile);
        assert_eq!(weights.len(), 2);
        assert!(weights.contains_key("B"));
        assert!(weights.contains_key("C"));
        assert!(!weights.contains_key("A"));
    }

    #[test]
    fn equal_weight_splits_evenly() {
        let profile = AllocationProfile::frictionless(2, 1.0);
        let weights = target_weights(&scores(&[("A", 1.0), ("B", 2.0)]), &profile);
        assert!((weights["A"] - 0.5).abs() < 1e-12);
        assert!((weights["B"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rank_weight_favors_better_scores() {
        let mut profile = AllocationProfile::frictionless(3, 1.0);
        profile.weighting = WeightingScheme::RankWeight;
        let weights = target_weights(&scores(&[("A", 3.0), ("B", 2.0), ("C", 1.0)]), &profile);
        // 3:2:1 parts out of 6
        assert!((weights["A"] - 0.5).abs() < 1e-12);
        assert!((weights["B"] - 1.0 / 3.0).abs() < 1e-12);
        assert!((weights["C"] - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn ties_break_by_symbol_order() {
        let profile = AllocationProfile::frictionless(1, 1.0);
        let weights = target_weights(&scores(&[("ZZZ", 1.0), ("AAA", 1.0)]), &profile);
        assert_eq!(weights.len(), 1);
        assert!(weights.contains_key("AAA"));
    }

    #[test]
    fn fewer_symbols_than_n_uses_what_is_available() {
        let profile = AllocationProfile::frictionless(10, 1.0);
        let weights = target_weights(&scores(&[("A", 1.0)]), &profile);
        assert_eq!(weights.len(), 1);
        assert!((weights["A"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn max_position_cap_applies() {
        let profile = AllocationProfile::frictionless(1, 0.25);
        let weights = target_weights(&scores(&[("A", 1.0)]), &profile);
        assert!((weights["A"] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn empty_scores_yield_empty_weights() {
        let profile = AllocationProfile::frictionless(5, 1.0);
        assert!(target_weights(&BTreeMap::new(), &profile).is_empty());
    }

    #[test]
    fn nan_scores_are_ignored() {
        let profile = AllocationProfile::frictionless(5, 1.0);
        let weights = target_weights(&scores(&[("A", f64::NAN), ("B", 1.0)]), &profile);
        assert_eq!(weights.len(), 1);
        assert!(weights.contains_key("B"));
    }

    #[test]
    fn picks_weights_normalize_and_cap() {
        let profile = AllocationProfile::frictionless(10, 0.5);
        let picks = vec![("A".to_string(), 3.0), ("B".to_string(), 1.0)];
        let weights = weights_from_picks(&picks, &profile);
        // 0.75 capped to 0.5, B stays at 0.25
        assert!((weights["A"] - 0.5).abs() < 1e-12);
        assert!((weights["B"] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn picks_with_no_positive_weight_yield_empty() {
        let profile = AllocationProfile::frictionless(10, 0.5);
        let picks = vec![("A".to_string(), 0.0), ("B".to_string(), -1.0)];
        assert!(weights_from_picks(&picks, &profile).is_empty());
    }

    #[test]
    fn weights_never_sum_above_one() {
        let profile = AllocationProfile::frictionless(4, 1.0);
        let weights = target_weights(
            &scores(&[("A", 4.0), ("B", 3.0), ("C", 2.0), ("D", 1.0)]),
            &profile,
        );
        let sum: f64 = weights.values().sum();
        assert!(sum <= 1.0 + 1e-12);
    }
}
