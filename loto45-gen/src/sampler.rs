use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::Rng;

use loto45_db::models::{PICK_COUNT, POOL_SIZE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleResult {
    pub numbers: [u8; 6],
    /// true si les exclusions ont dû être ignorées : le pool filtré ne
    /// suffisait plus à remplir la grille (contrainte souple).
    pub used_fallback: bool,
}

/// Tire une grille de 6 numéros : les inclusions et les numéros déjà placés
/// sont repris tels quels, le reste est pioché uniformément sans remise dans
/// 1..=45 privé des exclusions. Si le pool filtré est trop petit pour
/// compléter la grille, les exclusions sont ignorées pour ce tirage.
///
/// Invariant appelant : |placed ∪ inclusions| ≤ 6.
pub fn sample_combination(
    inclusions: &BTreeSet<u8>,
    exclusions: &BTreeSet<u8>,
    placed: &[u8],
    rng: &mut StdRng,
) -> SampleResult {
    let mut seed: BTreeSet<u8> = inclusions.clone();
    seed.extend(placed.iter().copied());

    let base: Vec<u8> = (1..=POOL_SIZE).filter(|n| !seed.contains(n)).collect();
    let filtered: Vec<u8> = base
        .iter()
        .copied()
        .filter(|n| !exclusions.contains(n))
        .collect();

    let needed = PICK_COUNT.saturating_sub(seed.len());
    let used_fallback = filtered.len() < needed;
    let mut pool = if used_fallback { base } else { filtered };

    let mut combination: Vec<u8> = seed.into_iter().collect();
    for _ in 0..needed {
        let idx = rng.random_range(0..pool.len());
        combination.push(pool.swap_remove(idx));
    }
    combination.sort_unstable();

    let mut numbers = [0u8; 6];
    for (i, &n) in combination.iter().take(PICK_COUNT).enumerate() {
        numbers[i] = n;
    }
    SampleResult { numbers, used_fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn assert_valid(numbers: &[u8; 6]) {
        let set: BTreeSet<u8> = numbers.iter().copied().collect();
        assert_eq!(set.len(), 6, "6 numéros distincts attendus : {numbers:?}");
        assert!(numbers.iter().all(|&n| (1..=45).contains(&n)));
        assert!(numbers.windows(2).all(|w| w[0] < w[1]), "grille triée attendue");
    }

    #[test]
    fn test_sample_no_constraints() {
        let mut rng = rng();
        for _ in 0..50 {
            let result = sample_combination(&BTreeSet::new(), &BTreeSet::new(), &[], &mut rng);
            assert_valid(&result.numbers);
            assert!(!result.used_fallback);
        }
    }

    #[test]
    fn test_inclusions_always_present() {
        let mut rng = rng();
        let inclusions: BTreeSet<u8> = [7, 14, 21].into_iter().collect();
        for _ in 0..50 {
            let result = sample_combination(&inclusions, &BTreeSet::new(), &[], &mut rng);
            assert_valid(&result.numbers);
            for &n in &inclusions {
                assert!(result.numbers.contains(&n), "inclusion {n} absente de {:?}", result.numbers);
            }
        }
    }

    #[test]
    fn test_exclusions_avoided() {
        let mut rng = rng();
        let exclusions: BTreeSet<u8> = (1..=20).collect();
        for _ in 0..50 {
            let result = sample_combination(&BTreeSet::new(), &exclusions, &[], &mut rng);
            assert_valid(&result.numbers);
            assert!(!result.used_fallback);
            assert!(result.numbers.iter().all(|n| !exclusions.contains(n)));
        }
    }

    #[test]
    fn test_placed_numbers_kept() {
        let mut rng = rng();
        let result = sample_combination(&BTreeSet::new(), &BTreeSet::new(), &[3, 11, 22], &mut rng);
        assert_valid(&result.numbers);
        for n in [3, 11, 22] {
            assert!(result.numbers.contains(&n));
        }
    }

    #[test]
    fn test_fallback_when_pool_too_small() {
        // 5 inclusions + 40 exclusions : il ne reste rien à piocher → les
        // exclusions sont ignorées, jamais d'échec
        let mut rng = rng();
        let inclusions: BTreeSet<u8> = [1, 2, 3, 4, 5].into_iter().collect();
        let exclusions: BTreeSet<u8> = (6..=45).collect();
        let result = sample_combination(&inclusions, &exclusions, &[], &mut rng);
        assert_valid(&result.numbers);
        assert!(result.used_fallback, "le repli doit être signalé");
        for n in 1..=5 {
            assert!(result.numbers.contains(&n));
        }
    }

    #[test]
    fn test_no_fallback_when_pool_exactly_sufficient() {
        // 39 exclusions, 6 numéros restants : le pool suffit tout juste
        let mut rng = rng();
        let exclusions: BTreeSet<u8> = (1..=39).collect();
        let result = sample_combination(&BTreeSet::new(), &exclusions, &[], &mut rng);
        assert!(!result.used_fallback);
        assert_eq!(result.numbers, [40, 41, 42, 43, 44, 45]);
    }

    #[test]
    fn test_full_seed_samples_nothing() {
        let mut rng = rng();
        let inclusions: BTreeSet<u8> = [5, 12, 19, 26, 33, 40].into_iter().collect();
        let result = sample_combination(&inclusions, &BTreeSet::new(), &[], &mut rng);
        assert_eq!(result.numbers, [5, 12, 19, 26, 33, 40]);
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let a = sample_combination(&BTreeSet::new(), &BTreeSet::new(), &[], &mut rng());
        let b = sample_combination(&BTreeSet::new(), &BTreeSet::new(), &[], &mut rng());
        assert_eq!(a, b);
    }
}
