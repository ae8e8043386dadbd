use std::collections::BTreeSet;

use loto45_db::models::POOL_SIZE;

/// Grammaire de saisie libre : jetons séparés par des virgules, chacun soit
/// un entier de 1 à 45, soit une plage inclusive "a-b" avec 1 ≤ a ≤ b ≤ 45.
/// Les jetons invalides sont ignorés silencieusement, les valides conservés.
/// Retourne les numéros triés et dédupliqués.
pub fn parse_selection(input: &str) -> Vec<u8> {
    let mut numbers = BTreeSet::new();

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some((lo_str, hi_str)) = token.split_once('-') {
            let (Ok(lo), Ok(hi)) = (lo_str.trim().parse::<u8>(), hi_str.trim().parse::<u8>())
            else {
                continue;
            };
            if lo >= 1 && lo <= hi && hi <= POOL_SIZE {
                numbers.extend(lo..=hi);
            }
        } else if let Ok(n) = token.parse::<u8>() {
            if n >= 1 && n <= POOL_SIZE {
                numbers.insert(n);
            }
        }
    }

    numbers.into_iter().collect()
}
