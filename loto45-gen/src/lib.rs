pub mod digits;
pub mod exclusion;
pub mod gate;
pub mod parse;
pub mod profile;
pub mod rules;
pub mod sampler;
pub mod selection;
pub mod stats;

use loto45_db::models::Draw;

/// Historique synthétique pour les tests : draws[0] = le plus récent.
/// Les rounds décroissent de n vers 1, les numéros tournent sur 1..=45.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let base = ((i * 7) % 39) as u8;
            Draw {
                round: (n - i) as u32,
                date: format!("2024-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1),
                numbers: [
                    base + 1,
                    base + 2,
                    base + 3,
                    base + 4,
                    base + 5,
                    base + 6,
                ],
                bonus: ((i * 11) % 45 + 1) as u8,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loto45_db::models::validate_draw;

    #[test]
    fn test_make_test_draws_valid() {
        for draw in make_test_draws(50) {
            validate_draw(&draw.numbers, draw.bonus)
                .unwrap_or_else(|e| panic!("tirage synthétique invalide (round {}): {e}", draw.round));
        }
    }

    #[test]
    fn test_make_test_draws_rounds_descending() {
        let draws = make_test_draws(10);
        assert_eq!(draws[0].round, 10);
        assert_eq!(draws[9].round, 1);
    }
}
