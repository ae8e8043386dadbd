use std::collections::BTreeMap;

use loto45_db::models::{Draw, POOL_SIZE};

/// Fenêtre maximale (en tirages) pour départager les chiffres à égalité.
pub const TIE_BREAK_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitPick {
    pub digit: u8,
    /// Nombre de tirages consultés (1 si pas d'égalité au premier).
    pub rounds_examined: usize,
    /// true si l'égalité a persisté jusqu'à épuisement de la fenêtre
    /// (le gagnant est alors le premier chiffre dans l'ordre d'égalité).
    pub had_tie: bool,
}

pub fn ones_digit(n: u8) -> u8 {
    n % 10
}

pub fn tens_digit(n: u8) -> u8 {
    n / 10
}

/// Chiffre dominant parmi les 7 cases du dernier tirage, égalités résolues
/// en élargissant la fenêtre d'un tirage à la fois (5 max) : à chaque
/// élargissement, seuls les chiffres encore à égalité sont recomptés sur
/// les numéros du tirage ajouté, cumuls conservés. À épuisement, le premier
/// chiffre de la liste d'égalité (ordre croissant) l'emporte.
///
/// draws[0] = tirage le plus récent. Retourne None sans historique.
pub fn dominant_digit(draws: &[Draw], digit_of: fn(u8) -> u8) -> Option<DigitPick> {
    let first = draws.first()?;

    let mut counts: BTreeMap<u8, u32> = BTreeMap::new();
    for n in first.all_slots() {
        *counts.entry(digit_of(n)).or_insert(0) += 1;
    }

    let max = *counts.values().max()?;
    // Ordre d'égalité : chiffres croissants (itération BTreeMap)
    let mut tied: Vec<u8> = counts
        .iter()
        .filter(|(_, &c)| c == max)
        .map(|(&d, _)| d)
        .collect();
    let mut totals: BTreeMap<u8, u32> = tied.iter().map(|&d| (d, max)).collect();
    let mut rounds_examined = 1;

    while tied.len() > 1 && rounds_examined < TIE_BREAK_WINDOW && rounds_examined < draws.len() {
        let next = &draws[rounds_examined];
        for n in next.all_slots() {
            let d = digit_of(n);
            if let Some(total) = totals.get_mut(&d) {
                *total += 1;
            }
        }
        rounds_examined += 1;

        let best = tied.iter().map(|d| totals[d]).max().unwrap_or(0);
        tied.retain(|d| totals[d] == best);
    }

    Some(DigitPick {
        digit: tied[0],
        rounds_examined,
        had_tie: tied.len() > 1,
    })
}

/// Numéros de la bande du chiffre des unités : d, 10+d, 20+d, 30+d, 40+d,
/// restreints à 1..=45.
pub fn last_digit_numbers(digit: u8) -> Vec<u8> {
    (0..5)
        .map(|band| band * 10 + digit)
        .filter(|&n| n >= 1 && n <= POOL_SIZE)
        .collect()
}

/// Bande contiguë du chiffre des dizaines : 0→1-10, 1→11-20, 2→21-30,
/// 3→31-40, 4→41-45.
pub fn tens_band_numbers(digit: u8) -> Vec<u8> {
    let lo = digit * 10 + 1;
    let hi = ((digit + 1) * 10).min(POOL_SIZE);
    if lo > POOL_SIZE {
        return Vec::new();
    }
    (lo..=hi).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(round: u32, numbers: [u8; 6], bonus: u8) -> Draw {
        Draw {
            round,
            date: "2024-01-06".to_string(),
            numbers,
            bonus,
        }
    }

    #[test]
    fn test_ones_and_tens_digit() {
        assert_eq!(ones_digit(7), 7);
        assert_eq!(ones_digit(30), 0);
        assert_eq!(ones_digit(45), 5);
        assert_eq!(tens_digit(7), 0);
        assert_eq!(tens_digit(10), 1);
        assert_eq!(tens_digit(45), 4);
    }

    #[test]
    fn test_dominant_digit_no_history() {
        assert_eq!(dominant_digit(&[], ones_digit), None);
    }

    #[test]
    fn test_dominant_digit_clear_winner() {
        // Unités : 3 apparaît trois fois (3, 13, 23), aucune autre autant
        let draws = vec![draw(10, [3, 13, 23, 5, 16, 29], 41)];
        let pick = dominant_digit(&draws, ones_digit).unwrap();
        assert_eq!(pick.digit, 3);
        assert_eq!(pick.rounds_examined, 1);
        assert!(!pick.had_tie);
    }

    #[test]
    fn test_dominant_digit_tie_resolved_by_widening() {
        // Round 10 : unités 1 et 2 à égalité (deux fois chacune)
        // Round 9 : le chiffre 2 réapparaît, pas le 1 → 2 gagne
        let draws = vec![
            draw(10, [1, 11, 2, 12, 5, 16], 27),
            draw(9, [22, 35, 44, 8, 19, 26], 30),
        ];
        let pick = dominant_digit(&draws, ones_digit).unwrap();
        assert_eq!(pick.digit, 2);
        assert_eq!(pick.rounds_examined, 2);
        assert!(!pick.had_tie);
    }

    #[test]
    fn test_dominant_digit_only_tied_digits_recounted() {
        // Round 10 : unités 1 et 2 à égalité ; le 7 y est absent du haut
        // Round 9 : plein de 7, mais 7 n'est pas en lice → ne gagne pas
        let draws = vec![
            draw(10, [1, 11, 2, 12, 5, 16], 27),
            draw(9, [7, 17, 37, 22, 35, 44], 9),
        ];
        let pick = dominant_digit(&draws, ones_digit).unwrap();
        assert_eq!(pick.digit, 2, "seuls les chiffres à égalité sont recomptés");
    }

    #[test]
    fn test_dominant_digit_exhaustion_picks_first_in_tie_order() {
        // Égalité parfaite entre unités 1 et 2 sur chaque tirage consulté
        // (le bonus 45 apporte l'unité 5, jamais en lice)
        let draws: Vec<Draw> = (1..=8)
            .rev()
            .map(|round| draw(round, [1, 11, 21, 2, 12, 22], 45))
            .collect();
        let pick = dominant_digit(&draws, ones_digit).unwrap();
        assert_eq!(pick.rounds_examined, TIE_BREAK_WINDOW, "la fenêtre doit s'épuiser");
        assert!(pick.had_tie);
        assert_eq!(pick.digit, 1, "premier chiffre dans l'ordre d'égalité");
    }

    #[test]
    fn test_dominant_digit_window_capped_by_history() {
        // Égalité persistante mais seulement 2 tirages disponibles
        let draws = vec![
            draw(2, [1, 11, 2, 12, 5, 16], 45),
            draw(1, [21, 31, 22, 32, 6, 17], 45),
        ];
        let pick = dominant_digit(&draws, ones_digit).unwrap();
        assert_eq!(pick.rounds_examined, 2);
        assert!(pick.had_tie);
        assert_eq!(pick.digit, 1);
    }

    #[test]
    fn test_dominant_tens_digit() {
        // Dizaines : 2 apparaît trois fois (21, 24, 28)
        let draws = vec![draw(10, [21, 24, 28, 5, 16, 39], 43)];
        let pick = dominant_digit(&draws, tens_digit).unwrap();
        assert_eq!(pick.digit, 2);
    }

    #[test]
    fn test_last_digit_numbers() {
        assert_eq!(last_digit_numbers(3), vec![3, 13, 23, 33, 43]);
        assert_eq!(last_digit_numbers(0), vec![10, 20, 30, 40], "0 seul est hors pool");
        assert_eq!(last_digit_numbers(5), vec![5, 15, 25, 35, 45]);
        assert_eq!(last_digit_numbers(6), vec![6, 16, 26, 36], "46 est hors pool");
    }

    #[test]
    fn test_tens_band_numbers() {
        assert_eq!(tens_band_numbers(0), (1..=10).collect::<Vec<u8>>());
        assert_eq!(tens_band_numbers(1), (11..=20).collect::<Vec<u8>>());
        assert_eq!(tens_band_numbers(4), vec![41, 42, 43, 44, 45]);
    }
}
