use anyhow::{bail, Result};

/// Taille du pool Lotto 6/45.
pub const POOL_SIZE: u8 = 45;
/// Nombre de numéros principaux par grille.
pub const PICK_COUNT: usize = 6;
/// Nombre de cases (grilles) gérées simultanément.
pub const SLOT_COUNT: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    /// Numéro de tirage, attribué par l'opérateur, strictement croissant.
    pub round: u32,
    /// Date du tirage (AAAA-MM-JJ).
    pub date: String,
    pub numbers: [u8; 6],
    pub bonus: u8,
}

impl Draw {
    /// Les 7 cases comptées par les analyses : 6 numéros principaux + bonus.
    pub fn all_slots(&self) -> [u8; 7] {
        [
            self.numbers[0],
            self.numbers[1],
            self.numbers[2],
            self.numbers[3],
            self.numbers[4],
            self.numbers[5],
            self.bonus,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedGame {
    pub session: String,
    pub round: u32,
    /// Case 1 à 5.
    pub slot: u8,
    pub numbers: [u8; 6],
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    /// Nombre de tirages depuis la dernière apparition.
    pub gap: u32,
}

pub fn validate_numbers(numbers: &[u8; 6]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > POOL_SIZE {
            bail!("Numéro {} hors limites (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

pub fn validate_draw(numbers: &[u8; 6], bonus: u8) -> Result<()> {
    validate_numbers(numbers)?;
    // Le bonus est tiré séparément : il peut coïncider avec un numéro principal.
    if bonus < 1 || bonus > POOL_SIZE {
        bail!("Bonus {} hors limites (1-{})", bonus, POOL_SIZE);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 7).is_ok());
        assert!(validate_draw(&[40, 41, 42, 43, 44, 45], 1).is_ok());
    }

    #[test]
    fn test_validate_draw_number_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6], 7).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 46], 7).is_err());
    }

    #[test]
    fn test_validate_draw_bonus_out_of_range() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 0).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 46).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate_number() {
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6], 7).is_err());
    }

    #[test]
    fn test_validate_draw_bonus_may_coincide() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 6).is_ok());
    }

    #[test]
    fn test_all_slots() {
        let draw = Draw {
            round: 1,
            date: "2024-01-06".to_string(),
            numbers: [1, 2, 3, 4, 5, 6],
            bonus: 7,
        };
        assert_eq!(draw.all_slots(), [1, 2, 3, 4, 5, 6, 7]);
    }
}
