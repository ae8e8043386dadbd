use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Raison pour laquelle un numéro est exclu. Un numéro peut cumuler
/// plusieurs étiquettes ; il reste exclu tant qu'il en porte au moins une.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExclusionTag {
    Manual,
    LastWeekWinning,
    ThisWeekDate,
    Frequent,
    NotAppeared,
    AllTimeMost,
    AllTimeLeast,
    LastDigit,
    TensDigit,
}

impl std::fmt::Display for ExclusionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ExclusionTag::Manual => "manuel",
            ExclusionTag::LastWeekWinning => "gagnants semaine dernière",
            ExclusionTag::ThisWeekDate => "date de cette semaine",
            ExclusionTag::Frequent => "fréquents récents",
            ExclusionTag::NotAppeared => "non sortis récemment",
            ExclusionTag::AllTimeMost => "plus fréquents (global)",
            ExclusionTag::AllTimeLeast => "moins fréquents (global)",
            ExclusionTag::LastDigit => "chiffre des unités",
            ExclusionTag::TensDigit => "tranche des dizaines",
        };
        write!(f, "{label}")
    }
}

/// Ensemble d'exclusion : numéro → étiquettes cumulées.
/// Invariant : aucune entrée avec un ensemble d'étiquettes vide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSet {
    entries: BTreeMap<u8, BTreeSet<ExclusionTag>>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.entries.contains_key(&number)
    }

    /// Tous les numéros exclus, triés.
    pub fn numbers(&self) -> BTreeSet<u8> {
        self.entries.keys().copied().collect()
    }

    pub fn tags_of(&self, number: u8) -> Option<&BTreeSet<ExclusionTag>> {
        self.entries.get(&number)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BTreeSet<ExclusionTag>)> {
        self.entries.iter().map(|(&n, tags)| (n, tags))
    }

    /// Ajoute une étiquette. Retourne true si elle était absente.
    pub fn add_tag(&mut self, number: u8, tag: ExclusionTag) -> bool {
        self.entries.entry(number).or_default().insert(tag)
    }

    /// Retire une étiquette ; l'entrée disparaît quand son ensemble se vide.
    /// Retourne true si l'étiquette était présente.
    pub fn remove_tag(&mut self, number: u8, tag: ExclusionTag) -> bool {
        let Some(tags) = self.entries.get_mut(&number) else {
            return false;
        };
        let removed = tags.remove(&tag);
        if tags.is_empty() {
            self.entries.remove(&number);
        }
        removed
    }

    /// Bascule une étiquette sur un numéro. Retourne true si elle a été ajoutée.
    pub fn toggle_tag(&mut self, number: u8, tag: ExclusionTag) -> bool {
        if self.remove_tag(number, tag) {
            false
        } else {
            self.add_tag(number, tag);
            true
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_remove_tag() {
        let mut set = ExclusionSet::new();
        assert!(set.add_tag(7, ExclusionTag::Manual));
        assert!(set.contains(7));
        assert!(set.remove_tag(7, ExclusionTag::Manual));
        assert!(!set.contains(7), "l'entrée doit disparaître sans étiquette");
        assert!(set.is_empty());
    }

    #[test]
    fn test_multiple_tags_accumulate() {
        let mut set = ExclusionSet::new();
        set.add_tag(7, ExclusionTag::Manual);
        set.add_tag(7, ExclusionTag::Frequent);

        // Retirer une étiquette ne lève pas l'exclusion si une autre reste
        set.remove_tag(7, ExclusionTag::Manual);
        assert!(set.contains(7));
        assert_eq!(
            set.tags_of(7).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![ExclusionTag::Frequent]
        );
    }

    #[test]
    fn test_toggle_is_idempotent_pairwise() {
        let mut set = ExclusionSet::new();
        set.add_tag(12, ExclusionTag::Frequent);
        let before = set.clone();

        assert!(set.toggle_tag(12, ExclusionTag::Manual));
        assert!(!set.toggle_tag(12, ExclusionTag::Manual));
        assert_eq!(set, before, "double bascule = état initial");
    }

    #[test]
    fn test_remove_absent_tag() {
        let mut set = ExclusionSet::new();
        assert!(!set.remove_tag(3, ExclusionTag::Manual));
        set.add_tag(3, ExclusionTag::Frequent);
        assert!(!set.remove_tag(3, ExclusionTag::Manual));
        assert!(set.contains(3));
    }

    #[test]
    fn test_numbers_sorted() {
        let mut set = ExclusionSet::new();
        set.add_tag(30, ExclusionTag::Manual);
        set.add_tag(5, ExclusionTag::Manual);
        set.add_tag(17, ExclusionTag::Manual);
        let numbers: Vec<u8> = set.numbers().into_iter().collect();
        assert_eq!(numbers, vec![5, 17, 30]);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut set = ExclusionSet::new();
        set.add_tag(7, ExclusionTag::Manual);
        set.add_tag(7, ExclusionTag::LastDigit);
        set.add_tag(21, ExclusionTag::Frequent);

        let json = serde_json::to_string(&set).unwrap();
        let back: ExclusionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, back);
    }
}
