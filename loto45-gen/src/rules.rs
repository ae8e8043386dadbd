use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use loto45_db::models::{Draw, POOL_SIZE};

use crate::digits::{dominant_digit, last_digit_numbers, ones_digit, tens_band_numbers, tens_digit};
use crate::exclusion::ExclusionTag;

/// Fenêtre des analyses « récentes » (en tirages).
pub const RECENT_WINDOW: usize = 15;

/// Règles d'exclusion rapide, chacune basculable indépendamment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    LastWeekWinning,
    ThisWeekDate,
    Frequent,
    NotAppeared,
    AllTimeMost,
    AllTimeLeast,
    LastDigit,
    TensDigit,
}

impl RuleKind {
    pub const ALL: [RuleKind; 8] = [
        RuleKind::LastWeekWinning,
        RuleKind::ThisWeekDate,
        RuleKind::Frequent,
        RuleKind::NotAppeared,
        RuleKind::AllTimeMost,
        RuleKind::AllTimeLeast,
        RuleKind::LastDigit,
        RuleKind::TensDigit,
    ];

    pub fn tag(&self) -> ExclusionTag {
        match self {
            RuleKind::LastWeekWinning => ExclusionTag::LastWeekWinning,
            RuleKind::ThisWeekDate => ExclusionTag::ThisWeekDate,
            RuleKind::Frequent => ExclusionTag::Frequent,
            RuleKind::NotAppeared => ExclusionTag::NotAppeared,
            RuleKind::AllTimeMost => ExclusionTag::AllTimeMost,
            RuleKind::AllTimeLeast => ExclusionTag::AllTimeLeast,
            RuleKind::LastDigit => ExclusionTag::LastDigit,
            RuleKind::TensDigit => ExclusionTag::TensDigit,
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RuleKind::LastWeekWinning => "gagnants de la semaine dernière",
            RuleKind::ThisWeekDate => "date du prochain tirage",
            RuleKind::Frequent => "fréquents sur 15 tirages",
            RuleKind::NotAppeared => "non sortis sur 15 tirages",
            RuleKind::AllTimeMost => "plus fréquents (historique complet)",
            RuleKind::AllTimeLeast => "moins fréquents (historique complet)",
            RuleKind::LastDigit => "bande du chiffre des unités",
            RuleKind::TensDigit => "bande des dizaines",
        };
        write!(f, "{label}")
    }
}

/// Numéros dérivés d'une règle. None = pas assez d'historique.
/// draws[0] = tirage le plus récent.
pub fn rule_numbers(kind: RuleKind, draws: &[Draw], today: NaiveDate) -> Option<Vec<u8>> {
    match kind {
        RuleKind::LastWeekWinning => last_week_winning(draws),
        RuleKind::ThisWeekDate => Some(this_week_date(today)),
        RuleKind::Frequent => frequent(draws),
        RuleKind::NotAppeared => not_appeared(draws),
        RuleKind::AllTimeMost => all_time_most(draws),
        RuleKind::AllTimeLeast => all_time_least(draws),
        RuleKind::LastDigit => {
            dominant_digit(draws, ones_digit).map(|pick| last_digit_numbers(pick.digit))
        }
        RuleKind::TensDigit => {
            dominant_digit(draws, tens_digit).map(|pick| tens_band_numbers(pick.digit))
        }
    }
}

/// Les 6 numéros + bonus du tirage au round maximal.
pub fn last_week_winning(draws: &[Draw]) -> Option<Vec<u8>> {
    let last = draws.iter().max_by_key(|d| d.round)?;
    let mut numbers: Vec<u8> = last.all_slots().to_vec();
    numbers.sort_unstable();
    numbers.dedup();
    Some(numbers)
}

/// Samedi à venir (aujourd'hui compris si on est samedi).
pub fn upcoming_saturday(today: NaiveDate) -> NaiveDate {
    let offset = (7 + Weekday::Sat.num_days_from_monday()
        - today.weekday().num_days_from_monday()) % 7;
    today + Days::new(offset as u64)
}

/// Mois et jour de la date du prochain tirage, chacun gardé s'il tient
/// dans 1..=45 ; une seule occurrence si mois == jour.
pub fn this_week_date(today: NaiveDate) -> Vec<u8> {
    let target = upcoming_saturday(today);
    let mut numbers = Vec::new();
    let month = target.month() as u8;
    let day = target.day() as u8;
    if (1..=POOL_SIZE).contains(&month) {
        numbers.push(month);
    }
    if day != month && (1..=POOL_SIZE).contains(&day) {
        numbers.push(day);
    }
    numbers.sort_unstable();
    numbers
}

fn count_slots(draws: &[Draw]) -> BTreeMap<u8, u32> {
    let mut counts = BTreeMap::new();
    for draw in draws {
        for n in draw.all_slots() {
            *counts.entry(n).or_insert(0) += 1;
        }
    }
    counts
}

fn tied_at_max(counts: &BTreeMap<u8, u32>) -> Vec<u8> {
    let Some(&max) = counts.values().max() else {
        return Vec::new();
    };
    counts
        .iter()
        .filter(|(_, &c)| c == max)
        .map(|(&n, _)| n)
        .collect()
}

/// Numéros les plus fréquents sur les 15 derniers tirages, dernier exclu.
/// Toutes les égalités au maximum sont retournées.
pub fn frequent(draws: &[Draw]) -> Option<Vec<u8>> {
    if draws.len() < 2 {
        return None;
    }
    let window = &draws[1..draws.len().min(RECENT_WINDOW + 1)];
    let counts = count_slots(window);
    Some(tied_at_max(&counts))
}

/// Complément dans 1..=45 des numéros apparus sur les 15 derniers tirages
/// (dernier compris).
pub fn not_appeared(draws: &[Draw]) -> Option<Vec<u8>> {
    if draws.is_empty() {
        return None;
    }
    let window = &draws[..draws.len().min(RECENT_WINDOW)];
    let appeared = count_slots(window);
    Some(
        (1..=POOL_SIZE)
            .filter(|n| !appeared.contains_key(n))
            .collect(),
    )
}

/// Égalités au maximum d'occurrences sur tout l'historique.
pub fn all_time_most(draws: &[Draw]) -> Option<Vec<u8>> {
    if draws.is_empty() {
        return None;
    }
    Some(tied_at_max(&count_slots(draws)))
}

/// Égalités au minimum d'occurrences sur tout l'historique, les 45 numéros
/// étant initialisés à zéro (un numéro jamais sorti peut donc gagner).
pub fn all_time_least(draws: &[Draw]) -> Option<Vec<u8>> {
    if draws.is_empty() {
        return None;
    }
    let mut counts: BTreeMap<u8, u32> = (1..=POOL_SIZE).map(|n| (n, 0)).collect();
    for draw in draws {
        for n in draw.all_slots() {
            if let Some(c) = counts.get_mut(&n) {
                *c += 1;
            }
        }
    }
    let min = *counts.values().min()?;
    Some(
        counts
            .iter()
            .filter(|(_, &c)| c == min)
            .map(|(&n, _)| n)
            .collect(),
    )
}
