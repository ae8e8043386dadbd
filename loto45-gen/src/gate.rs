use std::collections::BTreeSet;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use loto45_db::models::Draw;

use crate::sampler::sample_combination;

/// Budget de re-tirages par case.
pub const MAX_ATTEMPTS: u32 = 1000;
/// Longueur de suite consécutive rejetée.
pub const CONSECUTIVE_RUN: usize = 4;

/// Contraintes structurelles, chacune basculable indépendamment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    pub prevent_exact: bool,
    pub prevent_partial: bool,
    pub prevent_consecutive: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            prevent_exact: true,
            prevent_partial: true,
            prevent_consecutive: true,
        }
    }
}

impl CheckConfig {
    pub fn none() -> Self {
        Self {
            prevent_exact: false,
            prevent_partial: false,
            prevent_consecutive: false,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.prevent_exact || self.prevent_partial || self.prevent_consecutive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    ExactDuplicate,
    PartialDuplicate,
    ConsecutiveRun,
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CheckKind::ExactDuplicate => "doublon exact d'un tirage passé",
            CheckKind::PartialDuplicate => "5 numéros communs avec un tirage passé",
            CheckKind::ConsecutiveRun => "4 numéros consécutifs ou plus",
        };
        write!(f, "{label}")
    }
}

/// Résultat d'une génération de case : toujours une grille, jamais d'échec.
/// satisfied = false signifie budget épuisé, dernière tentative conservée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub numbers: [u8; 6],
    pub satisfied: bool,
    pub attempts: u32,
    pub used_fallback: bool,
    /// Contrainte encore violée quand satisfied = false.
    pub violation: Option<CheckKind>,
}

/// true si la grille (triée) contient 4 numéros consécutifs ou plus.
pub fn has_consecutive_run(numbers: &[u8; 6]) -> bool {
    let mut sorted = *numbers;
    sorted.sort_unstable();
    let mut run = 1;
    for w in sorted.windows(2) {
        if w[1] == w[0] + 1 {
            run += 1;
            if run >= CONSECUTIVE_RUN {
                return true;
            }
        } else {
            run = 1;
        }
    }
    false
}

fn shared_count(numbers: &[u8; 6], draw: &Draw) -> usize {
    numbers.iter().filter(|n| draw.numbers.contains(n)).count()
}

/// Identique (en tant qu'ensemble) aux 6 numéros d'un tirage passé.
pub fn matches_history_exact(numbers: &[u8; 6], draws: &[Draw]) -> bool {
    draws.iter().any(|d| shared_count(numbers, d) == 6)
}

/// Partage exactement 5 numéros avec un tirage passé.
pub fn matches_history_partial(numbers: &[u8; 6], draws: &[Draw]) -> bool {
    draws.iter().any(|d| shared_count(numbers, d) == 5)
}

/// Première contrainte activée que la grille viole, None si elle passe.
pub fn first_violation(
    numbers: &[u8; 6],
    draws: &[Draw],
    config: &CheckConfig,
) -> Option<CheckKind> {
    if config.prevent_exact && matches_history_exact(numbers, draws) {
        return Some(CheckKind::ExactDuplicate);
    }
    if config.prevent_partial && matches_history_partial(numbers, draws) {
        return Some(CheckKind::PartialDuplicate);
    }
    if config.prevent_consecutive && has_consecutive_run(numbers) {
        return Some(CheckKind::ConsecutiveRun);
    }
    None
}

/// Génère une case : re-tirage borné tant qu'une contrainte activée est
/// violée. À budget épuisé la dernière grille est acceptée telle quelle.
/// Sans contrainte activée, le premier tirage est accepté directement.
pub fn generate_slot(
    draws: &[Draw],
    inclusions: &BTreeSet<u8>,
    exclusions: &BTreeSet<u8>,
    placed: &[u8],
    config: &CheckConfig,
    rng: &mut StdRng,
) -> GenerationOutcome {
    let first = sample_combination(inclusions, exclusions, placed, rng);
    if !config.any_enabled() {
        return GenerationOutcome {
            numbers: first.numbers,
            satisfied: true,
            attempts: 1,
            used_fallback: first.used_fallback,
            violation: None,
        };
    }

    let mut sample = first;
    let mut attempts = 1;
    loop {
        match first_violation(&sample.numbers, draws, config) {
            None => {
                return GenerationOutcome {
                    numbers: sample.numbers,
                    satisfied: true,
                    attempts,
                    used_fallback: sample.used_fallback,
                    violation: None,
                };
            }
            Some(violation) if attempts >= MAX_ATTEMPTS => {
                return GenerationOutcome {
                    numbers: sample.numbers,
                    satisfied: false,
                    attempts,
                    used_fallback: sample.used_fallback,
                    violation: Some(violation),
                };
            }
            Some(_) => {
                sample = sample_combination(inclusions, exclusions, placed, rng);
                attempts += 1;
            }
        }
    }
}

/// Génère `count` cases indépendantes : pool frais et mêmes inclusions
/// pour chacune, pas de report de consommation entre cases.
pub fn generate_games(
    draws: &[Draw],
    inclusions: &BTreeSet<u8>,
    exclusions: &BTreeSet<u8>,
    config: &CheckConfig,
    count: usize,
    rng: &mut StdRng,
) -> Vec<GenerationOutcome> {
    (0..count)
        .map(|_| generate_slot(draws, inclusions, exclusions, &[], config, rng))
        .collect()
}
