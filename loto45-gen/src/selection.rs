use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use loto45_db::models::{Draw, PICK_COUNT};

use crate::exclusion::{ExclusionSet, ExclusionTag};
use crate::gate::CheckConfig;
use crate::parse::parse_selection;
use crate::rules::{rule_numbers, RuleKind};

/// Avis non bloquant produit par une mutation de la sélection. Jamais une
/// erreur : les conflits se résolvent d'eux-mêmes, l'avis informe l'usager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Un numéro exclu a été retiré des inclusions.
    DroppedFromInclusions(u8),
    /// Un numéro inclus a été retiré des exclusions (toutes étiquettes).
    DroppedFromExclusions(u8),
    /// Les 6 places d'inclusion sont prises, le numéro est refusé.
    InclusionsFull(u8),
    /// La règle n'a pas assez d'historique pour produire des numéros.
    NoData(RuleKind),
    /// La règle vient d'être activée sur ces numéros.
    RuleApplied(RuleKind, Vec<u8>),
    /// La règle vient d'être désactivée.
    RuleCleared(RuleKind),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::DroppedFromInclusions(n) => {
                write!(f, "Le numéro {n} exclu a été retiré des inclusions")
            }
            Notice::DroppedFromExclusions(n) => {
                write!(f, "Le numéro {n} inclus a été retiré des exclusions")
            }
            Notice::InclusionsFull(n) => {
                write!(f, "Inclusions pleines (6 max) : le numéro {n} est refusé")
            }
            Notice::NoData(kind) => {
                write!(f, "Pas assez d'historique pour la règle « {kind} »")
            }
            Notice::RuleApplied(kind, numbers) => {
                let list = numbers
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Règle « {kind} » activée : {list}")
            }
            Notice::RuleCleared(kind) => write!(f, "Règle « {kind} » désactivée"),
        }
    }
}

/// État de sélection d'une session : exclusions étiquetées, inclusions,
/// règles actives et contraintes de la grille.
/// Invariant : inclusions ∩ exclusions = ∅ et |inclusions| ≤ 6.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub exclusions: ExclusionSet,
    pub inclusions: BTreeSet<u8>,
    pub active_rules: BTreeSet<RuleKind>,
    pub checks: CheckConfig,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclut un numéro sous une étiquette, en le retirant des inclusions
    /// si nécessaire.
    fn exclude(&mut self, number: u8, tag: ExclusionTag, notices: &mut Vec<Notice>) {
        if self.inclusions.remove(&number) {
            notices.push(Notice::DroppedFromInclusions(number));
        }
        self.exclusions.add_tag(number, tag);
    }

    /// Bascule une règle rapide : étiquette ajoutée numéro par numéro là où
    /// elle manque, retirée là où elle est déjà posée.
    pub fn toggle_rule(
        &mut self,
        kind: RuleKind,
        draws: &[Draw],
        today: NaiveDate,
    ) -> Vec<Notice> {
        let mut notices = Vec::new();
        let Some(numbers) = rule_numbers(kind, draws, today) else {
            notices.push(Notice::NoData(kind));
            return notices;
        };

        let activating = !self.active_rules.contains(&kind);
        let tag = kind.tag();
        for &n in &numbers {
            if activating {
                self.exclude(n, tag, &mut notices);
            } else {
                self.exclusions.remove_tag(n, tag);
            }
        }

        if activating {
            self.active_rules.insert(kind);
            notices.push(Notice::RuleApplied(kind, numbers));
        } else {
            self.active_rules.remove(&kind);
            notices.push(Notice::RuleCleared(kind));
        }
        notices
    }

    /// Bascule l'étiquette « manuel » sur chaque numéro de la saisie.
    pub fn toggle_manual(&mut self, input: &str) -> Vec<Notice> {
        let mut notices = Vec::new();
        for n in parse_selection(input) {
            if self.exclusions.tags_of(n).is_some_and(|t| t.contains(&ExclusionTag::Manual)) {
                self.exclusions.remove_tag(n, ExclusionTag::Manual);
            } else {
                self.exclude(n, ExclusionTag::Manual, &mut notices);
            }
        }
        notices
    }

    /// Bascule l'appartenance aux inclusions pour chaque numéro de la
    /// saisie ; un numéro exclu est d'abord retiré des exclusions.
    pub fn toggle_inclusions(&mut self, input: &str) -> Vec<Notice> {
        let mut notices = Vec::new();
        for n in parse_selection(input) {
            if self.inclusions.remove(&n) {
                continue;
            }
            if self.inclusions.len() >= PICK_COUNT {
                notices.push(Notice::InclusionsFull(n));
                continue;
            }
            if self.exclusions.contains(n) {
                let tags: Vec<ExclusionTag> = self
                    .exclusions
                    .tags_of(n)
                    .map(|t| t.iter().copied().collect())
                    .unwrap_or_default();
                for tag in tags {
                    self.exclusions.remove_tag(n, tag);
                }
                notices.push(Notice::DroppedFromExclusions(n));
            }
            self.inclusions.insert(n);
        }
        notices
    }

    /// Réinitialisation en bloc : les exclusions sont vidées puis les règles
    /// encore actives sont re-dérivées ; les saisies manuelles disparaissent.
    pub fn reset(&mut self, draws: &[Draw], today: NaiveDate) -> Vec<Notice> {
        let mut notices = Vec::new();
        self.exclusions.clear();
        for kind in self.active_rules.clone() {
            match rule_numbers(kind, draws, today) {
                Some(numbers) => {
                    let tag = kind.tag();
                    for &n in &numbers {
                        self.exclude(n, tag, &mut notices);
                    }
                    notices.push(Notice::RuleApplied(kind, numbers));
                }
                None => {
                    self.active_rules.remove(&kind);
                    notices.push(Notice::NoData(kind));
                }
            }
        }
        notices
    }

    /// Vérification d'invariant, utilisée par les tests.
    pub fn is_consistent(&self) -> bool {
        self.inclusions.len() <= PICK_COUNT
            && self.inclusions.iter().all(|&n| !self.exclusions.contains(n))
    }
}
