use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use loto45_db::models::{Draw, NumberStats, SavedGame};
use loto45_gen::gate::GenerationOutcome;
use loto45_gen::rules::RuleKind;
use loto45_gen::selection::{Notice, SelectionState};

use crate::import::ImportResult;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn numbers_str(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec!["Round", "Date", "Numéros", "Bonus"]);

    for draw in draws {
        let mut sorted = draw.numbers;
        sorted.sort();
        table.add_row(vec![
            &draw.round.to_string(),
            &draw.date,
            &numbers_str(&sorted),
            &format!("{:2}", draw.bonus),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(stats: &[NumberStats], window: u32) {
    println!("\n📊 Statistiques sur les {} derniers tirages (bonus compris)\n", window);

    let mut table = new_table();
    table.set_header(vec!["Numéro", "Fréquence", "Retard"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    for stat in &sorted {
        table.add_row(vec![
            &format!("{:2}", stat.number),
            &stat.frequency.to_string(),
            &stat.gap.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_rules(rules: &[(RuleKind, Option<Vec<u8>>)]) {
    println!("\n🚫 Règles d'exclusion rapide\n");

    let mut table = new_table();
    table.set_header(vec!["Règle", "Numéros dérivés"]);

    for (kind, numbers) in rules {
        let value = match numbers {
            Some(ns) => numbers_str(ns),
            None => "(pas assez d'historique)".to_string(),
        };
        table.add_row(vec![&kind.to_string(), &value]);
    }
    println!("{table}");
}

pub fn display_selection(state: &SelectionState) {
    println!("\n── État de la sélection ──");

    if state.inclusions.is_empty() {
        println!("Inclusions : (aucune)");
    } else {
        let list: Vec<u8> = state.inclusions.iter().copied().collect();
        println!("Inclusions : {}", numbers_str(&list));
    }

    if state.exclusions.is_empty() {
        println!("Exclusions : (aucune)");
    } else {
        let mut table = new_table();
        table.set_header(vec!["Numéro", "Étiquettes"]);
        for (number, tags) in state.exclusions.iter() {
            let labels = tags
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            table.add_row(vec![&format!("{:2}", number), &labels]);
        }
        println!("{table}");
    }

    let active: Vec<String> = state.active_rules.iter().map(|r| r.to_string()).collect();
    if active.is_empty() {
        println!("Règles actives : (aucune)");
    } else {
        println!("Règles actives : {}", active.join(" ; "));
    }

    println!(
        "Contraintes : doublon exact [{}]  doublon partiel [{}]  consécutifs [{}]",
        if state.checks.prevent_exact { "x" } else { " " },
        if state.checks.prevent_partial { "x" } else { " " },
        if state.checks.prevent_consecutive { "x" } else { " " },
    );
}

pub fn display_notices(notices: &[Notice]) {
    for notice in notices {
        println!("  ℹ {notice}");
    }
}

pub fn display_outcomes(outcomes: &[GenerationOutcome]) {
    println!("\n🎲 Grilles générées\n");

    let mut table = new_table();
    table.set_header(vec!["Case", "Numéros", "Tentatives", "Statut"]);

    for (i, outcome) in outcomes.iter().enumerate() {
        let (status, color) = if !outcome.satisfied {
            ("contrainte non satisfaite".to_string(), Color::Red)
        } else if outcome.used_fallback {
            ("exclusions ignorées (pool épuisé)".to_string(), Color::Yellow)
        } else {
            ("ok".to_string(), Color::Green)
        };
        table.add_row(vec![
            Cell::new(format!("{}", i + 1)),
            Cell::new(numbers_str(&outcome.numbers)),
            Cell::new(outcome.attempts.to_string()),
            Cell::new(status).fg(color),
        ]);
    }
    println!("{table}");

    for (i, outcome) in outcomes.iter().enumerate() {
        if let Some(violation) = outcome.violation {
            println!(
                "⚠ Case {} : budget de re-tirages épuisé, contrainte « {} » non satisfaite ; dernière grille conservée.",
                i + 1,
                violation
            );
        }
        if outcome.used_fallback {
            println!(
                "⚠ Case {} : pool trop petit après exclusions, exclusions ignorées pour ce tirage.",
                i + 1
            );
        }
    }
}

pub fn display_saved_games(games: &[SavedGame], session: &str, round: u32) {
    if games.is_empty() {
        println!("Aucune grille sauvegardée pour la session '{}' au round {}.", session, round);
        return;
    }

    println!("\n💾 Grilles de la session '{}' pour le round {}\n", session, round);

    let mut table = new_table();
    table.set_header(vec!["Case", "Numéros"]);
    for game in games {
        table.add_row(vec![
            &game.slot.to_string(),
            &numbers_str(&game.numbers),
        ]);
    }
    println!("{table}");
}
