use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use loto45_db::db::{count_draws, fetch_all_draws, fetch_last_draws, latest_round, save_game};
use loto45_db::models::{SavedGame, SLOT_COUNT};
use loto45_gen::gate::{generate_games, GenerationOutcome};
use loto45_gen::profile::{load_profile, save_profile};
use loto45_gen::rules::RuleKind;
use loto45_gen::selection::SelectionState;

use crate::display::{
    display_draws, display_notices, display_outcomes, display_selection,
};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Rule,
    Exclude,
    Include,
    Checks,
    Generate,
    Show,
    Reset,
    Profile,
    Save,
    History,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "regle" | "règle" | "rule" => Some(InteractiveCommand::Rule),
        "2" | "exclure" | "exclude" | "excl" => Some(InteractiveCommand::Exclude),
        "3" | "inclure" | "include" | "incl" => Some(InteractiveCommand::Include),
        "4" | "contraintes" | "checks" => Some(InteractiveCommand::Checks),
        "5" | "generer" | "générer" | "generate" | "gen" => Some(InteractiveCommand::Generate),
        "6" | "etat" | "état" | "show" => Some(InteractiveCommand::Show),
        "7" | "reinitialiser" | "réinitialiser" | "reset" => Some(InteractiveCommand::Reset),
        "8" | "profil" | "profile" => Some(InteractiveCommand::Profile),
        "9" | "sauvegarder" | "save" => Some(InteractiveCommand::Save),
        "10" | "historique" | "history" | "hist" => Some(InteractiveCommand::History),
        "11" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu() {
    println!();
    println!("── Mode interactif ──");
    println!("  1. regle         Basculer une règle d'exclusion rapide");
    println!("  2. exclure       Exclure/réadmettre des numéros (ex: 7,12-15)");
    println!("  3. inclure       Inclure/retirer des numéros imposés");
    println!("  4. contraintes   Basculer les contraintes de grille");
    println!("  5. generer       Générer 1 à 5 grilles");
    println!("  6. etat          Afficher la sélection courante");
    println!("  7. reinitialiser Vider les exclusions (règles actives re-dérivées)");
    println!("  8. profil        Sauver/charger le profil de sélection");
    println!("  9. sauvegarder   Sauvegarder les grilles générées");
    println!("  10. historique   Derniers tirages");
    println!("  11. quitter      Quitter");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn prompt_rule(state: &SelectionState) -> Result<Option<RuleKind>> {
    println!("Règles disponibles :");
    for (i, kind) in RuleKind::ALL.iter().enumerate() {
        let marker = if state.active_rules.contains(kind) { "x" } else { " " };
        println!("  {}. [{marker}] {kind}", i + 1);
    }
    let input = prompt("Règle à basculer (1-8, vide pour annuler) : ")?;
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<usize>() {
        Ok(i) if (1..=RuleKind::ALL.len()).contains(&i) => Ok(Some(RuleKind::ALL[i - 1])),
        _ => {
            println!("Choix invalide : '{}'", input);
            Ok(None)
        }
    }
}

fn cmd_rule(conn: &loto45_db::rusqlite::Connection, state: &mut SelectionState) -> Result<()> {
    let Some(kind) = prompt_rule(state)? else {
        return Ok(());
    };
    let draws = fetch_all_draws(conn)?;
    let today = chrono::Local::now().date_naive();
    display_notices(&state.toggle_rule(kind, &draws, today));
    Ok(())
}

fn cmd_exclude(state: &mut SelectionState) -> Result<()> {
    let input = prompt("Numéros à basculer en exclusion (ex: 7,12-15) : ")?;
    display_notices(&state.toggle_manual(&input));
    display_selection(state);
    Ok(())
}

fn cmd_include(state: &mut SelectionState) -> Result<()> {
    let input = prompt("Numéros à basculer en inclusion (6 max) : ")?;
    display_notices(&state.toggle_inclusions(&input));
    display_selection(state);
    Ok(())
}

fn cmd_checks(state: &mut SelectionState) -> Result<()> {
    println!("Contraintes :");
    println!("  1. [{}] doublon exact", if state.checks.prevent_exact { "x" } else { " " });
    println!("  2. [{}] doublon partiel (5 communs)", if state.checks.prevent_partial { "x" } else { " " });
    println!("  3. [{}] 4 consécutifs", if state.checks.prevent_consecutive { "x" } else { " " });
    let input = prompt("Contrainte à basculer (1-3, vide pour annuler) : ")?;
    match input.as_str() {
        "" => {}
        "1" => state.checks.prevent_exact = !state.checks.prevent_exact,
        "2" => state.checks.prevent_partial = !state.checks.prevent_partial,
        "3" => state.checks.prevent_consecutive = !state.checks.prevent_consecutive,
        _ => println!("Choix invalide : '{}'", input),
    }
    Ok(())
}

fn cmd_generate(
    conn: &loto45_db::rusqlite::Connection,
    state: &SelectionState,
    last_outcomes: &mut Vec<GenerationOutcome>,
) -> Result<()> {
    let n_str = prompt_with_default("Nombre de cases (1-5)", "5")?;
    let n: usize = n_str.parse().context("Nombre invalide")?;
    if !(1..=SLOT_COUNT as usize).contains(&n) {
        println!("Le nombre de cases doit être entre 1 et {}.", SLOT_COUNT);
        return Ok(());
    }

    let seed_str = prompt_with_default("Seed (vide = date du jour)", "")?;
    let seed: u64 = if seed_str.is_empty() {
        let ds = crate::date_seed();
        println!("(Seed du jour : {ds})");
        ds
    } else {
        seed_str.parse().context("Seed invalide")?
    };

    let draws = fetch_all_draws(conn)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let outcomes = generate_games(
        &draws,
        &state.inclusions,
        &state.exclusions.numbers(),
        &state.checks,
        n,
        &mut rng,
    );
    display_outcomes(&outcomes);
    *last_outcomes = outcomes;
    Ok(())
}

fn cmd_reset(conn: &loto45_db::rusqlite::Connection, state: &mut SelectionState) -> Result<()> {
    let draws = fetch_all_draws(conn)?;
    let today = chrono::Local::now().date_naive();
    display_notices(&state.reset(&draws, today));
    display_selection(state);
    Ok(())
}

fn cmd_profile(state: &mut SelectionState) -> Result<()> {
    let action = prompt("Sauver ou charger le profil ? (s/c) : ")?;
    let path_str = prompt_with_default("Fichier de profil", "profil.json")?;
    let path = PathBuf::from(path_str);
    match action.to_lowercase().as_str() {
        "s" => {
            save_profile(state, &path)?;
            println!("Profil sauvegardé dans : {}", path.display());
        }
        "c" => {
            *state = load_profile(&path)?;
            println!("Profil chargé depuis : {}", path.display());
            display_selection(state);
        }
        _ => println!("Action inconnue : '{}'", action),
    }
    Ok(())
}

fn cmd_save(
    conn: &loto45_db::rusqlite::Connection,
    last_outcomes: &[GenerationOutcome],
) -> Result<()> {
    if last_outcomes.is_empty() {
        println!("Aucune grille générée à sauvegarder. Lancez d'abord : generer");
        return Ok(());
    }

    let session = prompt_with_default("Identifiant de session", "moi")?;
    let default_round = latest_round(conn)?.map(|r| r + 1).unwrap_or(1);
    let round_str = prompt_with_default("Round visé", &default_round.to_string())?;
    let round: u32 = round_str.parse().context("Round invalide")?;

    for (i, outcome) in last_outcomes.iter().enumerate() {
        save_game(conn, &SavedGame {
            session: session.clone(),
            round,
            slot: (i + 1) as u8,
            numbers: outcome.numbers,
        })?;
    }
    println!(
        "💾 {} grille(s) sauvegardée(s) pour la session '{}' au round {}.",
        last_outcomes.len(),
        session,
        round
    );
    Ok(())
}

fn cmd_history(conn: &loto45_db::rusqlite::Connection) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : loto45 import");
        return Ok(());
    }
    let n_str = prompt_with_default("Nombre de tirages", "10")?;
    let limit: u32 = n_str.parse().context("Nombre invalide")?;
    display_draws(&fetch_last_draws(conn, limit)?);
    Ok(())
}

pub fn run_interactive(conn: &loto45_db::rusqlite::Connection) -> Result<()> {
    println!("Bienvenue dans le mode interactif de loto45 !");

    let mut state = SelectionState::new();
    let mut last_outcomes: Vec<GenerationOutcome> = Vec::new();

    loop {
        display_menu();
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        let result = match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(InteractiveCommand::Rule) => cmd_rule(conn, &mut state),
            Some(InteractiveCommand::Exclude) => cmd_exclude(&mut state),
            Some(InteractiveCommand::Include) => cmd_include(&mut state),
            Some(InteractiveCommand::Checks) => cmd_checks(&mut state),
            Some(InteractiveCommand::Generate) => cmd_generate(conn, &state, &mut last_outcomes),
            Some(InteractiveCommand::Show) => {
                display_selection(&state);
                Ok(())
            }
            Some(InteractiveCommand::Reset) => cmd_reset(conn, &mut state),
            Some(InteractiveCommand::Profile) => cmd_profile(&mut state),
            Some(InteractiveCommand::Save) => cmd_save(conn, &last_outcomes),
            Some(InteractiveCommand::History) => cmd_history(conn),
            None => {
                println!("Commande inconnue : '{}'. Tapez un numéro (1-11) ou un nom de commande.", input);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("Erreur: {e:#}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_by_number() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Rule));
        assert_eq!(parse_command("2"), Some(InteractiveCommand::Exclude));
        assert_eq!(parse_command("3"), Some(InteractiveCommand::Include));
        assert_eq!(parse_command("4"), Some(InteractiveCommand::Checks));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("6"), Some(InteractiveCommand::Show));
        assert_eq!(parse_command("7"), Some(InteractiveCommand::Reset));
        assert_eq!(parse_command("8"), Some(InteractiveCommand::Profile));
        assert_eq!(parse_command("9"), Some(InteractiveCommand::Save));
        assert_eq!(parse_command("10"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("11"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_name() {
        assert_eq!(parse_command("regle"), Some(InteractiveCommand::Rule));
        assert_eq!(parse_command("exclure"), Some(InteractiveCommand::Exclude));
        assert_eq!(parse_command("inclure"), Some(InteractiveCommand::Include));
        assert_eq!(parse_command("contraintes"), Some(InteractiveCommand::Checks));
        assert_eq!(parse_command("generer"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("etat"), Some(InteractiveCommand::Show));
        assert_eq!(parse_command("reinitialiser"), Some(InteractiveCommand::Reset));
        assert_eq!(parse_command("profil"), Some(InteractiveCommand::Profile));
        assert_eq!(parse_command("sauvegarder"), Some(InteractiveCommand::Save));
        assert_eq!(parse_command("historique"), Some(InteractiveCommand::History));
        assert_eq!(parse_command("quitter"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_accents_and_aliases() {
        assert_eq!(parse_command("générer"), Some(InteractiveCommand::Generate));
        assert_eq!(parse_command("état"), Some(InteractiveCommand::Show));
        assert_eq!(parse_command("q"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("exit"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("GEN"), Some(InteractiveCommand::Generate));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("12"), None);
    }
}
