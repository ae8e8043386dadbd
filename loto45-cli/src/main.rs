mod display;
mod import;
mod interactive;

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use loto45_db::db::{
    count_draws, db_path, fetch_all_draws, fetch_last_draws, fetch_saved_games, latest_round,
    migrate, open_db, save_game,
};
use loto45_db::models::{SavedGame, SLOT_COUNT};
use loto45_gen::gate::{generate_games, CheckConfig};
use loto45_gen::rules::{rule_numbers, RuleKind};
use loto45_gen::selection::SelectionState;
use loto45_gen::stats::compute_stats;

use crate::display::{
    display_draws, display_import_summary, display_notices, display_outcomes, display_rules,
    display_saved_games, display_selection, display_stats,
};

/// Identifiants des règles d'exclusion rapide côté ligne de commande.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RuleArg {
    LastWeekWinning,
    ThisWeekDate,
    Frequent,
    NotAppeared,
    AllTimeMost,
    AllTimeLeast,
    LastDigit,
    TensDigit,
}

impl From<RuleArg> for RuleKind {
    fn from(arg: RuleArg) -> Self {
        match arg {
            RuleArg::LastWeekWinning => RuleKind::LastWeekWinning,
            RuleArg::ThisWeekDate => RuleKind::ThisWeekDate,
            RuleArg::Frequent => RuleKind::Frequent,
            RuleArg::NotAppeared => RuleKind::NotAppeared,
            RuleArg::AllTimeMost => RuleKind::AllTimeMost,
            RuleArg::AllTimeLeast => RuleKind::AllTimeLeast,
            RuleArg::LastDigit => RuleKind::LastDigit,
            RuleArg::TensDigit => RuleKind::TensDigit,
        }
    }
}

#[derive(Parser)]
#[command(name = "loto45", about = "Générateur de grilles Lotto 6/45 sous contraintes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV (round;date;n1..n6;bonus)
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "assets/lotto645.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les statistiques (fréquences et retards, bonus compris)
    Stats {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Prévisualiser les numéros dérivés de chaque règle d'exclusion
    Rules,

    /// Générer des grilles sous contraintes
    Generate {
        /// Nombre de cases à générer (1 à 5)
        #[arg(short, long, default_value = "1")]
        games: usize,

        /// Numéros à inclure dans chaque grille (ex: "7,14" ou "3-5")
        #[arg(short, long)]
        include: Option<String>,

        /// Numéros à exclure manuellement (même grammaire)
        #[arg(short = 'x', long)]
        exclude: Option<String>,

        /// Règle d'exclusion rapide à activer (répétable)
        #[arg(short, long = "rule")]
        rules: Vec<RuleArg>,

        /// Désactiver le rejet des doublons exacts de l'historique
        #[arg(long)]
        no_exact: bool,

        /// Désactiver le rejet des doublons partiels (5 numéros communs)
        #[arg(long)]
        no_partial: bool,

        /// Désactiver le rejet des suites de 4 numéros consécutifs
        #[arg(long)]
        no_consecutive: bool,

        /// Seed pour la reproductibilité (défaut: date du jour AAAAMMJJ)
        #[arg(long)]
        seed: Option<u64>,

        /// Sauvegarder les grilles sous cette session
        #[arg(short, long)]
        session: Option<String>,

        /// Round visé pour la sauvegarde (défaut: dernier round + 1)
        #[arg(long)]
        round: Option<u32>,
    },

    /// Lister les grilles sauvegardées d'une session
    Saved {
        /// Identifiant de session
        #[arg(short, long)]
        session: String,

        /// Round visé
        #[arg(long)]
        round: u32,
    },

    /// Mode interactif (REPL)
    Interactive,
}

/// Seed déterministe basé sur la date du jour (AAAAMMJJ).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Rules => cmd_rules(&conn),
        Command::Generate {
            games,
            include,
            exclude,
            rules,
            no_exact,
            no_partial,
            no_consecutive,
            seed,
            session,
            round,
        } => cmd_generate(
            &conn,
            games,
            include.as_deref(),
            exclude.as_deref(),
            &rules,
            CheckConfig {
                prevent_exact: !no_exact,
                prevent_partial: !no_partial,
                prevent_consecutive: !no_consecutive,
            },
            seed,
            session.as_deref(),
            round,
        ),
        Command::Saved { session, round } => cmd_saved(&conn, &session, round),
        Command::Interactive => interactive::run_interactive(&conn),
    }
}

fn cmd_import(conn: &loto45_db::rusqlite::Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &loto45_db::rusqlite::Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : loto45 import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &loto45_db::rusqlite::Connection, window: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : loto45 import");
        return Ok(());
    }
    let effective_window = window.min(n);
    let draws = fetch_last_draws(conn, effective_window)?;
    let stats = compute_stats(&draws);
    display_stats(&stats, effective_window);
    Ok(())
}

fn cmd_rules(conn: &loto45_db::rusqlite::Connection) -> Result<()> {
    let draws = fetch_all_draws(conn)?;
    let today = chrono::Local::now().date_naive();
    let rules: Vec<(RuleKind, Option<Vec<u8>>)> = RuleKind::ALL
        .iter()
        .map(|&kind| (kind, rule_numbers(kind, &draws, today)))
        .collect();
    display_rules(&rules);
    Ok(())
}

fn cmd_generate(
    conn: &loto45_db::rusqlite::Connection,
    games: usize,
    include: Option<&str>,
    exclude: Option<&str>,
    rules: &[RuleArg],
    checks: CheckConfig,
    seed: Option<u64>,
    session: Option<&str>,
    round: Option<u32>,
) -> Result<()> {
    if games < 1 || games > SLOT_COUNT as usize {
        bail!(
            "Le nombre de cases doit être entre 1 et {}. Reçu : {}",
            SLOT_COUNT,
            games
        );
    }

    let draws = fetch_all_draws(conn)?;
    let today = chrono::Local::now().date_naive();

    let mut state = SelectionState::new();
    state.checks = checks;
    if let Some(input) = exclude {
        display_notices(&state.toggle_manual(input));
    }
    if let Some(input) = include {
        display_notices(&state.toggle_inclusions(input));
    }
    for &rule in rules {
        display_notices(&state.toggle_rule(rule.into(), &draws, today));
    }
    display_selection(&state);

    let effective_seed = seed.unwrap_or_else(|| {
        let ds = date_seed();
        println!("(Seed du jour : {ds})");
        ds
    });
    let mut rng = StdRng::seed_from_u64(effective_seed);

    let outcomes = generate_games(
        &draws,
        &state.inclusions,
        &state.exclusions.numbers(),
        &state.checks,
        games,
        &mut rng,
    );
    display_outcomes(&outcomes);

    if let Some(session) = session {
        let target_round = match round {
            Some(r) => r,
            None => latest_round(conn)?.map(|r| r + 1).unwrap_or(1),
        };
        for (i, outcome) in outcomes.iter().enumerate() {
            save_game(conn, &SavedGame {
                session: session.to_string(),
                round: target_round,
                slot: (i + 1) as u8,
                numbers: outcome.numbers,
            })?;
        }
        println!(
            "\n💾 {} grille(s) sauvegardée(s) pour la session '{}' au round {}.",
            outcomes.len(),
            session,
            target_round
        );
    }

    Ok(())
}

fn cmd_saved(conn: &loto45_db::rusqlite::Connection, session: &str, round: u32) -> Result<()> {
    let games = fetch_saved_games(conn, session, round)?;
    display_saved_games(&games, session, round);
    Ok(())
}
