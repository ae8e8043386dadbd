use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, SavedGame};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    round    INTEGER PRIMARY KEY,
    date     TEXT NOT NULL,
    n1       INTEGER NOT NULL,
    n2       INTEGER NOT NULL,
    n3       INTEGER NOT NULL,
    n4       INTEGER NOT NULL,
    n5       INTEGER NOT NULL,
    n6       INTEGER NOT NULL,
    bonus    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS saved_games (
    session  TEXT NOT NULL,
    round    INTEGER NOT NULL,
    slot     INTEGER NOT NULL,
    n1       INTEGER NOT NULL,
    n2       INTEGER NOT NULL,
    n3       INTEGER NOT NULL,
    n4       INTEGER NOT NULL,
    n5       INTEGER NOT NULL,
    n6       INTEGER NOT NULL,
    PRIMARY KEY (session, round, slot)
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("loto45.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (round, date, n1, n2, n3, n4, n5, n6, bonus)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            draw.round,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.bonus,
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn draw_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        round: row.get(0)?,
        date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
        bonus: row.get(8)?,
    })
}

/// Tirages du plus récent au plus ancien (draws[0] = dernier tirage).
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT round, date, n1, n2, n3, n4, n5, n6, bonus
         FROM draws ORDER BY round DESC LIMIT ?1"
    )?;
    let draws = stmt.query_map([limit], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT round, date, n1, n2, n3, n4, n5, n6, bonus
         FROM draws ORDER BY round DESC"
    )?;
    let draws = stmt.query_map([], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn fetch_draw(conn: &Connection, round: u32) -> Result<Option<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT round, date, n1, n2, n3, n4, n5, n6, bonus
         FROM draws WHERE round = ?1"
    )?;
    let mut rows = stmt.query_map([round], draw_from_row)?;
    match rows.next() {
        Some(draw) => Ok(Some(draw?)),
        None => Ok(None),
    }
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

pub fn latest_round(conn: &Connection) -> Result<Option<u32>> {
    let round: Option<u32> =
        conn.query_row("SELECT MAX(round) FROM draws", [], |row| row.get(0))?;
    Ok(round)
}

/// Insère ou remplace la grille de la case (session, round, slot).
pub fn save_game(conn: &Connection, game: &SavedGame) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO saved_games (session, round, slot, n1, n2, n3, n4, n5, n6)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            game.session,
            game.round,
            game.slot,
            game.numbers[0],
            game.numbers[1],
            game.numbers[2],
            game.numbers[3],
            game.numbers[4],
            game.numbers[5],
        ],
    ).context("Échec de la sauvegarde de la grille")?;
    Ok(())
}

pub fn fetch_saved_games(conn: &Connection, session: &str, round: u32) -> Result<Vec<SavedGame>> {
    let mut stmt = conn.prepare(
        "SELECT session, round, slot, n1, n2, n3, n4, n5, n6
         FROM saved_games WHERE session = ?1 AND round = ?2 ORDER BY slot"
    )?;
    let games = stmt.query_map(rusqlite::params![session, round], |row| {
        Ok(SavedGame {
            session: row.get(0)?,
            round: row.get(1)?,
            slot: row.get(2)?,
            numbers: [
                row.get::<_, u8>(3)?,
                row.get::<_, u8>(4)?,
                row.get::<_, u8>(5)?,
                row.get::<_, u8>(6)?,
                row.get::<_, u8>(7)?,
                row.get::<_, u8>(8)?,
            ],
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(games)
}
