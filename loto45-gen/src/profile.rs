use std::path::Path;

use anyhow::{Context, Result};

use crate::selection::SelectionState;

/// Sauvegarde le profil de sélection (exclusions étiquetées, inclusions,
/// règles actives, contraintes) en JSON.
pub fn save_profile(state: &SelectionState, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(state)
        .context("Échec de la sérialisation du profil")?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire le profil {:?}", path))?;
    Ok(())
}

pub fn load_profile(path: &Path) -> Result<SelectionState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire le profil {:?}", path))?;
    let state = serde_json::from_str(&json)
        .with_context(|| format!("Profil invalide {:?}", path))?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_test_draws;
    use crate::rules::RuleKind;
    use chrono::NaiveDate;

    #[test]
    fn test_save_and_load_profile() {
        let draws = make_test_draws(30);
        let today = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let mut state = SelectionState::new();
        state.toggle_rule(RuleKind::LastWeekWinning, &draws, today);
        state.toggle_manual("30-33");
        state.toggle_inclusions("2,4");

        let path = std::env::temp_dir().join(format!("loto45-profil-{}.json", std::process::id()));
        save_profile(&state, &path).unwrap();
        let loaded = load_profile(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(state, loaded);
    }

    #[test]
    fn test_load_missing_profile_fails() {
        let path = std::env::temp_dir().join("loto45-profil-inexistant.json");
        assert!(load_profile(&path).is_err());
    }
}
