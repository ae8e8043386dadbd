use loto45_db::models::{Draw, NumberStats, POOL_SIZE};

/// Fréquence et retard de chaque numéro sur la fenêtre fournie, les 7 cases
/// de chaque tirage comptées (6 numéros + bonus). draws[0] = le plus récent.
pub fn compute_stats(draws: &[Draw]) -> Vec<NumberStats> {
    let mut stats: Vec<NumberStats> = (1..=POOL_SIZE)
        .map(|n| NumberStats {
            number: n,
            frequency: 0,
            gap: 0,
        })
        .collect();

    for (i, draw) in draws.iter().enumerate() {
        for n in draw.all_slots() {
            let idx = (n - 1) as usize;
            if idx < stats.len() {
                if stats[idx].frequency == 0 {
                    stats[idx].gap = i as u32;
                }
                stats[idx].frequency += 1;
            }
        }
    }

    for stat in &mut stats {
        if stat.frequency == 0 {
            stat.gap = draws.len() as u32;
        }
    }

    stats
}
