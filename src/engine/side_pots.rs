use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::Player;
use crate::domain::PlayerId;

/// Слой банка: разыгрывается только между игроками, чей вклад дотянулся до `threshold`.
///
/// Слои не хранятся, а каждый раз выводятся из вкладов заново.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotTier {
    pub amount: Chips,
    /// Уровень вклада, до которого доходит слой.
    pub threshold: Chips,
    /// Кто может выиграть слой (в порядке мест).
    pub eligible: Vec<PlayerId>,
}

/// Разбить банк на слои по вкладам.
///
/// Уровни — различные положительные `total_contribution` всех вкладчиков
/// (сфолдившие тоже: их деньги остаются в банке, но выиграть их они не могут).
/// Слой без претендентов сливается с предыдущим. Остаток `pot - Σ` уходит в последний слой.
/// Инвариант: `Σ amount == pot` (если есть хотя бы один слой).
pub fn derive_tiers(players: &[Player], pot: Chips) -> Vec<PotTier> {
    let mut levels: Vec<Chips> = players
        .iter()
        .map(|p| p.total_contribution)
        .filter(|c| !c.is_zero())
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut tiers: Vec<PotTier> = Vec::new();
    let mut carried = Chips::ZERO;
    let mut prev = Chips::ZERO;

    for level in levels {
        let amount: Chips = players
            .iter()
            .filter(|p| p.total_contribution > prev)
            .map(|p| {
                let over_prev = p.total_contribution - prev;
                let step = level - prev;
                if over_prev < step {
                    over_prev
                } else {
                    step
                }
            })
            .sum();

        let eligible: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.is_in_hand() && p.total_contribution >= level)
            .map(|p| p.id)
            .collect();

        if eligible.is_empty() {
            match tiers.last_mut() {
                Some(last) => last.amount += amount,
                None => carried += amount,
            }
        } else {
            tiers.push(PotTier {
                amount: amount + carried,
                threshold: level,
                eligible,
            });
            carried = Chips::ZERO;
        }

        prev = level;
    }

    let distributed: Chips = tiers.iter().map(|t| t.amount).sum();
    if let Some(last) = tiers.last_mut() {
        last.amount += pot - distributed;
    }

    tiers
}

/// Сайд-поты для показа во время раздачи: только если кто-то в олл-ине
/// и банк реально делится больше чем на один слой.
pub fn live_side_pots(players: &[Player], pot: Chips) -> Vec<PotTier> {
    let anyone_all_in = players.iter().any(|p| p.is_in_hand() && p.is_all_in);
    if !anyone_all_in {
        return Vec::new();
    }
    let tiers = derive_tiers(players, pot);
    if tiers.len() > 1 {
        tiers
    } else {
        Vec::new()
    }
}
