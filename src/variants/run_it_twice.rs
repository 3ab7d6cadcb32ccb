use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::round::Round;
use crate::domain::table::TableConfig;
use crate::engine::errors::EngineError;
use crate::variants::vote::{Vote, VoteKind, VoteRule};

/// Два полных борда (по 5 карт) для run-it-twice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DualBoard {
    pub first: Vec<Card>,
    pub second: Vec<Card>,
}

/// Делёж суммы между бордами: первому — большая половина.
pub fn split_for_boards(amount: Chips) -> (Chips, Chips) {
    let first = Chips(amount.0 - amount.0 / 2);
    (first, amount - first)
}

/// Делёж слоёв банка между бордами.
///
/// Каждый слой делится пополам, а лишние фишки нечётных слоёв идут первому борду,
/// пока его доля не дойдёт до большей половины всего банка. Остальные уходят второму.
/// Так борды расходятся не больше чем на одну фишку.
pub fn split_tiers_for_boards(amounts: &[Chips]) -> Vec<(Chips, Chips)> {
    let total: Chips = amounts.iter().copied().sum();
    let (first_total, _) = split_for_boards(total);
    let floors: Chips = amounts.iter().map(|a| Chips(a.0 / 2)).sum();
    let mut first_extra = first_total.saturating_sub(floors).0;

    amounts
        .iter()
        .map(|amount| {
            let mut first = Chips(amount.0 / 2);
            if amount.0 % 2 == 1 && first_extra > 0 {
                first += Chips(1);
                first_extra -= 1;
            }
            (first, *amount - first)
        })
        .collect()
}

/// Предлагать ли run-it-twice при олл-ин шоудауне.
pub fn should_offer(config: &TableConfig, round: &Round) -> bool {
    config.run_it_twice_enabled
        && round.bomb_pot.is_none()
        && round.community_cards.len() < 5
        && round.in_hand_count() >= 2
}

/// Голосуют только оставшиеся в раздаче, нужно единогласие.
pub fn open_vote(round: &Round, expires_at: u64) -> Vote {
    let eligible = round.players_in_hand().map(|p| p.id).collect();
    Vote::new(VoteKind::RunItTwice, VoteRule::Unanimous, eligible, expires_at)
}

/// Докладка двух бордов из одной оставшейся колоды: сначала весь первый, потом второй.
pub fn deal_dual_board(round: &mut Round) -> Result<DualBoard, EngineError> {
    let missing = 5usize.saturating_sub(round.community_cards.len());
    let first_run = round.deck.draw_n(missing)?;
    let second_run = round.deck.draw_n(missing)?;

    let mut first = round.community_cards.clone();
    first.extend(first_run);
    let mut second = round.community_cards.clone();
    second.extend(second_run);

    Ok(DualBoard { first, second })
}
