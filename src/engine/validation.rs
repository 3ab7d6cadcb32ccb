use crate::domain::chips::Chips;
use crate::domain::player::Player;
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;

/// Проверка, может ли игрок выполнить это действие при текущем состоянии ставок.
/// Очередность хода проверяет вызывающий код.
pub fn validate_action(
    player: &Player,
    action: &PlayerActionKind,
    betting: &BettingState,
    big_blind: Chips,
) -> Result<(), EngineError> {
    if !player.can_act() {
        return Err(EngineError::NotYourTurn(player.id));
    }

    let to_call = diff_to_call(player, betting);

    match action {
        PlayerActionKind::Fold => Ok(()),

        PlayerActionKind::Check => {
            if to_call.is_zero() {
                Ok(())
            } else {
                Err(EngineError::CannotCheck)
            }
        }

        PlayerActionKind::Call => {
            if to_call.is_zero() {
                Err(EngineError::CannotCall)
            } else {
                // Не хватает на полный call — это call олл-ин, он разрешён.
                Ok(())
            }
        }

        PlayerActionKind::Bet(total) => {
            let all_in_total = player.chips + player.current_bet;
            if *total > all_in_total {
                return Err(EngineError::InsufficientChips);
            }
            // Уже ходил, а доплачивать приходится только из-за неполного олл-ина.
            if player.has_acted && !to_call.is_zero() && *total > betting.current_bet {
                return Err(EngineError::RaiseNotReopened);
            }
            if *total == all_in_total && *total > player.current_bet {
                // Олл-ин разрешён и ниже минимального рейза.
                return Ok(());
            }

            let min = if betting.current_bet.is_zero() {
                big_blind
            } else {
                betting.min_total_bet()
            };
            if *total < min {
                return Err(EngineError::BelowMinimumRaise { min });
            }
            Ok(())
        }
    }
}

/// Сколько фишек нужно добавить игроку, чтобы уравнять текущую ставку.
pub fn diff_to_call(player: &Player, betting: &BettingState) -> Chips {
    betting.current_bet.saturating_sub(player.current_bet)
}
