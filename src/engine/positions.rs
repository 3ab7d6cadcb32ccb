use crate::domain::player::Player;

/// Следующий индекс по кругу после `from`, удовлетворяющий `pred`.
/// Сам `from` проверяется последним.
pub fn next_index_where<F>(players: &[Player], from: usize, pred: F) -> Option<usize>
where
    F: Fn(&Player) -> bool,
{
    let n = players.len();
    if n == 0 {
        return None;
    }
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&idx| pred(&players[idx]))
}

/// Места малого и большого блайнда: первый и второй после дилера.
/// Хедз-ап большой блайнд попадает на дилера.
pub fn blind_positions(player_count: usize, dealer_index: usize) -> Option<(usize, usize)> {
    if player_count < 2 {
        return None;
    }
    Some((
        (dealer_index + 1) % player_count,
        (dealer_index + 2) % player_count,
    ))
}

/// Кнопка переезжает на одно место по часовой стрелке.
pub fn next_dealer(previous: Option<usize>, player_count: usize) -> usize {
    match previous {
        Some(prev) if player_count > 0 => (prev + 1) % player_count,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Chips;

    fn seats(n: u64) -> Vec<Player> {
        (1..=n).map(|id| Player::new(id, format!("p{id}"), Chips(100))).collect()
    }

    #[test]
    fn walk_skips_folded_and_wraps() {
        let mut players = seats(4);
        players[2].folded = true;
        players[3].folded = true;

        assert_eq!(next_index_where(&players, 1, |p| p.can_act()), Some(0));
        assert_eq!(next_index_where(&players, 0, |p| p.can_act()), Some(1));
    }

    #[test]
    fn no_candidate_returns_none() {
        let mut players = seats(3);
        for p in players.iter_mut() {
            p.is_all_in = true;
        }
        assert_eq!(next_index_where(&players, 0, |p| p.can_act()), None);
    }

    #[test]
    fn heads_up_blinds_wrap_onto_dealer() {
        assert_eq!(blind_positions(2, 0), Some((1, 0)));
        assert_eq!(blind_positions(5, 3), Some((4, 0)));
        assert_eq!(blind_positions(1, 0), None);
    }
}
