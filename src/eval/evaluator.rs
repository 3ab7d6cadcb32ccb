use core::cmp::Ordering;

use crate::domain::card::Card;

use super::hand_rank::{HandCategory, HandRank};
use super::lookup_tables::{detect_straight, rank_to_bit, RankMask};

/// Лучшая рука из карманных карт + борда.
///
/// При 5+ картах перебираем все 5-карточные комбинации (21 для полного борда).
/// Если карт меньше пяти (префлоп), оцениваем то, что есть: пары/сеты/старшие.
/// Функция чистая: одинаковый вход — одинаковый выход, включая `forming_cards`.
pub fn best_hand(hole: &[Card], community: &[Card]) -> HandRank {
    let mut all_cards = Vec::with_capacity(hole.len() + community.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(community);

    if all_cards.len() < 5 {
        return evaluate_cards(&all_cards);
    }

    best_of_all_5card_combinations(&all_cards)
}

fn best_of_all_5card_combinations(cards: &[Card]) -> HandRank {
    let n = cards.len();
    let mut best: Option<HandRank> = None;

    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let rank = evaluate_cards(&five);
                        // При равенстве оставляем первую найденную комбинацию.
                        let better = match &best {
                            None => true,
                            Some(current) => rank.compare(current) == Ordering::Greater,
                        };
                        if better {
                            best = Some(rank);
                        }
                    }
                }
            }
        }
    }

    best.unwrap_or_else(|| evaluate_cards(cards))
}

/// Оценка набора из не более чем 5 карт.
fn evaluate_cards(cards: &[Card]) -> HandRank {
    let mut suit_counts = [0u8; 4];
    let mut rank_counts = [0u8; 15];
    let mut rank_mask: RankMask = 0;

    for card in cards {
        suit_counts[card.suit.index()] += 1;
        rank_counts[card.rank.value() as usize] += 1;
        rank_mask |= rank_to_bit(card.rank);
    }

    // (вес ранга, сколько раз), сначала по количеству, затем по рангу — по убыванию.
    let mut groups: Vec<(u8, u8)> = (2u8..=14)
        .rev()
        .filter(|v| rank_counts[*v as usize] > 0)
        .map(|v| (v, rank_counts[v as usize]))
        .collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    let pattern: Vec<u8> = groups.iter().map(|g| g.1).collect();
    let by_groups: Vec<u8> = groups.iter().map(|g| g.0).collect();

    let five = cards.len() == 5;
    let is_flush = five && suit_counts.iter().any(|&c| c == 5);
    let straight_high = if five { detect_straight(rank_mask) } else { None };

    if is_flush {
        if let Some(high) = straight_high {
            let category = if high == 14 {
                HandCategory::RoyalFlush
            } else {
                HandCategory::StraightFlush
            };
            return make(category, vec![high], cards.to_vec());
        }
    }

    match pattern.as_slice() {
        [4, ..] => {
            return make(
                HandCategory::FourOfAKind,
                by_groups,
                cards_of_rank(cards, groups[0].0),
            )
        }
        [3, 2] => return make(HandCategory::FullHouse, by_groups, cards.to_vec()),
        _ => {}
    }

    if is_flush {
        return make(HandCategory::Flush, by_groups, cards.to_vec());
    }

    if let Some(high) = straight_high {
        return make(HandCategory::Straight, vec![high], cards.to_vec());
    }

    match pattern.as_slice() {
        [3, ..] => make(
            HandCategory::ThreeOfAKind,
            by_groups,
            cards_of_rank(cards, groups[0].0),
        ),
        [2, 2, ..] => {
            let mut forming = cards_of_rank(cards, groups[0].0);
            forming.extend(cards_of_rank(cards, groups[1].0));
            make(HandCategory::TwoPair, by_groups, forming)
        }
        [2, ..] => make(
            HandCategory::OnePair,
            by_groups,
            cards_of_rank(cards, groups[0].0),
        ),
        _ => {
            let forming = groups
                .first()
                .map(|g| cards_of_rank(cards, g.0))
                .unwrap_or_default();
            make(HandCategory::HighCard, by_groups, forming)
        }
    }
}

fn cards_of_rank(cards: &[Card], value: u8) -> Vec<Card> {
    cards
        .iter()
        .filter(|c| c.rank.value() == value)
        .copied()
        .collect()
}

fn make(category: HandCategory, tiebreak: Vec<u8>, forming_cards: Vec<Card>) -> HandRank {
    HandRank {
        category,
        tiebreak,
        forming_cards,
    }
}
