// src/bin/holdem_dev_cli.rs

use holdem_engine::api::{Command, TableViewDto};
use holdem_engine::domain::chips::Chips;
use holdem_engine::domain::hand::Phase;
use holdem_engine::domain::table::TableConfig;
use holdem_engine::domain::{PlayerId, TableId};
use holdem_engine::engine::{HandEventKind, TableManager};
use holdem_engine::infra::DeterministicRng;
use holdem_engine::time_ctrl::TimeRules;
use holdem_engine::variants::VoteKind;

/// Шаг виртуальных часов симуляции (мс).
const STEP_MS: u64 = 500;
const MAX_STEPS: u32 = 2_000;

/// Сценарий бота за конкретным столом.
#[derive(Copy, Clone, Debug)]
enum Scenario {
    CheckCall,
    Aggressive,
    /// Первый игрок предлагает бомб-пот, все соглашаются.
    BombPot,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("holdem_dev_cli: стартуем мульти-табличный dev-CLI…");

    let mut manager = TableManager::new();
    let mut tables: Vec<(TableId, Scenario)> = Vec::new();

    for (n, scenario) in [Scenario::CheckCall, Scenario::Aggressive, Scenario::BombPot]
        .into_iter()
        .enumerate()
    {
        let config = TableConfig {
            bb_ante_enabled: n == 1,
            ..TableConfig::default()
        };
        let table_id = match manager.create_table_with_rng(
            format!("AUTO TABLE {}", n + 1),
            config,
            TimeRules::standard(),
            Box::new(DeterministicRng::from_seed(42 + n as u64)),
        ) {
            Ok(id) => id,
            Err(e) => {
                println!("[CLI] ОШИБКА при создании стола: {e}");
                return;
            }
        };

        for seat in 0..(3 + n) {
            if let Err(e) = manager.seat_new_player(table_id, format!("Bot {}", seat + 1)) {
                println!("[CLI] ОШИБКА посадки на стол {table_id}: {e}");
            }
        }
        tables.push((table_id, scenario));
    }

    let mut now: u64 = 0;
    for (table_id, scenario) in &tables {
        if let Err(e) = manager.start_game(*table_id, now) {
            println!("[CLI] ОШИБКА start_game на столе {table_id}: {e}");
        }
        if let Scenario::BombPot = scenario {
            offer_bomb_pot(&mut manager, *table_id, now);
        }
    }

    for _ in 0..MAX_STEPS {
        now += STEP_MS;
        for (table_id, failure) in manager.tick_all(now) {
            println!("[CLI] стол {table_id}: раздача прервана: {failure}");
        }

        for (table_id, scenario) in &tables {
            if let Some(view) = manager.view(*table_id, None) {
                if let Some(player_id) = view.current_player_id {
                    let command = pick_command(*scenario, &view, player_id, now);
                    println!(
                        "[CLI][table_id={}] phase={} player_id={} -> {:?}",
                        table_id, view.phase, player_id, command
                    );
                    if let Err(e) = manager.handle(*table_id, player_id, command, now) {
                        println!("[CLI] ОШИБКА команды на столе {table_id}: {e:?}");
                    }
                }
            }
            print_events(&mut manager, *table_id);
        }

        let all_over = tables.iter().all(|(id, _)| {
            manager
                .table(*id)
                .map(|t| !t.is_game_started())
                .unwrap_or(true)
        });
        if all_over {
            break;
        }
    }

    for (table_id, _) in &tables {
        if let Some(view) = manager.view(*table_id, None) {
            print_table(&view);
        }
    }
    println!("[CLI] Завершение работы dev-CLI.");
}

fn offer_bomb_pot(manager: &mut TableManager, table_id: TableId, now: u64) {
    let Some(view) = manager.view(table_id, None) else {
        return;
    };
    let ids: Vec<PlayerId> = view.players.iter().map(|p| p.player_id).collect();
    let Some((&initiator, others)) = ids.split_first() else {
        return;
    };

    let stake = view.big_blind + view.big_blind;
    if let Err(e) = manager.handle(table_id, initiator, Command::StartBombPotVote { stake }, now) {
        println!("[CLI] бомб-пот не предложен: {e:?}");
        return;
    }
    for &voter in others {
        let vote = Command::CastVote {
            kind: VoteKind::BombPot,
            choice: true,
        };
        if let Err(e) = manager.handle(table_id, voter, vote, now) {
            println!("[CLI] голос {voter} не принят: {e:?}");
        }
    }
}

/// Базовая стратегия бота: check, если можно, иначе call; агрессивный бот ставит на флопе.
fn pick_command(scenario: Scenario, view: &TableViewDto, player_id: PlayerId, now: u64) -> Command {
    let Some(me) = view.players.iter().find(|p| p.player_id == player_id) else {
        return Command::Fold;
    };
    let gap = view.current_bet.saturating_sub(me.current_bet);

    match scenario {
        Scenario::Aggressive if view.phase == Phase::Flop && gap.is_zero() => {
            let amount = if me.chips > view.min_bet {
                view.min_bet
            } else {
                me.chips + me.current_bet
            };
            Command::Bet { amount }
        }
        // Иногда скидываем дорогую ставку, чтобы раздачи не шли все до ривера.
        _ if gap > Chips(view.big_blind.0 * 4) && now % 3 == 0 => Command::Fold,
        _ if gap.is_zero() => Command::Check,
        _ => Command::Call,
    }
}

fn print_events(manager: &mut TableManager, table_id: TableId) {
    for event in manager.drain_events(table_id) {
        match &event.kind {
            HandEventKind::HandStarted { hand_id, bomb_pot, .. } => {
                println!("[CLI][table_id={table_id}] === раздача #{hand_id} (бомб-пот: {bomb_pot}) ===");
            }
            HandEventKind::PhaseAdvanced {
                phase,
                community_cards,
                board,
            } => {
                let cards: Vec<String> = community_cards.iter().map(|c| c.to_string()).collect();
                println!("[CLI][table_id={table_id}] {phase} (борд {board}): {}", cards.join(" "));
            }
            HandEventKind::RoundEnded { winners, reason, .. } => {
                println!("[CLI][table_id={table_id}] итог {reason:?}: {winners:?}");
            }
            HandEventKind::GameOver { remaining } => {
                println!("[CLI][table_id={table_id}] игра окончена, остались: {remaining:?}");
            }
            _ => {}
        }
    }
}

fn print_table(view: &TableViewDto) {
    println!("================ TABLE STATE ================");
    println!(
        "table_id={} name={} hand_id={} phase={} pot={}",
        view.table_id, view.name, view.hand_id, view.phase, view.pot
    );
    for p in &view.players {
        println!(
            "  seat {} | id={} | name={} | chips={} | folded={}",
            p.seat_index, p.player_id, p.name, p.chips, p.folded
        );
    }
    let total: Chips = view.players.iter().map(|p| p.chips).sum::<Chips>() + view.pot;
    println!("  всего фишек на столе: {total}");
}
