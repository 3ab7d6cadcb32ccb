//! Один стол целиком: места, текущая раздача, таймеры, голосования вариантов.
//!
//! Все операции синхронные, время передаётся снаружи (`now`, мс).
//! После каждой операции движок сам "догоняет" просроченные таймеры (`tick`).
//! События копятся во внутренней истории, владелец забирает их через `drain_events`.

use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::Phase;
use crate::domain::player::Player;
use crate::domain::round::Round;
use crate::domain::table::TableConfig;
use crate::domain::{HandId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::{ActionSource, PlayerAction, PlayerActionKind};
use crate::engine::errors::{ConfigError, EngineError, ErrorKind};
use crate::engine::game_loop::{
    apply_action, check_action, deal_hole_cards, deal_next_street, post_blinds, progress_from,
    reset_street, Progress,
};
use crate::engine::hand_history::{HandEvent, HandEventKind, HandHistory};
use crate::engine::positions::next_dealer;
use crate::engine::showdown::{
    resolve_fold_win, resolve_run_it_twice, resolve_single_board, EndReason, RoundOutcome,
};
use crate::engine::RandomSource;
use crate::infra::rng::SystemRng;
use crate::time_ctrl::{ArmedTimer, DealerStep, TimeRules, TimerKind, TimerScheduler, TimerToken};
use crate::variants::bomb_pot::{self, BombPotHand, ScheduledBombPot};
use crate::variants::run_it_twice;
use crate::variants::vote::{Vote, VoteKind, VoteStatus};

pub struct TableEngine {
    table_id: TableId,
    name: String,
    config: TableConfig,
    rules: TimeRules,
    rng: Box<dyn RandomSource + Send>,
    /// Текущая (или последняя) раздача. Между раздачами здесь же сидят игроки.
    round: Round,
    timers: TimerScheduler,
    /// Голосования разных видов идут независимо друг от друга.
    bomb_pot_vote: Option<Vote>,
    run_it_twice_vote: Option<Vote>,
    /// Ставка бомб-пота, за которую сейчас голосуют.
    bomb_pot_offer: Option<Chips>,
    scheduled_bomb_pot: Option<ScheduledBombPot>,
    history: HandHistory,
    next_hand_id: HandId,
    last_dealer: Option<usize>,
    game_started: bool,
}

impl TableEngine {
    /// Новый пустой стол с системным RNG.
    pub fn new(
        table_id: TableId,
        name: impl Into<String>,
        config: TableConfig,
        rules: TimeRules,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(table_id, name, config, rules, Box::new(SystemRng))
    }

    pub fn with_rng(
        table_id: TableId,
        name: impl Into<String>,
        config: TableConfig,
        rules: TimeRules,
        rng: Box<dyn RandomSource + Send>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        rules.validate()?;
        let round = Round::waiting(Vec::new(), config.big_blind);
        Ok(Self {
            table_id,
            name: name.into(),
            config,
            rules,
            rng,
            round,
            timers: TimerScheduler::new(),
            bomb_pot_vote: None,
            run_it_twice_vote: None,
            bomb_pot_offer: None,
            scheduled_bomb_pot: None,
            history: HandHistory::new(),
            next_hand_id: 1,
            last_dealer: None,
            game_started: false,
        })
    }

    // ====== Чтение состояния ======

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn rules(&self) -> &TimeRules {
        &self.rules
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn players(&self) -> &[Player] {
        &self.round.players
    }

    pub fn vote(&self, kind: VoteKind) -> Option<&Vote> {
        match kind {
            VoteKind::BombPot => self.bomb_pot_vote.as_ref(),
            VoteKind::RunItTwice => self.run_it_twice_vote.as_ref(),
        }
    }

    /// Все идущие голосования: сначала бомб-пот, потом run-it-twice.
    pub fn votes(&self) -> impl Iterator<Item = &Vote> {
        self.bomb_pot_vote.iter().chain(self.run_it_twice_vote.iter())
    }

    pub fn bomb_pot_offer(&self) -> Option<Chips> {
        self.bomb_pot_offer
    }

    pub fn scheduled_bomb_pot(&self) -> Option<&ScheduledBombPot> {
        self.scheduled_bomb_pot.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.round.outcome.as_ref()
    }

    pub fn is_game_started(&self) -> bool {
        self.game_started
    }

    pub fn turn_timer(&self) -> Option<&ArmedTimer> {
        self.timers.turn()
    }

    pub fn armed_timers(&self) -> Vec<ArmedTimer> {
        self.timers.armed()
    }

    /// Когда владельцу стола нужно разбудить движок в следующий раз.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Забрать накопленные события.
    pub fn drain_events(&mut self) -> Vec<HandEvent> {
        self.history.drain()
    }

    // ====== Места ======

    /// Посадить игрока со стартовым стеком.
    pub fn seat_player(&mut self, player_id: PlayerId, name: impl Into<String>) -> Result<(), EngineError> {
        let chips = self.config.starting_chips;
        self.seat_player_with_chips(player_id, name, chips)
    }

    /// Посадить игрока с заданным стеком.
    /// Севший посреди раздачи ждёт следующую (сидит сброшенным).
    pub fn seat_player_with_chips(
        &mut self,
        player_id: PlayerId,
        name: impl Into<String>,
        chips: Chips,
    ) -> Result<(), EngineError> {
        if self.round.player(player_id).is_some() {
            return Err(EngineError::PlayerAlreadySeated(player_id));
        }
        if self.round.players.len() >= self.config.max_players {
            return Err(EngineError::TableFull);
        }

        let mut player = Player::new(player_id, name, chips);
        if self.round.phase.is_live() {
            player.folded = true;
        }
        log::info!(
            "[table {}] player {} ({}) seated with {}",
            self.table_id,
            player_id,
            player.name,
            chips
        );
        self.round.players.push(player);
        Ok(())
    }

    /// Встать из-за стола. Во время раздачи нельзя.
    pub fn remove_player(&mut self, player_id: PlayerId, now: u64) -> Result<Player, EngineError> {
        let idx = self
            .round
            .player_index(player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))?;
        if self.round.phase.is_live() {
            return Err(EngineError::HandAlreadyInProgress);
        }
        let player = self.round.players.remove(idx);
        log::info!("[table {}] player {} left", self.table_id, player_id);

        for kind in [VoteKind::BombPot, VoteKind::RunItTwice] {
            let Some(vote) = self.vote_slot(kind).as_mut() else {
                continue;
            };
            vote.eligible.retain(|id| *id != player_id);
            vote.cast.remove(&player_id);
            let status = vote.status();
            if status != VoteStatus::Pending {
                self.resolve_vote(kind, status, now)?;
            }
        }
        Ok(player)
    }

    // ====== Игра ======

    /// Запустить первую раздачу. Дальше раздачи идут сами по таймеру.
    pub fn start_game(&mut self, now: u64) -> Result<(), EngineError> {
        self.tick(now)?;
        if self.game_started || self.round.phase.is_live() {
            return Err(EngineError::HandAlreadyInProgress);
        }
        let funded = self.round.players.iter().filter(|p| !p.chips.is_zero()).count();
        if funded < self.config.min_players {
            return Err(EngineError::NotEnoughPlayers);
        }

        self.game_started = true;
        self.start_hand(now)?;
        self.tick(now)
    }

    /// Действие игрока.
    ///
    /// Недопустимое действие ничего не меняет, таймер хода остаётся как был.
    pub fn act(&mut self, player_id: PlayerId, kind: PlayerActionKind, now: u64) -> Result<(), EngineError> {
        self.tick(now)?;

        let action = PlayerAction::new(player_id, kind);
        check_action(&self.round, &self.config, &action)?;

        self.clear_turn_timer();
        self.apply(action, ActionSource::Manual, now)?;
        self.tick(now)
    }

    /// Предложить бомб-пот на следующую раздачу.
    pub fn start_bomb_pot_vote(&mut self, initiator: PlayerId, stake: Chips, now: u64) -> Result<(), EngineError> {
        self.tick(now)?;
        if self.bomb_pot_vote.is_some() {
            return Err(EngineError::VoteAlreadyRunning);
        }
        if self.scheduled_bomb_pot.is_some() {
            return Err(EngineError::BombPotAlreadyScheduled);
        }
        let player = self
            .round
            .player(initiator)
            .ok_or(EngineError::PlayerNotFound(initiator))?;
        bomb_pot::validate_offer(&self.config, player, stake)?;

        let expires_at = now + self.rules.bomb_pot_vote_ms;
        let vote = bomb_pot::open_vote(&self.round.players, initiator, expires_at)?;
        log::info!(
            "[table {}] bomb pot vote: player {} offers {}",
            self.table_id,
            initiator,
            stake
        );

        self.push(HandEventKind::VoteStarted {
            kind: VoteKind::BombPot,
            eligible: vote.eligible.clone(),
            expires_at,
        });
        self.push(HandEventKind::VoteUpdated {
            kind: VoteKind::BombPot,
            voter: initiator,
            choice: true,
            yes: vote.yes_count(),
            no: vote.no_count(),
        });

        let status = vote.status();
        self.timers.arm_vote(VoteKind::BombPot, expires_at);
        self.bomb_pot_vote = Some(vote);
        self.bomb_pot_offer = Some(stake);

        if status != VoteStatus::Pending {
            self.resolve_vote(VoteKind::BombPot, status, now)?;
        }
        self.tick(now)
    }

    /// Голос в текущем голосовании.
    pub fn cast_vote(&mut self, player_id: PlayerId, kind: VoteKind, choice: bool, now: u64) -> Result<(), EngineError> {
        self.tick(now)?;

        if self.vote(kind).is_none() {
            return Err(EngineError::NoVoteRunning);
        }
        if kind == VoteKind::BombPot && choice {
            let stake = self.bomb_pot_offer.ok_or(EngineError::Internal("bomb pot vote without stake"))?;
            let chips = self
                .round
                .player(player_id)
                .map(|p| p.chips)
                .ok_or(EngineError::NotEligibleToVote(player_id))?;
            if chips < stake {
                return Err(EngineError::InsufficientChips);
            }
        }

        let vote = self
            .vote_slot(kind)
            .as_mut()
            .ok_or(EngineError::NoVoteRunning)?;
        let status = vote.cast(player_id, choice)?;
        let (yes, no) = (vote.yes_count(), vote.no_count());
        self.push(HandEventKind::VoteUpdated {
            kind,
            voter: player_id,
            choice,
            yes,
            no,
        });

        if status != VoteStatus::Pending {
            self.resolve_vote(kind, status, now)?;
        }
        self.tick(now)
    }

    /// Открыть свои карты после окончания раздачи.
    pub fn request_reveal(&mut self, player_id: PlayerId, now: u64) -> Result<(), EngineError> {
        self.tick(now)?;
        if self.round.phase != Phase::Showdown {
            return Err(EngineError::RevealNotAllowed);
        }
        let cards = self
            .round
            .player(player_id)
            .ok_or(EngineError::PlayerNotFound(player_id))?
            .hole_cards
            .ok_or(EngineError::RevealNotAllowed)?;

        if !self.round.shown.contains(&player_id) {
            self.round.shown.push(player_id);
            self.push(HandEventKind::CardsShown { player_id, cards });
        }
        Ok(())
    }

    /// Показать, какие карты вышли бы на борд после победы фолдом.
    /// На расчёт банка не влияет.
    pub fn request_rabbit_hunt(&mut self, player_id: PlayerId, now: u64) -> Result<(), EngineError> {
        self.tick(now)?;
        if self.round.player(player_id).is_none() {
            return Err(EngineError::PlayerNotFound(player_id));
        }
        let missing = 5usize.saturating_sub(self.round.community_cards.len());
        if self.round.phase != Phase::Showdown || !self.round.won_by_fold || missing == 0 {
            return Err(EngineError::RabbitHuntNotAllowed);
        }

        if self.round.rabbit_cards.is_empty() {
            let cards = self.round.deck.peek_top(missing);
            self.round.rabbit_cards = cards.clone();
            self.push(HandEventKind::RabbitHunt { cards });
        }
        Ok(())
    }

    // ====== Таймеры ======

    /// Обработать все таймеры, просроченные к `now`.
    pub fn tick(&mut self, now: u64) -> Result<(), EngineError> {
        while let Some(timer) = self.timers.due(now) {
            self.on_timer(timer.token, now)?;
        }
        Ok(())
    }

    /// Срабатывание таймера. `Ok(false)` — токен устарел, ничего не сделано.
    pub fn on_timer(&mut self, token: TimerToken, now: u64) -> Result<bool, EngineError> {
        let Some(timer) = self.timers.take(token) else {
            log::debug!("[table {}] stale timer {:?} ignored", self.table_id, token);
            return Ok(false);
        };

        match timer.kind {
            TimerKind::Turn => {
                // Снят сработавший таймер, как и при ручном действии.
                if let Some(player_id) = timer.subject {
                    self.push(HandEventKind::TimerCleared { player_id });
                }
                self.on_turn_timeout(timer.subject, now)?
            }
            TimerKind::Vote(kind) => self.on_vote_timeout(kind, now)?,
            TimerKind::Dealer(step) => self.on_dealer_step(step, now)?,
        }
        Ok(true)
    }

    fn on_turn_timeout(&mut self, subject: Option<PlayerId>, now: u64) -> Result<(), EngineError> {
        let current = self.round.current_player().map(|p| p.id);
        let player_id = match (subject, current) {
            (Some(subject), Some(current)) if subject == current => subject,
            _ => return Ok(()),
        };

        let check = PlayerAction::new(player_id, PlayerActionKind::Check);
        let action = if check_action(&self.round, &self.config, &check).is_ok() {
            check
        } else {
            PlayerAction::new(player_id, PlayerActionKind::Fold)
        };
        log::info!(
            "[table {}] player {} timed out, auto {}",
            self.table_id,
            player_id,
            action.kind
        );
        self.apply(action, ActionSource::Timeout, now)
    }

    fn on_vote_timeout(&mut self, kind: VoteKind, now: u64) -> Result<(), EngineError> {
        let Some(status) = self.vote(kind).map(Vote::resolve_on_timeout) else {
            return Ok(());
        };
        log::info!("[table {}] {:?} vote timed out", self.table_id, kind);
        self.resolve_vote(kind, status, now)
    }

    fn on_dealer_step(&mut self, step: DealerStep, now: u64) -> Result<(), EngineError> {
        let open = self.round.phase.is_live() && self.round.outcome.is_none();
        match step {
            DealerStep::RunOut if open && self.round.all_in_showdown => self.run_out_step(now),
            DealerStep::BombPotStreet if open && self.round.bomb_pot.is_some() => self.bomb_pot_street_step(now),
            DealerStep::NextHand if self.game_started && !self.round.phase.is_live() => self.start_hand(now),
            _ => Ok(()),
        }
    }

    // ====== Ход раздачи ======

    fn start_hand(&mut self, now: u64) -> Result<(), EngineError> {
        let result = self.begin_hand(now);
        result.map_err(|e| self.escalate(e, now))
    }

    fn begin_hand(&mut self, now: u64) -> Result<(), EngineError> {
        self.timers.cancel_turn();
        self.timers.cancel_dealer();
        self.drop_run_it_twice_vote();

        let (busted, mut players): (Vec<Player>, Vec<Player>) = std::mem::take(&mut self.round.players)
            .into_iter()
            .partition(|p| p.chips.is_zero());
        for player in &busted {
            log::info!("[table {}] player {} busted", self.table_id, player.id);
            self.push(HandEventKind::PlayerBusted { player_id: player.id });
        }
        for player in players.iter_mut() {
            player.reset_for_hand();
        }

        if players.len() < self.config.min_players {
            self.round = Round::waiting(players, self.config.big_blind);
            if self.game_started {
                self.game_started = false;
                let remaining = self.round.players.iter().map(|p| p.id).collect();
                log::info!("[table {}] not enough players, game over", self.table_id);
                self.push(HandEventKind::GameOver { remaining });
            }
            return Ok(());
        }

        let dealer = next_dealer(self.last_dealer, players.len());
        self.last_dealer = Some(dealer);
        let hand_id = self.next_hand_id;
        self.next_hand_id += 1;

        let mut round = Round::waiting(players, self.config.big_blind);
        round.hand_id = hand_id;
        round.deck = Deck::new_shuffled(self.rng.as_mut());
        round.dealer_index = dealer;
        round.phase = Phase::Preflop;
        let dealer_id = round.players[dealer].id;
        self.round = round;

        let bomb = match self.scheduled_bomb_pot.take() {
            Some(scheduled) => {
                let participants = bomb_pot::select_participants(&self.round.players, &scheduled);
                if participants.len() >= 2 {
                    Some(BombPotHand {
                        stake: scheduled.stake,
                        participants,
                    })
                } else {
                    log::info!("[table {}] bomb pot cancelled: not enough funded players", self.table_id);
                    self.push(HandEventKind::BombPotCancelled { stake: scheduled.stake });
                    None
                }
            }
            None => None,
        };

        log::info!(
            "[table {}] hand #{} started, dealer={}, players={}",
            self.table_id,
            hand_id,
            dealer_id,
            self.round.players.len()
        );
        self.push(HandEventKind::HandStarted {
            hand_id,
            dealer: dealer_id,
            bomb_pot: bomb.is_some(),
        });

        match bomb {
            Some(bomb) => self.begin_bomb_pot_hand(bomb, now),
            None => {
                post_blinds(&mut self.round, &self.config, &mut self.history)?;
                deal_hole_cards(&mut self.round)?;
                let bb = self
                    .round
                    .big_blind_index
                    .ok_or(EngineError::Internal("blinds were not posted"))?;
                let progress = progress_from(&mut self.round, &self.config, bb, &mut self.history)?;
                self.handle_progress(progress, now)
            }
        }
    }

    /// Бомб-пот: ставки внесены, торговли нет, улицы открываются по таймеру.
    fn begin_bomb_pot_hand(&mut self, bomb: BombPotHand, now: u64) -> Result<(), EngineError> {
        bomb_pot::post_stakes(&mut self.round, &bomb);
        self.push(HandEventKind::BombPotStarted {
            stake: bomb.stake,
            participants: bomb.participants.clone(),
        });
        self.round.bomb_pot = Some(bomb);
        self.round.betting.current_bet = Chips::ZERO;
        self.round.current_player_index = None;

        deal_hole_cards(&mut self.round)?;
        self.timers
            .arm_dealer(DealerStep::BombPotStreet, now + self.rules.bomb_pot_street_delay_ms);
        Ok(())
    }

    fn bomb_pot_street_step(&mut self, now: u64) -> Result<(), EngineError> {
        let result = deal_next_street(&mut self.round, &mut self.history);
        result.map_err(|e| self.escalate(e, now))?;

        if self.round.community_cards.len() >= 5 {
            self.finish_showdown(EndReason::BombPot, now)
        } else {
            self.timers
                .arm_dealer(DealerStep::BombPotStreet, now + self.rules.bomb_pot_street_delay_ms);
            Ok(())
        }
    }

    /// Применить уже проверенное действие и отреагировать на результат.
    fn apply(&mut self, action: PlayerAction, source: ActionSource, now: u64) -> Result<(), EngineError> {
        let result = apply_action(&mut self.round, &self.config, action, source, &mut self.history);
        let progress = result.map_err(|e| self.escalate(e, now))?;
        let result = self.handle_progress(progress, now);
        result.map_err(|e| self.escalate(e, now))
    }

    fn handle_progress(&mut self, progress: Progress, now: u64) -> Result<(), EngineError> {
        match progress {
            Progress::AwaitingAction { index } => {
                self.arm_turn_timer(index, now);
                Ok(())
            }
            Progress::FoldWin => {
                self.round.won_by_fold = true;
                let outcome = resolve_fold_win(&mut self.round)?;
                self.end_round(outcome, now);
                Ok(())
            }
            Progress::AllInShowdown => self.begin_all_in_showdown(now),
            Progress::Showdown => self.finish_showdown(EndReason::Showdown, now),
        }
    }

    fn arm_turn_timer(&mut self, index: usize, now: u64) {
        let Some(player_id) = self.round.players.get(index).map(|p| p.id) else {
            return;
        };
        let expires_at = now + self.config.turn_timeout_ms();
        self.timers.arm_turn(player_id, expires_at);
        self.push(HandEventKind::TimerArmed {
            seat: index as SeatIndex,
            player_id,
            expires_at,
        });
    }

    fn clear_turn_timer(&mut self) {
        if let Some(timer) = self.timers.cancel_turn() {
            if let Some(player_id) = timer.subject {
                self.push(HandEventKind::TimerCleared { player_id });
            }
        }
    }

    /// Торговля окончена досрочно: либо голосуем за run-it-twice, либо докладываем борд.
    fn begin_all_in_showdown(&mut self, now: u64) -> Result<(), EngineError> {
        self.round.all_in_showdown = true;
        self.round.current_player_index = None;
        self.clear_turn_timer();
        log::info!("[table {}] all-in showdown", self.table_id);
        self.push(HandEventKind::AllInShowdown);

        if self.round.community_cards.len() >= 5 {
            return self.finish_showdown(EndReason::Showdown, now);
        }

        if run_it_twice::should_offer(&self.config, &self.round) {
            let expires_at = now + self.rules.run_it_twice_vote_ms;
            let vote = run_it_twice::open_vote(&self.round, expires_at);
            self.push(HandEventKind::VoteStarted {
                kind: VoteKind::RunItTwice,
                eligible: vote.eligible.clone(),
                expires_at,
            });
            self.timers.arm_vote(VoteKind::RunItTwice, expires_at);
            self.run_it_twice_vote = Some(vote);
        } else {
            self.timers
                .arm_dealer(DealerStep::RunOut, now + self.rules.run_out_card_delay_ms);
        }
        Ok(())
    }

    fn run_out_step(&mut self, now: u64) -> Result<(), EngineError> {
        let result = deal_next_street(&mut self.round, &mut self.history);
        result.map_err(|e| self.escalate(e, now))?;
        reset_street(&mut self.round, &self.config);

        if self.round.community_cards.len() >= 5 {
            self.finish_showdown(EndReason::Showdown, now)
        } else {
            self.timers
                .arm_dealer(DealerStep::RunOut, now + self.rules.run_out_card_delay_ms);
            Ok(())
        }
    }

    fn run_it_twice(&mut self, now: u64) -> Result<(), EngineError> {
        let result = run_it_twice::deal_dual_board(&mut self.round);
        let dual = result.map_err(|e| self.escalate(e, now))?;

        for (board, cards) in [(1u8, &dual.first), (2u8, &dual.second)] {
            self.push(HandEventKind::PhaseAdvanced {
                phase: Phase::River,
                community_cards: cards.clone(),
                board,
            });
        }
        self.round.phase = Phase::River;
        self.round.dual_board = Some(dual.clone());

        let result = resolve_run_it_twice(&mut self.round, &dual);
        let outcome = result.map_err(|e| self.escalate(e, now))?;
        self.end_round(outcome, now);
        Ok(())
    }

    fn finish_showdown(&mut self, reason: EndReason, now: u64) -> Result<(), EngineError> {
        let result = resolve_single_board(&mut self.round, reason);
        let outcome = result.map_err(|e| self.escalate(e, now))?;
        self.end_round(outcome, now);
        Ok(())
    }

    /// Раздача решена: фиксируем итог и планируем следующую.
    fn end_round(&mut self, outcome: RoundOutcome, now: u64) {
        self.round.phase = Phase::Showdown;
        self.round.current_player_index = None;
        self.clear_turn_timer();
        self.drop_run_it_twice_vote();

        let winners = outcome.awards();
        let pots = outcome.tiers.iter().map(|t| t.amount).collect();
        log::info!(
            "[table {}] hand #{} ended ({:?}): pot={}, winners={:?}",
            self.table_id,
            self.round.hand_id,
            outcome.reason,
            outcome.pot,
            winners
        );
        self.push(HandEventKind::RoundEnded {
            winners,
            pots,
            reason: outcome.reason,
        });
        self.round.outcome = Some(outcome);

        self.timers
            .arm_dealer(DealerStep::NextHand, now + self.rules.next_hand_delay_ms);
    }

    // ====== Голосования ======

    fn vote_slot(&mut self, kind: VoteKind) -> &mut Option<Vote> {
        match kind {
            VoteKind::BombPot => &mut self.bomb_pot_vote,
            VoteKind::RunItTwice => &mut self.run_it_twice_vote,
        }
    }

    /// Голосование за run-it-twice живёт только внутри своей раздачи.
    fn drop_run_it_twice_vote(&mut self) {
        self.run_it_twice_vote = None;
        self.timers.cancel_vote(VoteKind::RunItTwice);
    }

    fn resolve_vote(&mut self, kind: VoteKind, status: VoteStatus, now: u64) -> Result<(), EngineError> {
        let Some(vote) = self.vote_slot(kind).take() else {
            return Ok(());
        };
        self.timers.cancel_vote(kind);
        let approved = status == VoteStatus::Approved;
        log::info!(
            "[table {}] {:?} vote resolved: approved={} (yes={}, no={})",
            self.table_id,
            vote.kind,
            approved,
            vote.yes_count(),
            vote.no_count()
        );
        self.push(HandEventKind::VoteResolved {
            kind: vote.kind,
            approved,
        });

        match vote.kind {
            VoteKind::BombPot => {
                let stake = self.bomb_pot_offer.take();
                if let (true, Some(stake)) = (approved, stake) {
                    self.scheduled_bomb_pot = Some(ScheduledBombPot {
                        stake,
                        approved: vote.yes_voters(),
                    });
                }
                Ok(())
            }
            VoteKind::RunItTwice => {
                let open = self.round.all_in_showdown && self.round.outcome.is_none();
                if !open {
                    return Ok(());
                }
                if approved {
                    self.run_it_twice(now)
                } else {
                    self.timers
                        .arm_dealer(DealerStep::RunOut, now + self.rules.run_out_card_delay_ms);
                    Ok(())
                }
            }
        }
    }

    // ====== Ошибки ======

    /// Фатальная ошибка раунда: возвращаем всем вклады и откладываем новую раздачу.
    fn escalate(&mut self, err: EngineError, now: u64) -> EngineError {
        if err.kind() == ErrorKind::Validation {
            return err;
        }
        // Уже откатили на более глубоком уровне.
        if self.round.phase == Phase::Waiting && self.round.pot.total.is_zero() {
            return err;
        }
        log::error!(
            "[table {}] hand #{} aborted: {}",
            self.table_id,
            self.round.hand_id,
            err
        );
        for player in self.round.players.iter_mut() {
            player.chips += player.total_contribution;
            player.total_contribution = Chips::ZERO;
            player.current_bet = Chips::ZERO;
        }
        self.round.pot.take_all();
        self.round.phase = Phase::Waiting;
        self.round.current_player_index = None;
        self.timers.cancel_all();
        self.bomb_pot_vote = None;
        self.run_it_twice_vote = None;
        self.bomb_pot_offer = None;
        if self.game_started {
            self.timers
                .arm_dealer(DealerStep::NextHand, now + self.rules.next_hand_delay_ms);
        }
        err
    }

    fn push(&mut self, kind: HandEventKind) {
        self.history.push(self.round.hand_id, kind);
    }
}
