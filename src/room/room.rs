use super::event::Event;
use super::player::Player;
use super::table::Score;
use super::table::Table;
use super::timer::Timer;
use super::timer::TimerConfig;
use crate::game::Action;
use crate::game::Continuation;
use crate::game::Game;
use crate::game::Roles;
use crate::Position;
use crate::GAMES_PER_SERIES;
use tokio::sync::mpsc::*;

/// What a seat sends back to the room.
#[derive(Debug, Clone, Copy)]
pub enum Response {
    /// Acknowledgment of a broadcast; carries no action.
    Ack,
    /// An answer to a published action set.
    Move(Action),
}

/// Everything that can arrive on the room's single inbound channel: player
/// responses from the actor tasks, and lifecycle requests from the hosting
/// layer. One channel means one arrival order and one code path resuming the
/// machine.
#[derive(Debug, Clone, Copy)]
pub enum Signal {
    Reply(Position, Response),
    /// A seat's transport came back; clears the away flag and resends state.
    Reconnect(Position),
    /// Remove a seat outright; refused once the match is running.
    Disconnect(Position),
    /// Replace a seat with the automated stand-in; only while running.
    Concede(Position),
    /// An actor noticed its player's transport is gone.
    Dropped(Position),
}

/// Per-room knobs; every match owns its own copy.
#[derive(Debug, Clone, Copy)]
pub struct RoomConfig {
    pub timers: TimerConfig,
    /// Fixed replay cap for the series.
    pub games: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            timers: TimerConfig::default(),
            games: GAMES_PER_SERIES,
        }
    }
}

/// Lifecycle surface handed to the hosting layer. Requests travel the same
/// signal channel as responses and are honored at the next suspension point.
#[derive(Clone)]
pub struct RoomHandle {
    tx: UnboundedSender<Signal>,
}

impl RoomHandle {
    pub fn reconnect(&self, seat: Position) {
        let _ = self.tx.send(Signal::Reconnect(seat));
    }
    pub fn concede(&self, seat: Position) {
        let _ = self.tx.send(Signal::Concede(seat));
    }
    pub fn disconnect(&self, seat: Position) {
        let _ = self.tx.send(Signal::Disconnect(seat));
    }
}

/// Live match coordinator.
///
/// Owns the game (functional core), the table of seats, and the response
/// deadline. The machine advances only from here, on exactly two triggers: a
/// signal arriving or the deadline expiring, each handled to completion
/// before the next.
pub struct Room {
    config: RoomConfig,
    table: Table,
    timer: Timer,
    rx: UnboundedReceiver<Signal>,
    tx: UnboundedSender<Signal>,
    /// Seats still owing a response for the current cycle.
    owed: Vec<Position>,
    /// Dropped seats already granted their one reconnect window.
    graced: Vec<Position>,
    running: bool,
}

impl Room {
    pub fn new(config: RoomConfig) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            config,
            table: Table::new(tx.clone()),
            timer: Timer::new(config.timers),
            rx,
            tx,
            owed: Vec::new(),
            graced: Vec::new(),
            running: false,
        }
    }

    /// Register a player before the match starts; returns the seat index.
    pub fn sit(&mut self, name: &str, player: Box<dyn Player>, human: bool) -> Position {
        self.table.sit(name, player, human)
    }

    /// Remove a registered player. Legal only while the match has not
    /// started; mid-match churn goes through concede instead.
    pub fn disconnect(&mut self, seat: Position) {
        if self.running {
            log::error!("can't disconnect while the match runs, use concede");
            return;
        }
        if !self.table.withdraw(seat) {
            log::error!("cannot disconnect a seat that isn't in this match: {}", seat);
        }
    }

    pub fn handle(&self) -> RoomHandle {
        RoomHandle {
            tx: self.tx.clone(),
        }
    }

    /// Play the whole series; returns the final per-seat tallies.
    pub async fn run(mut self) -> Vec<(String, Score)> {
        assert!(self.table.len() >= 2, "a match needs at least two seats");
        self.table.launch();
        self.running = true;
        log::info!("[room] match starting with {} seats", self.table.len());
        for seat in 0..self.table.len() {
            self.table.unicast(
                seat,
                Event::Opponents {
                    others: self.table.opponents(seat),
                },
            );
        }
        let mut game = Game::new(self.table.len());
        for number in 1..=self.config.games {
            if number > 1 {
                game.reset();
            }
            log::info!("[room] game {} of {}", number, self.config.games);
            let durak = self.play(&mut game).await;
            if let Some(durak) = durak {
                for seat in 0..self.table.len() {
                    let score = self.table.score_mut(seat);
                    if seat == durak {
                        score.losses += 1;
                    } else {
                        score.wins += 1;
                    }
                }
            }
            self.sync(vec![Event::Over { durak, game: number }], &mut game)
                .await;
        }
        log::info!("[room] series over");
        self.table.scores()
    }

    /// One game, opening deck snapshot through game over.
    async fn play(&mut self, game: &mut Game) -> Option<Position> {
        self.sync(vec![game.opening()], game).await;
        loop {
            match game.advance() {
                Continuation::Sync(events) => self.sync(events, game).await,
                Continuation::Decision {
                    seat,
                    actions,
                    roles,
                } => self.decide(seat, actions, roles, game).await,
                Continuation::Over { durak } => return durak,
            }
        }
    }

    /// Broadcast events and gather an acknowledgment from every seat.
    async fn sync(&mut self, events: Vec<Event>, game: &mut Game) {
        for event in events {
            self.table.broadcast(event);
        }
        self.owed = (0..self.table.len()).collect();
        self.arm(game);
        self.collect(game).await;
    }

    /// Publish the action set to one seat and await its move.
    async fn decide(
        &mut self,
        seat: Position,
        actions: Vec<Action>,
        roles: Roles,
        game: &mut Game,
    ) {
        self.table.unicast(
            seat,
            Event::Decision {
                actions,
                deadline: self.timer.config().decision,
                roles,
            },
        );
        self.owed = vec![seat];
        self.arm(game);
        self.collect(game).await;
    }

    /// Suspension point: drain signals until nobody owes a response, applying
    /// the deadline default if the timer fires first.
    async fn collect(&mut self, game: &mut Game) {
        while !self.owed.is_empty() {
            let deadline = self
                .timer
                .deadline()
                .expect("timer armed while responses are owed");
            tokio::select! {
                signal = self.rx.recv() => match signal {
                    Some(Signal::Reply(seat, response)) => self.on_reply(game, seat, response),
                    Some(Signal::Concede(seat)) => self.on_concede(game, seat),
                    Some(Signal::Reconnect(seat)) => self.on_reconnect(game, seat),
                    Some(Signal::Disconnect(_)) => {
                        log::error!("can't disconnect while the match runs, use concede");
                    }
                    Some(Signal::Dropped(seat)) => self.on_dropped(game, seat),
                    None => {
                        log::warn!("[room] signal channel closed");
                        self.owed.clear();
                    }
                },
                _ = tokio::time::sleep_until(deadline) => self.on_timeout(game),
            }
        }
        self.timer.clear();
    }

    /// Re-arm the single deadline: the decision window when an action set is
    /// out, the ack window otherwise, stretched once per dropped seat to the
    /// reconnect grace.
    fn arm(&mut self, game: &Game) {
        let stragglers: Vec<Position> = self
            .owed
            .iter()
            .copied()
            .filter(|&s| !self.table.is_connected(s) && !self.graced.contains(&s))
            .collect();
        if !stragglers.is_empty() {
            for seat in stragglers {
                log::info!("[room] waiting for seat {} to reconnect", seat);
                self.graced.push(seat);
            }
            self.timer.arm_grace();
        } else if game.decider().is_some() {
            self.timer.arm_decision();
        } else {
            self.timer.arm_ack();
        }
    }

    /// A response arrived: acknowledgments clear the seat, moves go through
    /// the machine. Anything invalid is logged and dropped with no state
    /// change; the deadline keeps running.
    fn on_reply(&mut self, game: &mut Game, seat: Position, response: Response) {
        let Some(i) = self.owed.iter().position(|&s| s == seat) else {
            log::debug!("[room] late or uncalled response from seat {}", seat);
            return;
        };
        match response {
            Response::Ack => {
                if game.decider() == Some(seat) {
                    log::warn!("[room] seat {} owes an action but acknowledged instead", seat);
                    return;
                }
                self.owed.remove(i);
            }
            Response::Move(action) => match game.apply(seat, action) {
                Ok(events) => {
                    self.owed.remove(i);
                    self.resolve(events, game);
                }
                Err(e) => log::warn!("[room] rejected action from seat {}: {}", seat, e),
            },
        }
    }

    /// Broadcast resolved-action events and start the acknowledgment cycle
    /// for them. With no humans left the cycle is skipped and the events are
    /// flagged as requiring no response.
    fn resolve(&mut self, events: Vec<Event>, game: &mut Game) {
        let silent = self.table.humans() == 0;
        for mut event in events {
            if silent {
                if let Event::Resolved { no_response, .. } = &mut event {
                    *no_response = true;
                }
            }
            self.table.broadcast(event);
        }
        self.owed = if silent {
            Vec::new()
        } else {
            (0..self.table.len()).collect()
        };
        self.arm(game);
    }

    /// Deadline expiry. With a published action set: apply the deterministic
    /// default for the owing decider and tell that seat it was late. With
    /// none: everyone still owing is forgiven and the turn resumes.
    fn on_timeout(&mut self, game: &mut Game) {
        let names: Vec<&str> = self.owed.iter().map(|&s| self.table.name(s)).collect();
        log::warn!("[room] seats timed out: {}", names.join(" "));
        match (game.decider(), game.default_action()) {
            (Some(seat), Some(action)) => {
                log::info!("[room] applying default {} for seat {}", action, seat);
                match game.apply(seat, action) {
                    Ok(events) => {
                        self.table.unicast(seat, Event::Late);
                        self.owed.retain(|&s| s != seat);
                        self.resolve(events, game);
                    }
                    Err(e) => {
                        log::error!("[room] default action refused: {}", e);
                        self.owed.clear();
                    }
                }
            }
            _ => self.owed.clear(),
        }
    }

    /// Swap the automated stand-in into a conceded seat and, if the seat owes
    /// a response and a human remains, answer on its behalf immediately so
    /// the turn never stalls.
    fn on_concede(&mut self, game: &mut Game, seat: Position) {
        if !self.table.contains(seat) {
            log::error!("cannot concede a seat that isn't in this match: {}", seat);
            return;
        }
        if !self.table.is_human(seat) {
            log::warn!("[room] seat {} is already automated", seat);
            return;
        }
        let name = self.table.concede(seat);
        self.table.broadcast(Event::Conceded { seat, name });
        log::info!("[room] seat {} conceded", seat);
        let Some(i) = self.owed.iter().position(|&s| s == seat) else {
            return;
        };
        if self.table.humans() == 0 {
            return;
        }
        if game.decider() == Some(seat) {
            let action = game
                .default_action()
                .expect("a published decision set is never empty");
            match game.apply(seat, action) {
                Ok(events) => {
                    self.owed.remove(i);
                    self.resolve(events, game);
                }
                Err(e) => log::error!("[room] stand-in response refused: {}", e),
            }
        } else {
            self.owed.remove(i);
        }
    }

    /// A participant's transport came back: clear its away standing and
    /// resend the full redacted game state to that seat only.
    fn on_reconnect(&mut self, game: &mut Game, seat: Position) {
        if !self.table.contains(seat) {
            log::error!("cannot reconnect a seat that isn't in this match: {}", seat);
            return;
        }
        self.table.set_connected(seat, true);
        self.graced.retain(|&s| s != seat);
        self.table.unicast(seat, game.snapshot(seat));
        log::info!("[room] seat {} reconnected", seat);
    }

    /// An actor reported its player gone; the seat keeps playing by timeout
    /// defaults until it reconnects or concedes.
    fn on_dropped(&mut self, game: &mut Game, seat: Position) {
        log::info!("[room] seat {} lost its transport", seat);
        self.table.set_connected(seat, false);
        if self.owed.contains(&seat) {
            self.arm(game);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::event::Event;
    use crate::room::players::Remote;
    use crate::room::players::Synth;
    use std::time::Duration;

    fn quick() -> RoomConfig {
        RoomConfig {
            games: 1,
            timers: TimerConfig {
                ack: Duration::from_millis(50),
                decision: Duration::from_millis(200),
                grace: Duration::from_millis(400),
            },
        }
    }

    /// A seat that acknowledges broadcasts but never answers a decision.
    struct Mute;

    #[async_trait::async_trait]
    impl Player for Mute {
        async fn decide(&mut self, _: &[Action], _: &Roles) -> Action {
            std::future::pending().await
        }
        async fn notify(&mut self, _: &Event) {}
    }

    #[tokio::test(start_paused = true)]
    async fn bots_play_a_series() {
        let mut room = Room::new(RoomConfig {
            games: 2,
            ..quick()
        });
        room.sit("synth-0", Box::new(Synth), false);
        room.sit("synth-1", Box::new(Synth), false);
        room.sit("synth-2", Box::new(Synth), false);
        let scores = room.run().await;
        assert!(scores.len() == 3);
        let losses: u32 = scores.iter().map(|(_, s)| s.losses).sum();
        assert!(losses <= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timeouts_carry_a_mute_seat() {
        let mut room = Room::new(quick());
        room.sit("mute", Box::new(Mute), true);
        room.sit("synth", Box::new(Synth), false);
        let scores = room.run().await;
        assert!(scores.len() == 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concede_unsticks_a_pending_decision() {
        let mut room = Room::new(quick());
        room.sit("ann", Box::new(Mute), true);
        room.sit("bob", Box::new(Mute), true);
        let handle = room.handle();
        handle.concede(0);
        let scores = room.run().await;
        assert!(scores[0].0 == "Synth");
        assert!(scores[1].0 == "bob");
    }

    #[tokio::test(start_paused = true)]
    async fn lifecycle_misuse_is_refused() {
        let mut room = Room::new(quick());
        room.sit("synth-0", Box::new(Synth), false);
        room.sit("synth-1", Box::new(Synth), false);
        room.sit("late-joiner", Box::new(Synth), false);
        room.disconnect(2);
        let handle = room.handle();
        // queued for the running match: both must be refused without harm
        handle.disconnect(1);
        handle.concede(7);
        handle.reconnect(0);
        let scores = room.run().await;
        assert!(scores.len() == 2);
    }

    #[tokio::test(start_paused = true)]
    async fn remote_seat_plays_over_the_wire() {
        let (remote, mut out, tx) = Remote::new();
        tokio::spawn(async move {
            while let Some(line) = out.recv().await {
                let message: serde_json::Value =
                    serde_json::from_str(&line).expect("well formed wire message");
                if message["type"] == "decision" {
                    let action = message["actions"][0].as_str().expect("non empty actions");
                    let _ = tx.send(action.to_string());
                }
            }
        });
        let mut room = Room::new(quick());
        room.sit("human", Box::new(remote), true);
        room.sit("synth", Box::new(Synth), false);
        let scores = room.run().await;
        assert!(scores.len() == 2);
    }
}
