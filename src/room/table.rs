use super::actor::Actor;
use super::event::Event;
use super::event::Profile;
use super::player::Player;
use super::players::Synth;
use super::room::Signal;
use crate::Position;
use tokio::sync::mpsc::UnboundedSender;

/// Win/loss tally across a match series.
#[derive(Debug, Clone, Copy, Default)]
pub struct Score {
    pub wins: u32,
    pub losses: u32,
}

/// One chair: its display name, the channel into the player's actor task,
/// and the seat's standing flags.
struct Seat {
    name: String,
    sender: UnboundedSender<Event>,
    human: bool,
    connected: bool,
    score: Score,
}

/// Plain ordered collection of player-role records and their communication
/// endpoints. Seats are registered first, then launched into actor tasks
/// when the match starts; order never changes after that, even across a
/// concede.
pub struct Table {
    roster: Vec<(String, Box<dyn Player>, bool)>,
    seats: Vec<Seat>,
    signals: UnboundedSender<Signal>,
}

impl Table {
    pub fn new(signals: UnboundedSender<Signal>) -> Self {
        Self {
            roster: Vec::new(),
            seats: Vec::new(),
            signals,
        }
    }

    /// Register a player; returns the seat index.
    pub fn sit(&mut self, name: &str, player: Box<dyn Player>, human: bool) -> Position {
        assert!(self.seats.is_empty(), "cannot sit after the match started");
        self.roster.push((name.to_string(), player, human));
        self.roster.len() - 1
    }

    /// Withdraw a registered player before launch. False once launched.
    pub fn withdraw(&mut self, seat: Position) -> bool {
        if !self.seats.is_empty() || seat >= self.roster.len() {
            return false;
        }
        let (name, _, _) = self.roster.remove(seat);
        log::info!("[table] {} left before the match started", name);
        true
    }

    /// Spawn an actor task per registered player.
    pub fn launch(&mut self) {
        for (seat, (name, player, human)) in self.roster.drain(..).enumerate() {
            let sender = Actor::spawn(seat, player, self.signals.clone());
            self.seats.push(Seat {
                name,
                sender,
                human,
                connected: true,
                score: Score::default(),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.roster.len() + self.seats.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn contains(&self, seat: Position) -> bool {
        seat < self.seats.len()
    }
    pub fn name(&self, seat: Position) -> &str {
        &self.seats[seat].name
    }
    pub fn is_human(&self, seat: Position) -> bool {
        self.seats[seat].human
    }
    pub fn humans(&self) -> usize {
        self.seats.iter().filter(|s| s.human).count()
    }
    pub fn is_connected(&self, seat: Position) -> bool {
        self.seats[seat].connected
    }
    pub fn set_connected(&mut self, seat: Position, connected: bool) {
        self.seats[seat].connected = connected;
    }
    pub fn score_mut(&mut self, seat: Position) -> &mut Score {
        &mut self.seats[seat].score
    }
    pub fn scores(&self) -> Vec<(String, Score)> {
        self.seats
            .iter()
            .map(|s| (s.name.clone(), s.score))
            .collect()
    }

    /// Co-participant summaries for one seat.
    pub fn opponents(&self, seat: Position) -> Vec<Profile> {
        self.seats
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != seat)
            .map(|(i, s)| Profile {
                seat: i,
                name: s.name.clone(),
            })
            .collect()
    }

    /// Send an event to a single seat.
    pub fn unicast(&self, seat: Position, event: Event) {
        log::debug!("[table] unicast to {}: {}", seat, event);
        match self.seats.get(seat).map(|s| s.sender.send(event)) {
            Some(Ok(())) => {}
            Some(Err(e)) => log::warn!("[table] unicast to {} failed: {:?}", seat, e),
            None => log::warn!("[table] unicast to {}: no such seat", seat),
        }
    }

    /// Send an event to every seat, redacting card faces per recipient.
    pub fn broadcast(&self, event: Event) {
        log::debug!("[table] broadcast: {}", event);
        for (seat, chair) in self.seats.iter().enumerate() {
            if let Err(e) = chair.sender.send(event.redact(seat)) {
                log::warn!("[table] broadcast to {} failed: {:?}", seat, e);
            }
        }
    }

    /// Swap an automated stand-in into the seat, preserving order and
    /// standing. The old actor winds down when its channel drops. Returns
    /// the stand-in's name.
    pub fn concede(&mut self, seat: Position) -> String {
        let sender = Actor::spawn(seat, Box::new(Synth), self.signals.clone());
        let chair = &mut self.seats[seat];
        chair.sender = sender;
        chair.human = false;
        chair.connected = true;
        chair.name = String::from("Synth");
        chair.name.clone()
    }
}
