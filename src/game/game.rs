use super::action::Action;
use super::field::Field;
use super::roles::Roles;
use super::stage::Stage;
use crate::cards::Card;
use crate::cards::Deck;
use crate::cards::Rank;
use crate::cards::Suit;
use crate::room::event::CardView;
use crate::room::event::Deal;
use crate::room::event::Deed;
use crate::room::event::Event;
use crate::Cid;
use crate::Position;
use crate::HAND_SIZE;
use std::collections::HashSet;
use std::collections::VecDeque;

/// Where a card currently lives. Every card occupies exactly one spot for the
/// life of the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Spot {
    Deck,
    /// Face-up trump at the back of the deck; the last card dealt.
    Bottom,
    Hand(Position),
    Table(usize),
    Pile,
}

impl std::fmt::Display for Spot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Spot::Deck => write!(f, "deck"),
            Spot::Bottom => write!(f, "bottom"),
            Spot::Hand(seat) => write!(f, "hand {}", seat),
            Spot::Table(slot) => write!(f, "slot {}", slot),
            Spot::Pile => write!(f, "pile"),
        }
    }
}

/// What the coordinator must do next to move the match forward.
#[derive(Debug)]
pub enum Continuation {
    /// Broadcast these events and gather an acknowledgment from every seat.
    Sync(Vec<Event>),
    /// Publish the action set to one seat and await its move.
    Decision {
        seat: Position,
        actions: Vec<Action>,
        roles: Roles,
    },
    /// Fewer than two seats still hold cards; the game is over.
    Over { durak: Option<Position> },
}

/// Why an inbound action was refused. Refusals never mutate state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Rejection {
    /// The acting seat is not the one the machine is waiting on.
    Uninvited(Position),
    /// The action is outside the published valid set.
    Unpublished(Action),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Rejection::Uninvited(seat) => write!(f, "seat {} was not asked to move", seat),
            Rejection::Unpublished(action) => write!(f, "{} is not a published action", action),
        }
    }
}

impl std::error::Error for Rejection {}

/// One game of Durak: every card, every hand, the field, and the turn-stage
/// machine, advanced one trigger at a time.
///
/// The machine suspends in exactly two ways: a [`Continuation::Sync`] that
/// paces notifications, and a [`Continuation::Decision`] that publishes the
/// legal action set for one seat. [`Game::apply`] is the only inbound
/// mutation path and accepts nothing outside the published set.
#[derive(Debug)]
pub struct Game {
    seats: usize,
    /// Card table; a `Cid` is an index here, assigned in shuffled-deck order.
    cards: Vec<Card>,
    spots: Vec<Spot>,
    deck: VecDeque<Cid>,
    hands: Vec<Vec<Cid>>,
    field: Field,
    pile: Vec<Cid>,
    trump: Suit,
    active: Vec<Position>,
    roles: Option<Roles>,
    stage: Option<Stage>,
    last: Option<Stage>,
    skips: usize,
    turn: u32,
    game: u32,
    started: bool,
    /// Set on a take; the taker opens the next turn.
    next_attacker: Option<Position>,
    legal: Vec<Action>,
    decider: Option<Position>,
}

impl Game {
    pub fn new(seats: usize) -> Self {
        assert!(seats >= 2, "a game needs at least two seats");
        let deck = Deck::new(seats);
        let trump = deck.trump();
        let cards = deck.cards().to_vec();
        let mut spots = vec![Spot::Deck; cards.len()];
        *spots.last_mut().expect("non-empty deck") = Spot::Bottom;
        log::info!("new game: {} seats, {} cards, trump {}", seats, cards.len(), trump);
        Self {
            seats,
            deck: (0..cards.len()).collect(),
            cards,
            spots,
            hands: vec![Vec::new(); seats],
            field: Field::new(),
            pile: Vec::new(),
            trump,
            active: (0..seats).collect(),
            roles: None,
            stage: None,
            last: None,
            skips: 0,
            turn: 0,
            game: 1,
            started: false,
            next_attacker: None,
            legal: Vec::new(),
            decider: None,
        }
    }

    /// Re-initialize every piece of mutable state for a rematch.
    pub fn reset(&mut self) {
        let game = self.game + 1;
        *self = Self::new(self.seats);
        self.game = game;
    }

    pub fn trump(&self) -> Suit {
        self.trump
    }
    pub fn card(&self, cid: Cid) -> Card {
        self.cards[cid]
    }
    pub fn hand(&self, seat: Position) -> &[Cid] {
        &self.hands[seat]
    }
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }
    pub fn pile_len(&self) -> usize {
        self.pile.len()
    }
    pub fn active(&self) -> &[Position] {
        &self.active
    }
    pub fn roles(&self) -> Option<Roles> {
        self.roles
    }
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }
    pub fn turn(&self) -> u32 {
        self.turn
    }
    pub fn number(&self) -> u32 {
        self.game
    }
    /// The currently published action set; empty outside a decision window.
    pub fn legal(&self) -> &[Action] {
        &self.legal
    }
    /// The seat the published action set belongs to.
    pub fn decider(&self) -> Option<Position> {
        self.decider
    }

    /// Deterministic stand-in choice for timeouts and conceded seats:
    /// yield (skip or take) when offered, else the first published action.
    pub fn default_action(&self) -> Option<Action> {
        self.legal
            .iter()
            .copied()
            .find(Action::is_pass)
            .or_else(|| self.legal.first().copied())
    }

    /// Trump beats any non-trump; otherwise strictly higher in the same suit.
    pub fn beats(&self, card: Card, attack: Card) -> bool {
        (card.suit() == self.trump && attack.suit() != self.trump)
            || (card.suit() == attack.suit() && card.rank() > attack.rank())
    }

    /// Opening deck snapshot: every card hidden except the trump bottom.
    pub fn opening(&self) -> Event {
        Event::Cards {
            views: self.deck.iter().map(|&cid| self.view(cid, None)).collect(),
            trump: None,
        }
    }

    /// Full-state resend for a reconnecting seat: the deck, every hand, and
    /// the field, with faces redacted down to what the viewer may see.
    pub fn snapshot(&self, viewer: Position) -> Event {
        let mut views: Vec<CardView> = self
            .deck
            .iter()
            .map(|&cid| self.view(cid, Some(viewer)))
            .collect();
        for hand in &self.hands {
            views.extend(hand.iter().map(|&cid| self.view(cid, Some(viewer))));
        }
        for slot in self.field.slots() {
            views.extend(
                slot.attack()
                    .into_iter()
                    .chain(slot.defense())
                    .map(|cid| self.view(cid, Some(viewer))),
            );
        }
        Event::Cards {
            views,
            trump: Some(self.trump),
        }
    }

    /// Drive the machine to its next suspension point.
    pub fn advance(&mut self) -> Continuation {
        loop {
            if !self.started {
                self.started = true;
                let deals = self.first_deal();
                if !deals.is_empty() {
                    return Continuation::Sync(vec![Event::Deals { deals }]);
                }
                continue;
            }
            if self.roles.is_none() {
                if let Some(event) = self.open() {
                    return Continuation::Sync(vec![event]);
                }
                continue;
            }
            match self.stage {
                None | Some(Stage::Ended) => {
                    if self.stage.take().is_some() && !self.rotate() {
                        log::info!("game {} over", self.game);
                        return Continuation::Over {
                            durak: self.durak(),
                        };
                    }
                    self.turn += 1;
                    let roles = self.roles.expect("rotation keeps at least two seats");
                    log::info!(
                        "turn {}: {} | deck {} pile {}",
                        self.turn,
                        roles,
                        self.deck.len(),
                        self.pile.len()
                    );
                    self.shift(Stage::InitialAttack);
                }
                Some(Stage::EndDeal) => {
                    self.stage = Some(Stage::Ended);
                    let deals = self.replenish();
                    if !deals.is_empty() {
                        return Continuation::Sync(vec![Event::Deals { deals }]);
                    }
                }
                Some(Stage::InitialAttack) | Some(Stage::RepeatingAttack) | Some(Stage::Attack) => {
                    let roles = self.roles.expect("roles assigned");
                    if let Some(next) = self.let_attack(roles.attacker) {
                        return next;
                    }
                }
                Some(Stage::Support) => {
                    let roles = self.roles.expect("roles assigned");
                    let seat = match roles.ally {
                        Some(ally) => ally,
                        None => {
                            log::error!("no ally assigned but stage is SUPPORT");
                            debug_assert!(false, "support stage without an ally");
                            roles.attacker
                        }
                    };
                    if let Some(next) = self.let_attack(seat) {
                        return next;
                    }
                }
                Some(Stage::Followup) => {
                    let roles = self.roles.expect("roles assigned");
                    let seat = if self.skips == 0 {
                        roles.attacker
                    } else {
                        roles.ally.unwrap_or(roles.attacker)
                    };
                    if let Some(next) = self.let_attack(seat) {
                        return next;
                    }
                }
                Some(Stage::Defense) => {
                    let roles = self.roles.expect("roles assigned");
                    if let Some(next) = self.let_defend(roles.defender) {
                        return next;
                    }
                }
                Some(Stage::End) => {
                    if let Some(next) = self.discard() {
                        return next;
                    }
                }
            }
        }
    }

    /// The single inbound mutation path: validate a response against the
    /// published set, relocate cards, and shift the stage. Returns the
    /// resolved-action events to broadcast.
    pub fn apply(&mut self, seat: Position, action: Action) -> Result<Vec<Event>, Rejection> {
        if self.decider != Some(seat) {
            return Err(Rejection::Uninvited(seat));
        }
        if !self.legal.contains(&action) {
            return Err(Rejection::Unpublished(action));
        }
        self.legal.clear();
        self.decider = None;
        let events = match action {
            Action::Attack { cid, slot } => {
                log::info!(
                    "seat {} {} with {}",
                    seat,
                    if self.last == Some(Stage::Followup) {
                        "follows up"
                    } else {
                        "attacks"
                    },
                    self.cards[cid]
                );
                self.play_card(seat, cid, Spot::Table(slot), "ATTACK");
                self.field.attack(slot, cid);
                if self.last == Some(Stage::Followup) {
                    self.shift(Stage::Followup);
                } else {
                    self.skips = 0;
                }
                vec![Event::Resolved {
                    seat: Some(seat),
                    deed: Deed::Attack {
                        cid,
                        slot,
                        card: self.cards[cid],
                    },
                    no_response: false,
                }]
            }
            Action::Defense { cid, slot } => {
                log::info!("seat {} defends with {}", seat, self.cards[cid]);
                self.play_card(seat, cid, Spot::Table(slot), "DEFENSE");
                self.field.defend(slot, cid);
                vec![Event::Resolved {
                    seat: Some(seat),
                    deed: Deed::Defense {
                        cid,
                        slot,
                        card: self.cards[cid],
                    },
                    no_response: false,
                }]
            }
            Action::Skip => {
                log::info!("seat {} skips", seat);
                let roles = self.roles.expect("roles assigned");
                if self.active.len() > 2 && roles.ally.is_none() {
                    log::error!("more than two active seats but no ally assigned");
                    debug_assert!(false, "ally missing with {} active seats", self.active.len());
                }
                let (next, skips) = Stage::after_skip(self.last, self.skips, roles.ally.is_some());
                self.skips = skips;
                if let Some(stage) = next {
                    self.shift(stage);
                }
                vec![Event::Resolved {
                    seat: Some(seat),
                    deed: Deed::Skip,
                    no_response: false,
                }]
            }
            Action::Take => {
                log::info!("seat {} takes", seat);
                self.skips = 0;
                self.shift(Stage::Followup);
                vec![Event::Resolved {
                    seat: Some(seat),
                    deed: Deed::Take,
                    no_response: false,
                }]
            }
        };
        debug_assert!(self.conserved(), "card conservation violated");
        Ok(events)
    }

    /// Card conservation: every card reachable from exactly one container,
    /// with its spot entry in agreement.
    pub fn conserved(&self) -> bool {
        let mut seen = vec![0usize; self.cards.len()];
        let mut agree = true;
        for &cid in &self.deck {
            seen[cid] += 1;
            agree &= matches!(self.spots[cid], Spot::Deck | Spot::Bottom);
        }
        for (seat, hand) in self.hands.iter().enumerate() {
            for &cid in hand {
                seen[cid] += 1;
                agree &= self.spots[cid] == Spot::Hand(seat);
            }
        }
        for (slot, pair) in self.field.slots().iter().enumerate() {
            for cid in pair.attack().into_iter().chain(pair.defense()) {
                seen[cid] += 1;
                agree &= self.spots[cid] == Spot::Table(slot);
            }
        }
        for &cid in &self.pile {
            seen[cid] += 1;
            agree &= self.spots[cid] == Spot::Pile;
        }
        agree && seen.iter().all(|&n| n == 1)
    }

    /// Record the stage and remember the one before it.
    fn shift(&mut self, stage: Stage) {
        self.last = self.stage;
        self.stage = Some(stage);
    }

    /// Provenance-logged relocation; the only way a card moves.
    fn relocate(&mut self, cid: Cid, to: Spot, verb: &str) {
        log::trace!(
            "{} : {} {} => {}",
            self.cards[cid],
            verb,
            self.spots[cid],
            to
        );
        self.spots[cid] = to;
    }

    fn play_card(&mut self, seat: Position, cid: Cid, to: Spot, verb: &str) {
        let i = self.hands[seat]
            .iter()
            .position(|&c| c == cid)
            .expect("published actions reference cards in hand");
        self.hands[seat].remove(i);
        self.relocate(cid, to, verb);
    }

    /// Remove the front deck card into a hand. `None` once the deck is dry;
    /// that is not an error, deals just stop early.
    fn deal_one(&mut self, seat: Position) -> Option<Deal> {
        let cid = self.deck.pop_front()?;
        self.relocate(cid, Spot::Hand(seat), "DEAL");
        self.hands[seat].push(cid);
        Some(Deal {
            seat,
            cid,
            card: Some(self.cards[cid]),
        })
    }

    /// Opening deal: one card at a time around the table until everyone
    /// holds a full hand.
    fn first_deal(&mut self) -> Vec<Deal> {
        let mut deals = Vec::new();
        for _ in 0..HAND_SIZE {
            for seat in 0..self.seats {
                deals.extend(self.deal_one(seat));
            }
        }
        deals
    }

    /// Top every active hand back up, starting at the attacker and following
    /// the rotation, until hands are full or the deck runs dry.
    fn replenish(&mut self) -> Vec<Deal> {
        let attacker = self.roles.expect("roles assigned").attacker;
        let start = self
            .active
            .iter()
            .position(|&p| p == attacker)
            .unwrap_or(0);
        let mut deals = Vec::new();
        for i in 0..self.active.len() {
            let seat = self.active[(start + i) % self.active.len()];
            while self.hands[seat].len() < HAND_SIZE {
                match self.deal_one(seat) {
                    Some(deal) => deals.push(deal),
                    None => return deals,
                }
            }
        }
        deals
    }

    /// Pick the first attacker by the lowest trump held; reveal each hand's
    /// minimum trump to everyone. No trumps anywhere: seat 0 opens silently.
    fn open(&mut self) -> Option<Event> {
        let mut reveals: Vec<(Position, Card)> = Vec::new();
        for &seat in &self.active {
            let lowest = self.hands[seat]
                .iter()
                .map(|&cid| self.cards[cid])
                .filter(|c| c.suit() == self.trump)
                .min_by_key(|c| c.rank());
            if let Some(card) = lowest {
                reveals.push((seat, card));
            }
        }
        match reveals.iter().min_by_key(|(_, c)| c.rank()).copied() {
            Some((first, card)) => {
                self.roles = Some(Roles::seated(&self.active, first));
                log::info!("seat {} opens with the lowest trump {}", first, card);
                Some(Event::Openers { reveals, first })
            }
            None => {
                self.roles = Some(Roles::seated(&self.active, self.active[0]));
                log::info!("no trumps dealt, seat {} opens", self.active[0]);
                None
            }
        }
    }

    /// Publish attack options for one seat, or close the window when the
    /// field is full or the defender is already out of cards.
    fn let_attack(&mut self, seat: Position) -> Option<Continuation> {
        let stage = self.stage.expect("attacking stages are explicit");
        let defender = self.roles.expect("roles assigned").defender;
        if self.field.is_full()
            || (stage != Stage::Followup && self.hands[defender].is_empty())
        {
            log::debug!("field is full or defender has no cards");
            self.shift(Stage::Defense);
            return None;
        }
        let ranks: HashSet<Rank> = self
            .field
            .cids()
            .iter()
            .map(|&cid| self.cards[cid].rank())
            .collect();
        let slot = self.field.next_slot();
        let mut actions: Vec<Action> = self.hands[seat]
            .iter()
            .filter(|&&cid| ranks.is_empty() || ranks.contains(&self.cards[cid].rank()))
            .map(|&cid| Action::Attack { cid, slot })
            .collect();
        if stage != Stage::InitialAttack {
            actions.push(Action::Skip);
        }
        self.shift(Stage::Defense);
        Some(self.publish(seat, actions))
    }

    /// Publish defense options for the first unanswered attack; resolve the
    /// turn when nothing is left unanswered, or hand the field to a taker
    /// whose catch-up window just closed.
    fn let_defend(&mut self, seat: Position) -> Option<Continuation> {
        if self.last == Some(Stage::Followup) {
            let cids = self.field.sweep();
            for &cid in &cids {
                self.relocate(cid, Spot::Hand(seat), "TAKE");
                self.hands[seat].push(cid);
            }
            log::info!("seat {} picks up {} cards", seat, cids.len());
            // the taker deals first and opens the next turn
            if let Some(roles) = self.roles.as_mut() {
                roles.attacker = seat;
            }
            self.next_attacker = Some(seat);
            self.shift(Stage::End);
            debug_assert!(self.conserved(), "card conservation violated");
            return Some(Continuation::Sync(vec![Event::Resolved {
                seat: Some(seat),
                deed: Deed::Took { cids },
                no_response: false,
            }]));
        }
        let (slot, attack) = match self.field.unanswered() {
            None => {
                log::info!("seat {} successfully defended", seat);
                self.shift(Stage::End);
                return None;
            }
            Some((slot, cid)) => (slot, self.cards[cid]),
        };
        let mut actions: Vec<Action> = self.hands[seat]
            .iter()
            .filter(|&&cid| self.beats(self.cards[cid], attack))
            .map(|&cid| Action::Defense { cid, slot })
            .collect();
        actions.push(Action::Take);
        let next = Stage::after_defense(self.last);
        self.shift(next);
        Some(self.publish(seat, actions))
    }

    /// Sweep beaten cards to the pile, or go straight to the deal when the
    /// field was already taken.
    fn discard(&mut self) -> Option<Continuation> {
        self.last = None;
        self.skips = 0;
        let cids = self.field.sweep();
        if cids.is_empty() {
            self.stage = Some(Stage::Ended);
            let deals = self.replenish();
            if deals.is_empty() {
                return None;
            }
            return Some(Continuation::Sync(vec![Event::Deals { deals }]));
        }
        for &cid in &cids {
            self.relocate(cid, Spot::Pile, "DISCARD");
            self.pile.push(cid);
        }
        self.field.expand();
        self.stage = Some(Stage::EndDeal);
        debug_assert!(self.conserved(), "card conservation violated");
        Some(Continuation::Sync(vec![Event::Resolved {
            seat: None,
            deed: Deed::Discard { cids },
            no_response: false,
        }]))
    }

    /// End of turn: once the deck is dry, drop every emptied hand from the
    /// rotation, then recompute roles with the previous attacker's relative
    /// position preserved where possible. False ends the game.
    fn rotate(&mut self) -> bool {
        let prev = self.roles.expect("roles assigned").attacker;
        let mut anchor = self
            .active
            .iter()
            .position(|&p| p == prev)
            .expect("the previous attacker is in the rotation") as isize;
        if self.deck.is_empty() {
            for i in (0..self.active.len()).rev() {
                let seat = self.active[i];
                if self.hands[seat].is_empty() {
                    self.active.remove(i);
                    log::info!("seat {} is out of the game", seat);
                    if self.active.get(anchor as usize).copied() != Some(prev) {
                        match self.active.iter().position(|&p| p == prev) {
                            Some(now) => anchor = now as isize - 1,
                            None if anchor as usize >= self.active.len() => {
                                anchor = self.active.len() as isize - 1
                            }
                            None => {}
                        }
                    }
                }
            }
            if self.active.len() < 2 {
                return false;
            }
        }
        let len = self.active.len() as isize;
        let next = match self.next_attacker.take() {
            Some(taker) if self.active.contains(&taker) => taker,
            _ => self.active[(anchor + 1).rem_euclid(len) as usize],
        };
        self.roles = Some(Roles::seated(&self.active, next));
        true
    }

    fn durak(&self) -> Option<Position> {
        match self.active.as_slice() {
            &[last] => Some(last),
            _ => None,
        }
    }

    fn publish(&mut self, seat: Position, actions: Vec<Action>) -> Continuation {
        debug_assert!(!actions.is_empty(), "published action sets are never empty");
        self.legal = actions.clone();
        self.decider = Some(seat);
        Continuation::Decision {
            seat,
            actions,
            roles: self.roles.expect("roles assigned"),
        }
    }

    fn view(&self, cid: Cid, viewer: Option<Position>) -> CardView {
        let open = match self.spots[cid] {
            Spot::Bottom | Spot::Table(_) => true,
            Spot::Hand(seat) => viewer == Some(seat),
            Spot::Deck | Spot::Pile => false,
        };
        CardView {
            cid,
            card: open.then(|| self.cards[cid]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Advance past sync points to the next decision; `None` once over.
    fn until_decision(game: &mut Game) -> Option<(Position, Vec<Action>)> {
        loop {
            match game.advance() {
                Continuation::Sync(_) => continue,
                Continuation::Decision { seat, actions, .. } => return Some((seat, actions)),
                Continuation::Over { .. } => return None,
            }
        }
    }

    /// Always plays the first published action; returns the durak.
    fn autoplay(game: &mut Game, limit: usize) -> Option<Position> {
        for _ in 0..limit {
            match game.advance() {
                Continuation::Sync(_) => {}
                Continuation::Decision { seat, actions, .. } => {
                    assert!(game.apply(seat, actions[0]).is_ok());
                    assert!(game.conserved());
                }
                Continuation::Over { durak } => return durak,
            }
        }
        panic!("game failed to terminate within {} steps", limit);
    }

    #[test]
    fn opening_deal_heads_up() {
        let mut game = Game::new(2);
        let (seat, actions) = until_decision(&mut game).expect("first decision");
        assert!(game.hand(0).len() == 6);
        assert!(game.hand(1).len() == 6);
        assert!(game.deck_len() == 24);
        assert!(game.conserved());
        assert!(game.roles().unwrap().attacker == seat);
        assert!(game.roles().unwrap().ally.is_none());
        // the very first attack offers no skip, and the whole hand is legal
        assert!(!actions.contains(&Action::Skip));
        assert!(actions.len() == 6);
    }

    #[test]
    fn trump_bottom_is_visible_in_the_opening_snapshot() {
        let game = Game::new(2);
        let Event::Cards { views, .. } = game.opening() else {
            panic!("opening is a cards event");
        };
        assert!(views.len() == 36);
        let faces: Vec<_> = views.iter().filter(|v| v.card.is_some()).collect();
        assert!(faces.len() == 1);
        assert!(faces[0].card.unwrap().suit() == game.trump());
    }

    #[test]
    fn snapshot_redacts_everything_but_the_viewer() {
        let mut game = Game::new(2);
        until_decision(&mut game).unwrap();
        let Event::Cards { views, trump } = game.snapshot(0) else {
            panic!("snapshot is a cards event");
        };
        assert!(trump == Some(game.trump()));
        // 24 in the deck (one face up) + two hands of 6
        assert!(views.len() == 36);
        let faces = views.iter().filter(|v| v.card.is_some()).count();
        assert!(faces == 7);
    }

    #[test]
    fn refuses_unpublished_actions() {
        let mut game = Game::new(2);
        let (seat, actions) = until_decision(&mut game).unwrap();
        let other = (seat + 1) % 2;
        assert!(game.apply(other, actions[0]).unwrap_err() == Rejection::Uninvited(other));
        assert!(game.apply(seat, Action::Take).unwrap_err() == Rejection::Unpublished(Action::Take));
        // refusals leave the published set intact
        assert!(game.decider() == Some(seat));
        assert!(game.apply(seat, actions[0]).is_ok());
    }

    #[test]
    fn defense_options_are_exactly_the_beating_cards() {
        let mut game = Game::new(2);
        let (attacker, actions) = until_decision(&mut game).unwrap();
        let attack_cid = actions[0].cid().unwrap();
        let attack = game.card(attack_cid);
        game.apply(attacker, actions[0]).unwrap();
        let (defender, actions) = until_decision(&mut game).unwrap();
        assert!(defender != attacker);
        assert!(actions.last() == Some(&Action::Take));
        for &cid in game.hand(defender) {
            let listed = actions
                .iter()
                .any(|a| a.cid() == Some(cid));
            assert!(listed == game.beats(game.card(cid), attack));
        }
    }

    #[test]
    fn take_hands_the_field_to_the_defender() {
        let mut game = Game::new(2);
        let (attacker, actions) = until_decision(&mut game).unwrap();
        game.apply(attacker, actions[0]).unwrap();
        let (defender, _) = until_decision(&mut game).unwrap();
        game.apply(defender, Action::Take).unwrap();
        // catch-up window: pile on while possible, then close it
        let mut placed = 1;
        loop {
            let (seat, actions) = until_decision(&mut game).unwrap();
            if seat == defender {
                // next turn opened by the taker
                assert!(game.roles().unwrap().attacker == defender);
                assert!(game.turn() == 2);
                break;
            }
            match actions[0] {
                attack @ Action::Attack { .. } => {
                    placed += 1;
                    game.apply(seat, attack).unwrap();
                }
                _ => {
                    game.apply(seat, Action::Skip).unwrap();
                }
            }
        }
        // every field card went to the taker, topped back up to a full hand
        assert!(game.hand(defender).len() == 6 + placed);
        assert!(game.conserved());
    }

    #[test]
    fn clean_defense_rotates_to_the_defender() {
        // policy: one attack, then skip; defend when possible, else take
        for _ in 0..16 {
            let mut game = Game::new(2);
            let (attacker, actions) = until_decision(&mut game).unwrap();
            let roles = game.roles().unwrap();
            game.apply(attacker, actions[0]).unwrap();
            let (defender, actions) = until_decision(&mut game).unwrap();
            if actions.len() == 1 {
                continue; // nothing beats it; taking is covered elsewhere
            }
            game.apply(defender, actions[0]).unwrap();
            let (seat, actions) = until_decision(&mut game).unwrap();
            assert!(seat == attacker);
            let skippable = actions.contains(&Action::Skip);
            assert!(skippable);
            game.apply(seat, Action::Skip).unwrap();
            let (seat, _) = until_decision(&mut game).unwrap();
            // turn resolved: previous defender attacks next
            assert!(game.turn() == 2);
            assert!(seat == roles.defender);
            assert!(game.roles().unwrap().attacker == roles.defender);
            assert!(game.pile_len() == 2);
            return;
        }
        panic!("no defensible opening attack in sixteen deals");
    }

    #[test]
    fn default_prefers_yielding() {
        let mut game = Game::new(2);
        let (attacker, actions) = until_decision(&mut game).unwrap();
        // initial attack has no pass option: default is the first action
        assert!(game.default_action() == Some(actions[0]));
        game.apply(attacker, actions[0]).unwrap();
        until_decision(&mut game).unwrap();
        assert!(game.default_action() == Some(Action::Take));
    }

    #[test]
    fn heads_up_game_terminates_conserved() {
        let durak = autoplay(&mut Game::new(2), 100_000);
        if let Some(seat) = durak {
            assert!(seat < 2);
        }
    }

    #[test]
    fn three_seats_play_with_an_ally() {
        let mut game = Game::new(3);
        until_decision(&mut game).unwrap();
        assert!(game.roles().unwrap().ally.is_some());
        let durak = autoplay(&mut game, 100_000);
        if let Some(seat) = durak {
            assert!(seat < 3);
        }
    }

    #[test]
    fn big_table_uses_the_full_deck() {
        let mut game = Game::new(5);
        until_decision(&mut game).unwrap();
        assert!(game.deck_len() == 52 - 5 * 6);
        let durak = autoplay(&mut game, 200_000);
        if let Some(seat) = durak {
            assert!(seat < 5);
        }
    }

    #[test]
    fn elimination_leaves_only_loaded_hands() {
        let mut game = Game::new(3);
        autoplay(&mut game, 100_000);
        assert!(game.deck_len() == 0);
        assert!(game.active().len() < 2);
        for &seat in game.active() {
            assert!(!game.hand(seat).is_empty());
        }
        assert!(game.conserved());
    }

    #[test]
    fn reset_rebuilds_a_fresh_game() {
        let mut game = Game::new(2);
        autoplay(&mut game, 100_000);
        game.reset();
        assert!(game.number() == 2);
        assert!(game.turn() == 0);
        assert!(game.deck_len() == 36);
        assert!(game.conserved());
        until_decision(&mut game).unwrap();
        assert!(game.hand(0).len() == 6);
    }
}
