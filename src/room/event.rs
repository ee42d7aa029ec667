use crate::cards::Card;
use crate::cards::Suit;
use crate::game::Action;
use crate::game::Roles;
use crate::Cid;
use crate::Position;
use std::time::Duration;

/// What one recipient may see of a card: the identity always, the face only
/// when entitled (own hand, cards in play, the trump bottom).
#[derive(Debug, Clone, Copy)]
pub struct CardView {
    pub cid: Cid,
    pub card: Option<Card>,
}

/// One dealt card. The face survives redaction only for the receiving seat.
#[derive(Debug, Clone, Copy)]
pub struct Deal {
    pub seat: Position,
    pub cid: Cid,
    pub card: Option<Card>,
}

/// Co-participant summary shared at match setup.
#[derive(Debug, Clone)]
pub struct Profile {
    pub seat: Position,
    pub name: String,
}

/// A validated action as it resolved on the table.
///
/// Attacks and defenses reveal the played card to everyone. `Took` and
/// `Discard` move cards whose faces are already public, so they carry ids
/// only.
#[derive(Debug, Clone)]
pub enum Deed {
    Attack { cid: Cid, slot: usize, card: Card },
    Defense { cid: Cid, slot: usize, card: Card },
    Skip,
    Take,
    /// The catch-up window closed and the whole field moved into the taker's
    /// hand.
    Took { cids: Vec<Cid> },
    /// Beaten cards left the field for the discard pile.
    Discard { cids: Vec<Cid> },
}

/// Events pushed from a match to its players.
///
/// Everything a player ever learns arrives through one of these; the room
/// broadcasts them through per-seat redaction, so no event ever carries a
/// face its recipient has not earned.
#[derive(Debug, Clone)]
pub enum Event {
    /// Co-participants, sent once at match setup.
    Opponents { others: Vec<Profile> },
    /// Card composition: the opening deck snapshot, or the full-state resend
    /// on reconnect (which also repeats the trump suit).
    Cards {
        views: Vec<CardView>,
        trump: Option<Suit>,
    },
    /// Newly dealt cards.
    Deals { deals: Vec<Deal> },
    /// Lowest trump per hand, revealed to decide who opens the first turn.
    Openers {
        reveals: Vec<(Position, Card)>,
        first: Position,
    },
    /// It's your move: the exact action set the machine will accept.
    Decision {
        actions: Vec<Action>,
        deadline: Duration,
        roles: Roles,
    },
    /// A validated action resolved on the table. `seat` is absent for the
    /// table's own deeds (the discard sweep).
    Resolved {
        seat: Option<Position>,
        deed: Deed,
        no_response: bool,
    },
    /// The deadline passed and a default was applied on your behalf.
    Late,
    /// A seat was handed to an automated stand-in.
    Conceded { seat: Position, name: String },
    /// Game over; `durak` is the seat left holding cards, if any.
    Over {
        durak: Option<Position>,
        game: u32,
    },
}

impl Event {
    /// Strip the card faces this viewer is not entitled to see.
    pub fn redact(&self, viewer: Position) -> Event {
        match self {
            Event::Deals { deals } => Event::Deals {
                deals: deals
                    .iter()
                    .map(|d| Deal {
                        card: d.card.filter(|_| d.seat == viewer),
                        ..*d
                    })
                    .collect(),
            },
            other => other.clone(),
        }
    }

    /// Whether the room expects an acknowledgment once this lands. Decisions
    /// are answered with an action instead; pure notifications are not
    /// answered at all.
    pub fn acked(&self) -> bool {
        match self {
            Event::Decision { .. } | Event::Late | Event::Conceded { .. } => false,
            Event::Resolved { no_response, .. } => !no_response,
            _ => true,
        }
    }
}

impl std::fmt::Display for Deed {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Deed::Attack { card, slot, .. } => write!(f, "ATTACK {} on {}", card, slot),
            Deed::Defense { card, slot, .. } => write!(f, "DEFENSE {} on {}", card, slot),
            Deed::Skip => write!(f, "SKIP"),
            Deed::Take => write!(f, "TAKE"),
            Deed::Took { cids } => write!(f, "TAKE {} cards", cids.len()),
            Deed::Discard { cids } => write!(f, "DISCARD {} cards", cids.len()),
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::Opponents { others } => write!(f, "{} opponents", others.len()),
            Event::Cards { views, .. } => write!(f, "{} cards", views.len()),
            Event::Deals { deals } => write!(f, "{} deals", deals.len()),
            Event::Openers { first, .. } => write!(f, "seat {} opens", first),
            Event::Decision { actions, .. } => write!(f, "your move: {} options", actions.len()),
            Event::Resolved { seat: Some(s), deed, .. } => write!(f, "seat {}: {}", s, deed),
            Event::Resolved { seat: None, deed, .. } => write!(f, "table: {}", deed),
            Event::Late => write!(f, "too late"),
            Event::Conceded { seat, name } => write!(f, "seat {} conceded to {}", seat, name),
            Event::Over { durak: Some(d), game } => write!(f, "game {}: seat {} is the durak", game, d),
            Event::Over { durak: None, game } => write!(f, "game {}: drawn", game),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Rank;

    fn deal(seat: Position) -> Deal {
        Deal {
            seat,
            cid: 5,
            card: Some(Card::from((Rank::Nine, Suit::Heart))),
        }
    }

    #[test]
    fn deals_redact_other_hands() {
        let event = Event::Deals {
            deals: vec![deal(0), deal(1)],
        };
        let Event::Deals { deals } = event.redact(1) else {
            panic!("redaction changed the variant");
        };
        assert!(deals[0].card.is_none());
        assert!(deals[1].card.is_some());
    }

    #[test]
    fn silent_resolutions_want_no_ack() {
        let loud = Event::Resolved {
            seat: Some(0),
            deed: Deed::Skip,
            no_response: false,
        };
        let quiet = Event::Resolved {
            seat: Some(0),
            deed: Deed::Skip,
            no_response: true,
        };
        assert!(loud.acked());
        assert!(!quiet.acked());
        assert!(!Event::Late.acked());
    }
}
