use super::event::Deed;
use super::event::Event;
use crate::game::Action;
use crate::Cid;
use crate::Position;
use serde::Serialize;

/// Errors that can occur decoding or checking a client action.
#[derive(Debug, Clone)]
pub enum ProtocolError {
    InvalidAction(String),
    IllegalAction(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAction(s) => write!(f, "invalid action: {}", s),
            Self::IllegalAction(s) => write!(f, "illegal action: {}", s),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// A card on the wire: the id always, the face only when the recipient may
/// see it.
#[derive(Clone, Debug, Serialize)]
pub struct WireCard {
    pub cid: Cid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,
}

/// A dealt card on the wire.
#[derive(Clone, Debug, Serialize)]
pub struct WireDeal {
    pub seat: Position,
    pub cid: Cid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face: Option<String>,
}

/// A seat's lowest trump revealed before the first turn.
#[derive(Clone, Debug, Serialize)]
pub struct WireReveal {
    pub seat: Position,
    pub face: String,
}

/// Messages sent from the match to a client transport.
/// Events are already redacted per seat by the time they are encoded, so a
/// message can be forwarded to its recipient as-is.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Who else is at the table.
    Opponents { others: Vec<(Position, String)> },
    /// Deck composition or a full-state resend.
    Cards {
        cards: Vec<WireCard>,
        #[serde(skip_serializing_if = "Option::is_none")]
        trump: Option<String>,
    },
    /// Newly dealt cards.
    Deals { deals: Vec<WireDeal> },
    /// Lowest trumps revealed; `first` opens the game.
    Openers {
        reveals: Vec<WireReveal>,
        first: Position,
    },
    /// It's your turn: the legal action set and the response window.
    Decision {
        actions: Vec<String>,
        deadline_secs: u64,
        attacker: Position,
        defender: Position,
        #[serde(skip_serializing_if = "Option::is_none")]
        ally: Option<Position>,
    },
    /// A resolved action, with the played face or the moved card ids.
    Resolved {
        #[serde(skip_serializing_if = "Option::is_none")]
        seat: Option<Position>,
        action: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        face: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        cids: Vec<Cid>,
        no_response: bool,
    },
    /// The deadline passed and a default was applied for you.
    Late,
    /// A seat was handed to an automated stand-in.
    Conceded { seat: Position, name: String },
    /// Game over.
    Over {
        #[serde(skip_serializing_if = "Option::is_none")]
        durak: Option<Position>,
        game: u32,
    },
}

impl ServerMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}

/// The protocol layer between internal events and the wire format.
pub struct Protocol;

impl Protocol {
    /// Converts an internal (already redacted) event to a wire message.
    pub fn encode(event: &Event) -> ServerMessage {
        match event {
            Event::Opponents { others } => ServerMessage::Opponents {
                others: others.iter().map(|p| (p.seat, p.name.clone())).collect(),
            },
            Event::Cards { views, trump } => ServerMessage::Cards {
                cards: views
                    .iter()
                    .map(|v| WireCard {
                        cid: v.cid,
                        face: v.card.map(|c| c.to_string()),
                    })
                    .collect(),
                trump: trump.map(|s| s.to_string()),
            },
            Event::Deals { deals } => ServerMessage::Deals {
                deals: deals
                    .iter()
                    .map(|d| WireDeal {
                        seat: d.seat,
                        cid: d.cid,
                        face: d.card.map(|c| c.to_string()),
                    })
                    .collect(),
            },
            Event::Openers { reveals, first } => ServerMessage::Openers {
                reveals: reveals
                    .iter()
                    .map(|&(seat, card)| WireReveal {
                        seat,
                        face: card.to_string(),
                    })
                    .collect(),
                first: *first,
            },
            Event::Decision {
                actions,
                deadline,
                roles,
            } => ServerMessage::Decision {
                actions: actions.iter().map(|a| a.to_string()).collect(),
                deadline_secs: deadline.as_secs(),
                attacker: roles.attacker,
                defender: roles.defender,
                ally: roles.ally,
            },
            Event::Resolved {
                seat,
                deed,
                no_response,
            } => {
                let (action, face, cids) = match deed {
                    Deed::Attack { cid, slot, card } => (
                        Action::Attack {
                            cid: *cid,
                            slot: *slot,
                        }
                        .to_string(),
                        Some(card.to_string()),
                        Vec::new(),
                    ),
                    Deed::Defense { cid, slot, card } => (
                        Action::Defense {
                            cid: *cid,
                            slot: *slot,
                        }
                        .to_string(),
                        Some(card.to_string()),
                        Vec::new(),
                    ),
                    Deed::Skip => (Action::Skip.to_string(), None, Vec::new()),
                    Deed::Take => (Action::Take.to_string(), None, Vec::new()),
                    Deed::Took { cids } => (Action::Take.to_string(), None, cids.clone()),
                    Deed::Discard { cids } => (String::from("DISCARD"), None, cids.clone()),
                };
                ServerMessage::Resolved {
                    seat: *seat,
                    action,
                    face,
                    cids,
                    no_response: *no_response,
                }
            }
            Event::Late => ServerMessage::Late,
            Event::Conceded { seat, name } => ServerMessage::Conceded {
                seat: *seat,
                name: name.clone(),
            },
            Event::Over { durak, game } => ServerMessage::Over {
                durak: *durak,
                game: *game,
            },
        }
    }

    /// Parses a client message string into an Action.
    pub fn decode(s: &str) -> Result<Action, ProtocolError> {
        Action::try_from(s).map_err(|_| ProtocolError::InvalidAction(s.to_string()))
    }

    /// Validates an action against the published set.
    pub fn validate(action: Action, legal: &[Action]) -> Result<Action, ProtocolError> {
        legal
            .contains(&action)
            .then_some(action)
            .ok_or_else(|| ProtocolError::IllegalAction(action.to_string()))
    }
}
