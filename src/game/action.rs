use crate::Cid;

/// A player decision published by the state machine.
///
/// The machine publishes the exact set it will accept; anything else sent
/// back is dropped. Attack and defense actions name the card by its dense id
/// and the field slot it lands on.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Action {
    /// Put a card from hand onto an open field slot.
    Attack { cid: Cid, slot: usize },
    /// Beat the attack card on `slot` with a card from hand.
    Defense { cid: Cid, slot: usize },
    /// Pass the attacking window to the other non-defending seat.
    Skip,
    /// Give up the defense and pick up the whole field.
    Take,
}

impl Action {
    /// True for the yielding actions a timeout default prefers.
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Skip | Action::Take)
    }
    /// The card this action plays, if any.
    pub fn cid(&self) -> Option<Cid> {
        match *self {
            Action::Attack { cid, .. } | Action::Defense { cid, .. } => Some(cid),
            _ => None,
        }
    }
}

impl TryFrom<&str> for Action {
    type Error = &'static str;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let card_and_slot = |parts: &[&str]| -> Option<(Cid, usize)> {
            let cid = parts.get(1).and_then(|n| n.parse().ok())?;
            let slot = parts.get(2).and_then(|n| n.parse().ok())?;
            Some((cid, slot))
        };
        match parts.first().map(|p| p.to_uppercase()).as_deref() {
            Some("SKIP") => Ok(Action::Skip),
            Some("TAKE") => Ok(Action::Take),
            Some("ATTACK") => card_and_slot(&parts)
                .map(|(cid, slot)| Action::Attack { cid, slot })
                .ok_or("invalid attack card or slot"),
            Some("DEFENSE") => card_and_slot(&parts)
                .map(|(cid, slot)| Action::Defense { cid, slot })
                .ok_or("invalid defense card or slot"),
            _ => Err("invalid action type"),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Attack { cid, slot } => write!(f, "ATTACK {} {}", cid, slot),
            Action::Defense { cid, slot } => write!(f, "DEFENSE {} {}", cid, slot),
            Action::Skip => write!(f, "SKIP"),
            Action::Take => write!(f, "TAKE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_str() {
        for action in [
            Action::Attack { cid: 12, slot: 3 },
            Action::Defense { cid: 0, slot: 0 },
            Action::Skip,
            Action::Take,
        ] {
            assert!(action == Action::try_from(action.to_string().as_str()).unwrap());
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(Action::try_from("fold").is_err());
        assert!(Action::try_from("attack").is_err());
        assert!(Action::try_from("attack twelve 0").is_err());
        assert!(Action::try_from("").is_err());
    }

    #[test]
    fn case_insensitive() {
        assert!(Action::try_from("take").unwrap() == Action::Take);
        assert!(Action::try_from("Skip").unwrap() == Action::Skip);
    }
}
