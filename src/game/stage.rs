/// Phases of one turn.
///
/// The machine keeps the current stage and the one before it; the pair is
/// what disambiguates transitions, since `Defense` is re-entered from every
/// attacking phase. The canonical walk:
///
/// ```text
/// InitialAttack -> Defense -> RepeatingAttack -> Defense -> ...
/// Defense -> Support -> Defense -> Attack -> Defense -> ...
/// Defense -> End                        (nothing left unanswered)
/// Defense -> Followup -> Defense -> ... (defender is taking; catch-up cards)
/// End -> EndDeal -> Ended | End -> Ended
/// ```
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Stage {
    /// The turn-opening attack; skipping is not offered.
    InitialAttack,
    /// The attacker may add another card after each answered attack.
    RepeatingAttack,
    /// The ally's window to add a card.
    Support,
    /// The attacker's window after the ally acted.
    Attack,
    /// The defender is taking; non-defenders may still pile on.
    Followup,
    /// The defender owes an answer for the first open attack.
    Defense,
    /// Turn resolution: sweep the field to the pile or the taker.
    End,
    /// Discard done, hands still to be topped up.
    EndDeal,
    /// Turn complete; the next advance rotates roles.
    Ended,
}

impl Stage {
    /// Stage that resumes once the defender answers, keyed by the attacking
    /// stage that preceded the current defense window.
    pub fn after_defense(last: Option<Stage>) -> Stage {
        match last {
            Some(Stage::InitialAttack) | Some(Stage::RepeatingAttack) => Stage::RepeatingAttack,
            Some(Stage::Support) => Stage::Attack,
            Some(Stage::Attack) => Stage::Support,
            other => {
                log::error!("invalid stage before a defense window: {:?}", other);
                Stage::RepeatingAttack
            }
        }
    }

    /// Transition for a SKIP from a non-defending seat.
    ///
    /// Returns the stage override (`None` leaves the defense window in place,
    /// which hands the field to the defender) and the updated count of
    /// consecutive skips. Without an ally a skip always resolves the field.
    pub fn after_skip(last: Option<Stage>, skips: usize, ally: bool) -> (Option<Stage>, usize) {
        if !ally {
            return (None, skips);
        }
        match last {
            // only the first skip re-opens the catch-up window for the other seat
            Some(Stage::Followup) if skips == 0 => (Some(Stage::Followup), 1),
            Some(Stage::Followup) => (None, skips),
            // the attacker declined to repeat; the ally gets the field
            Some(Stage::RepeatingAttack) => (Some(Stage::Support), skips + 2),
            Some(Stage::Support) if skips + 1 < 2 => (Some(Stage::Attack), skips + 1),
            Some(Stage::Attack) if skips + 1 < 2 => (Some(Stage::Support), skips + 1),
            Some(Stage::Support) | Some(Stage::Attack) => (None, skips + 1),
            other => {
                log::error!("invalid stage before a skip: {:?}", other);
                (None, skips + 1)
            }
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Stage::InitialAttack => write!(f, "INITIAL_ATTACK"),
            Stage::RepeatingAttack => write!(f, "REPEATING_ATTACK"),
            Stage::Support => write!(f, "SUPPORT"),
            Stage::Attack => write!(f, "ATTACK"),
            Stage::Followup => write!(f, "FOLLOWUP"),
            Stage::Defense => write!(f, "DEFENSE"),
            Stage::End => write!(f, "END"),
            Stage::EndDeal => write!(f, "END_DEAL"),
            Stage::Ended => write!(f, "ENDED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defense_resumption() {
        assert!(Stage::after_defense(Some(Stage::InitialAttack)) == Stage::RepeatingAttack);
        assert!(Stage::after_defense(Some(Stage::RepeatingAttack)) == Stage::RepeatingAttack);
        assert!(Stage::after_defense(Some(Stage::Support)) == Stage::Attack);
        assert!(Stage::after_defense(Some(Stage::Attack)) == Stage::Support);
    }

    #[test]
    fn skip_without_ally_resolves() {
        let (next, skips) = Stage::after_skip(Some(Stage::RepeatingAttack), 0, false);
        assert!(next.is_none());
        assert!(skips == 0);
    }

    #[test]
    fn skip_hands_field_to_ally() {
        let (next, skips) = Stage::after_skip(Some(Stage::RepeatingAttack), 0, true);
        assert!(next == Some(Stage::Support));
        assert!(skips == 2);
    }

    #[test]
    fn alternation_stops_after_two_skips() {
        // ally skipped once: back to the attacker
        let (next, skips) = Stage::after_skip(Some(Stage::Support), 0, true);
        assert!(next == Some(Stage::Attack));
        assert!(skips == 1);
        // attacker skipped too: defender resolves
        let (next, skips) = Stage::after_skip(Some(Stage::Attack), skips, true);
        assert!(next.is_none());
        assert!(skips == 2);
    }

    #[test]
    fn followup_passes_once() {
        let (next, skips) = Stage::after_skip(Some(Stage::Followup), 0, true);
        assert!(next == Some(Stage::Followup));
        assert!(skips == 1);
        let (next, _) = Stage::after_skip(Some(Stage::Followup), skips, true);
        assert!(next.is_none());
    }
}
