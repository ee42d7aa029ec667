use crate::Position;

/// The three turn roles, recomputed from the active rotation every turn. The
/// ally exists only while more than two seats remain active.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Roles {
    pub attacker: Position,
    pub defender: Position,
    pub ally: Option<Position>,
}

impl Roles {
    /// Roles for a turn opened by `attacker`, reading the defender and ally
    /// off the active rotation in seating order.
    pub fn seated(active: &[Position], attacker: Position) -> Self {
        let i = active
            .iter()
            .position(|&p| p == attacker)
            .expect("the attacker is an active seat");
        let defender = active[(i + 1) % active.len()];
        let ally = (active.len() > 2).then(|| active[(i + 2) % active.len()]);
        Self {
            attacker,
            defender,
            ally,
        }
    }
}

impl std::fmt::Display for Roles {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.ally {
            Some(ally) => write!(
                f,
                "attacker {} defender {} ally {}",
                self.attacker, self.defender, ally
            ),
            None => write!(f, "attacker {} defender {}", self.attacker, self.defender),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heads_up_has_no_ally() {
        let roles = Roles::seated(&[0, 1], 1);
        assert!(roles.attacker == 1);
        assert!(roles.defender == 0);
        assert!(roles.ally.is_none());
    }

    #[test]
    fn three_seats_wrap() {
        let roles = Roles::seated(&[0, 1, 2], 2);
        assert!(roles.defender == 0);
        assert!(roles.ally == Some(1));
    }

    #[test]
    fn shifted_rotation() {
        // seat 1 already eliminated
        let roles = Roles::seated(&[0, 2, 3], 2);
        assert!(roles.defender == 3);
        assert!(roles.ally == Some(0));
    }
}
