use crate::game::Action;
use crate::game::Roles;
use crate::room::event::Event;
use crate::room::player::Player;
use rand::seq::IndexedRandom;

/// Automated stand-in, also the replacement seated on a concede.
/// Plays a uniformly random card; yields (skip or take) only when nothing
/// else is on offer.
pub struct Synth;

#[async_trait::async_trait]
impl Player for Synth {
    async fn decide(&mut self, actions: &[Action], _: &Roles) -> Action {
        let ref mut rng = rand::rng();
        match actions.split_last() {
            Some((last, rest)) if last.is_pass() && !rest.is_empty() => *rest
                .choose(rng)
                .expect("non empty prefix conditional on the match"),
            _ => *actions
                .choose(rng)
                .expect("non empty legal actions conditional on being asked to move"),
        }
    }

    async fn notify(&mut self, _: &Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_only_as_a_last_resort() {
        let mut synth = Synth;
        let roles = Roles {
            attacker: 0,
            defender: 1,
            ally: None,
        };
        let actions = vec![Action::Attack { cid: 4, slot: 0 }, Action::Skip];
        for _ in 0..16 {
            assert!(synth.decide(&actions, &roles).await == actions[0]);
        }
        assert!(synth.decide(&[Action::Take], &roles).await == Action::Take);
    }
}
