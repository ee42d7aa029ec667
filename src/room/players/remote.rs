use crate::game::Action;
use crate::game::Roles;
use crate::room::event::Event;
use crate::room::player::Player;
use crate::room::protocol::Protocol;
use tokio::sync::mpsc::*;

/// A seat driven by an external transport.
///
/// Events are encoded to wire messages and pushed onto the outbound sink;
/// decisions are read from the inbound stream and re-validated against the
/// published set before they leave this player. The transport itself (a
/// WebSocket bridge, a test harness) lives outside the crate; both ends are
/// plain string channels.
pub struct Remote {
    outbound: UnboundedSender<String>,
    inbound: UnboundedReceiver<String>,
}

impl Remote {
    /// Returns the player plus the transport-side endpoints: a stream of
    /// outgoing wire messages and a sink for incoming action strings.
    pub fn new() -> (Self, UnboundedReceiver<String>, UnboundedSender<String>) {
        let (out_tx, out_rx) = unbounded_channel();
        let (in_tx, in_rx) = unbounded_channel();
        (
            Self {
                outbound: out_tx,
                inbound: in_rx,
            },
            out_rx,
            in_tx,
        )
    }
}

#[async_trait::async_trait]
impl Player for Remote {
    async fn decide(&mut self, actions: &[Action], _: &Roles) -> Action {
        loop {
            match self.inbound.recv().await {
                None => {
                    log::info!("remote transport closed, yielding");
                    return actions
                        .iter()
                        .copied()
                        .find(Action::is_pass)
                        .or_else(|| actions.first().copied())
                        .expect("non empty legal actions conditional on being asked to move");
                }
                Some(line) => {
                    match Protocol::decode(line.trim())
                        .and_then(|action| Protocol::validate(action, actions))
                    {
                        Ok(action) => return action,
                        Err(e) => log::warn!("dropped client action: {}", e),
                    }
                }
            }
        }
    }

    async fn notify(&mut self, event: &Event) {
        let _ = self.outbound.send(Protocol::encode(event).to_json());
    }

    fn connected(&self) -> bool {
        !self.outbound.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_lines_are_dropped_until_a_legal_action() {
        let (mut remote, _out, tx) = Remote::new();
        let roles = Roles {
            attacker: 0,
            defender: 1,
            ally: None,
        };
        let actions = vec![Action::Attack { cid: 2, slot: 0 }];
        tx.send(String::from("gibberish")).unwrap();
        tx.send(String::from("take")).unwrap(); // legal syntax, not published
        tx.send(String::from("attack 2 0")).unwrap();
        assert!(remote.decide(&actions, &roles).await == actions[0]);
    }

    #[tokio::test]
    async fn closed_transport_yields() {
        let (mut remote, out, tx) = Remote::new();
        drop(out);
        drop(tx);
        assert!(!remote.connected());
        let roles = Roles {
            attacker: 0,
            defender: 1,
            ally: None,
        };
        let actions = vec![Action::Defense { cid: 1, slot: 0 }, Action::Take];
        assert!(remote.decide(&actions, &roles).await == Action::Take);
    }
}
