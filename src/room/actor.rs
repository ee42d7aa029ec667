use super::event::Event;
use super::player::Player;
use super::room::Response;
use super::room::Signal;
use crate::Position;
use tokio::sync::mpsc::*;

/// Wrapper that runs a Player in its own async task.
/// Handles message passing between the room and the player implementation.
///
/// - the room unicasts a Decision when it is this seat's turn
/// - the actor calls Player::decide and sends the move back to the room
/// - the room broadcasts every other event; the actor forwards them to
///   Player::notify and acknowledges the ones that pace the match
pub struct Actor {
    seat: Position,
    player: Box<dyn Player>,
    getter: UnboundedReceiver<Event>,
    sender: UnboundedSender<Signal>,
}

impl Actor {
    pub fn spawn(
        seat: Position,
        player: Box<dyn Player>,
        sender: UnboundedSender<Signal>,
    ) -> UnboundedSender<Event> {
        let (tx, rx) = unbounded_channel();
        let actor = Self {
            seat,
            player,
            sender,
            getter: rx,
        };
        tokio::spawn(actor.run());
        tx
    }
    async fn run(mut self) {
        loop {
            match self.getter.recv().await {
                Some(ref event @ Event::Decision {
                    ref actions,
                    ref roles,
                    ..
                }) => {
                    log::debug!("[actor {}] received decision", self.seat);
                    self.player.notify(event).await;
                    let action = self.player.decide(actions, roles).await;
                    log::debug!("[actor {}] decided {}", self.seat, action);
                    let _ = self
                        .sender
                        .send(Signal::Reply(self.seat, Response::Move(action)));
                    if !self.player.connected() {
                        log::info!("[actor {}] player disconnected", self.seat);
                        let _ = self.sender.send(Signal::Dropped(self.seat));
                    }
                }
                Some(ref event) => {
                    log::trace!("[actor {}] received {}", self.seat, event);
                    self.player.notify(event).await;
                    if event.acked() {
                        let _ = self.sender.send(Signal::Reply(self.seat, Response::Ack));
                    }
                }
                None => break,
            }
        }
    }
}
