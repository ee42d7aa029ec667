use crate::Cid;
use crate::FIELD_SIZE;

/// One attack/defense pair in active play. A defense may land only on an
/// occupied attack.
#[derive(Debug, Clone, Copy, Default)]
pub struct Slot {
    attack: Option<Cid>,
    defense: Option<Cid>,
}

impl Slot {
    pub fn attack(&self) -> Option<Cid> {
        self.attack
    }
    pub fn defense(&self) -> Option<Cid> {
        self.defense
    }
}

/// Fixed row of field slots.
///
/// `open` bounds how many attacks may land in one turn; it starts one below
/// the physical slot count and widens by one after the first discard of the
/// game.
#[derive(Debug, Clone)]
pub struct Field {
    slots: Vec<Slot>,
    open: usize,
    used: usize,
}

impl Field {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::default(); FIELD_SIZE],
            open: FIELD_SIZE - 1,
            used: 0,
        }
    }
    /// The slot the next attack lands on.
    pub fn next_slot(&self) -> usize {
        self.used
    }
    /// No further attacks fit; the defender must resolve.
    pub fn is_full(&self) -> bool {
        self.used >= self.open
    }
    pub fn attack(&mut self, slot: usize, cid: Cid) {
        debug_assert!(self.slots[slot].attack.is_none(), "slot already attacked");
        self.slots[slot].attack = Some(cid);
        self.used += 1;
    }
    pub fn defend(&mut self, slot: usize, cid: Cid) {
        assert!(self.slots[slot].attack.is_some(), "defense on an empty slot");
        self.slots[slot].defense = Some(cid);
    }
    /// First attack card still waiting for an answer.
    pub fn unanswered(&self) -> Option<(usize, Cid)> {
        self.slots
            .iter()
            .enumerate()
            .find(|(_, s)| s.attack.is_some() && s.defense.is_none())
            .map(|(i, s)| (i, s.attack.expect("just matched")))
    }
    /// Every card on the field, slot by slot, attack before defense.
    pub fn cids(&self) -> Vec<Cid> {
        self.slots
            .iter()
            .flat_map(|s| [s.attack, s.defense])
            .flatten()
            .collect()
    }
    /// Clear every slot and reset usage; returns the swept cards.
    pub fn sweep(&mut self) -> Vec<Cid> {
        let cids = self.cids();
        self.slots.fill(Slot::default());
        self.used = 0;
        cids
    }
    /// Widen the field after the first discard, up to the physical slot count.
    pub fn expand(&mut self) {
        if self.open < self.slots.len() {
            self.open += 1;
            log::info!("first discard, field expanded to {}", self.open);
        }
    }
    pub fn open(&self) -> usize {
        self.open
    }
    pub fn used(&self) -> usize {
        self.used
    }
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_front_to_back() {
        let mut field = Field::new();
        assert!(field.next_slot() == 0);
        field.attack(0, 7);
        assert!(field.next_slot() == 1);
        assert!(field.unanswered() == Some((0, 7)));
        field.defend(0, 9);
        assert!(field.unanswered().is_none());
    }

    #[test]
    fn full_one_below_capacity_before_any_discard() {
        let mut field = Field::new();
        for slot in 0..FIELD_SIZE - 1 {
            assert!(!field.is_full());
            field.attack(slot, slot);
        }
        assert!(field.is_full());
    }

    #[test]
    fn expands_once() {
        let mut field = Field::new();
        field.expand();
        assert!(field.open() == FIELD_SIZE);
        field.expand();
        assert!(field.open() == FIELD_SIZE);
    }

    #[test]
    fn sweep_returns_everything_in_slot_order() {
        let mut field = Field::new();
        field.attack(0, 3);
        field.defend(0, 4);
        field.attack(1, 8);
        assert!(field.sweep() == vec![3, 4, 8]);
        assert!(field.used() == 0);
        assert!(field.cids().is_empty());
    }
}
