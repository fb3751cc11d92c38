//! Collectible items placed by the level.

use platformer_core::{ItemKind, PickupId, PickupSnapshot, Rect};

#[derive(Clone, Debug)]
pub(crate) struct Pickup {
    pub(crate) id: PickupId,
    pub(crate) kind: ItemKind,
    pub(crate) body: Rect,
}

impl Pickup {
    pub(crate) fn snapshot(&self) -> PickupSnapshot {
        PickupSnapshot {
            id: self.id,
            kind: self.kind,
            body: self.body,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Pickups {
    items: Vec<Pickup>,
}

impl Pickups {
    pub(crate) fn place(&mut self, kind: ItemKind, body: Rect) {
        let id = PickupId::new(u32::try_from(self.items.len()).unwrap_or(u32::MAX));
        self.items.push(Pickup { id, kind, body });
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Pickup> {
        self.items.iter()
    }

    /// Removes and returns every pickup overlapping `body`, in placement order.
    pub(crate) fn take_overlapping(&mut self, body: &Rect) -> Vec<Pickup> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.items.len());
        for pickup in self.items.drain(..) {
            if pickup.body.overlaps(body) {
                taken.push(pickup);
            } else {
                kept.push(pickup);
            }
        }
        self.items = kept;
        taken
    }

    pub(crate) fn shift(&mut self, dx: f32) {
        for pickup in &mut self.items {
            pickup.body = pickup.body.translated(dx, 0.0);
        }
    }
}
