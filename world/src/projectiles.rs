//! Projectile registry with deterministic identifier allocation.

use platformer_core::{EntityId, Facing, ProjectileId, ProjectileSnapshot, Rect};

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) owner: EntityId,
    pub(crate) body: Rect,
    pub(crate) facing: Facing,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            owner: self.owner,
            body: self.body,
            facing: self.facing,
        }
    }
}

/// Live projectiles kept in spawn order.
#[derive(Clone, Debug, Default)]
pub(crate) struct ProjectileManager {
    live: Vec<Projectile>,
    next_id: u32,
}

impl ProjectileManager {
    pub(crate) fn spawn(&mut self, owner: EntityId, body: Rect, facing: Facing) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.live.push(Projectile {
            id,
            owner,
            body,
            facing,
        });
        id
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.live.iter()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Projectile> {
        self.live.get_mut(index)
    }

    /// Drops the projectile at `index`, preserving the order of the rest.
    pub(crate) fn remove(&mut self, index: usize) -> Option<Projectile> {
        (index < self.live.len()).then(|| self.live.remove(index))
    }

    pub(crate) fn shift(&mut self, dx: f32) {
        for projectile in &mut self.live {
            projectile.body = projectile.body.translated(dx, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_never_reused() {
        let mut manager = ProjectileManager::default();
        let body = Rect::new(0.0, 0.0, 4.0, 2.0);

        let first = manager.spawn(EntityId::new(0), body, Facing::Right);
        assert!(manager.remove(0).is_some());
        let second = manager.spawn(EntityId::new(0), body, Facing::Left);

        assert_eq!(first, ProjectileId::new(0));
        assert_eq!(second, ProjectileId::new(1));
        assert_eq!(manager.iter().count(), 1);
    }

    #[test]
    fn removal_keeps_spawn_order() {
        let mut manager = ProjectileManager::default();
        let body = Rect::new(0.0, 0.0, 4.0, 2.0);
        for owner in 0..3 {
            let _ = manager.spawn(EntityId::new(owner), body, Facing::Right);
        }

        let removed = manager.remove(1).map(|projectile| projectile.id);
        assert_eq!(removed, Some(ProjectileId::new(1)));
        assert!(manager.remove(5).is_none());

        let remaining: Vec<u32> = manager
            .iter()
            .map(|projectile| projectile.id.get())
            .collect();
        assert_eq!(remaining, vec![0, 2]);
    }
}
