//! Live enemy, tower and bullet collections owned by the world.

use tower_defence_core::{
    BulletId, BulletSnapshot, EnemyId, EnemyKind, EnemySnapshot, Vec2, WaveNumber, BULLET_SPEED,
};

use crate::towers::TowerRegistry;

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) path_index: usize,
    pub(crate) speed: f64,
    pub(crate) health: i32,
    pub(crate) max_health: i32,
    pub(crate) alive: bool,
}

impl Enemy {
    fn spawn(id: EnemyId, kind: EnemyKind, wave: WaveNumber, start: Vec2) -> Self {
        let profile = kind.profile(wave);
        Self {
            id,
            kind,
            position: start,
            path_index: 0,
            speed: profile.speed,
            health: profile.health,
            max_health: profile.health,
            alive: true,
        }
    }

    /// Applies damage and reports whether the hit was lethal.
    pub(crate) fn take_damage(&mut self, damage: u32) -> bool {
        let damage = i32::try_from(damage).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(damage);
        if self.health <= 0 {
            self.alive = false;
        }
        !self.alive
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            path_index: self.path_index,
            speed: self.speed,
            health: self.health,
            max_health: self.max_health,
            alive: self.alive,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Bullet {
    pub(crate) id: BulletId,
    pub(crate) position: Vec2,
    pub(crate) speed: f64,
    pub(crate) damage: u32,
    pub(crate) target: EnemyId,
}

impl Bullet {
    pub(crate) fn snapshot(&self) -> BulletSnapshot {
        BulletSnapshot {
            id: self.id,
            position: self.position,
            speed: self.speed,
            damage: self.damage,
            target: self.target,
        }
    }
}

/// Owns every live entity and allocates their identifiers.
///
/// Enemies and bullets are stored in allocation order, so iteration is FIFO
/// and lookups can binary search by identifier. Identifiers are never reused,
/// which keeps stale references from resolving to a different entity.
#[derive(Debug)]
pub(crate) struct EntityRegistry {
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    pub(crate) towers: TowerRegistry,
    next_enemy_id: EnemyId,
    next_bullet_id: BulletId,
}

impl EntityRegistry {
    pub(crate) fn new() -> Self {
        Self {
            enemies: Vec::new(),
            bullets: Vec::new(),
            towers: TowerRegistry::new(),
            next_enemy_id: EnemyId::new(0),
            next_bullet_id: BulletId::new(0),
        }
    }

    /// Drops every entity without rewinding identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.enemies.clear();
        self.bullets.clear();
        self.towers.clear();
    }

    pub(crate) fn spawn_enemy(&mut self, kind: EnemyKind, wave: WaveNumber, start: Vec2) -> &Enemy {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        self.enemies.push(Enemy::spawn(id, kind, wave, start));
        &self.enemies[self.enemies.len() - 1]
    }

    pub(crate) fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub(crate) fn enemy(&self, enemy: EnemyId) -> Option<&Enemy> {
        self.enemy_index(enemy).map(|index| &self.enemies[index])
    }

    pub(crate) fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.enemy_index(enemy).map(|index| &mut self.enemies[index])
    }

    /// Looks up an enemy that is present and still alive.
    pub(crate) fn live_enemy(&self, enemy: EnemyId) -> Option<&Enemy> {
        self.enemy(enemy).filter(|candidate| candidate.alive)
    }

    pub(crate) fn remove_enemy(&mut self, enemy: EnemyId) -> Option<Enemy> {
        self.enemy_index(enemy)
            .map(|index| self.enemies.remove(index))
    }

    /// Removes every enemy that was killed, preserving the order of the rest.
    pub(crate) fn reap_dead(&mut self) -> Vec<Enemy> {
        let (dead, living): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut self.enemies)
            .into_iter()
            .partition(|enemy| !enemy.alive);
        self.enemies = living;
        dead
    }

    pub(crate) fn spawn_bullet(&mut self, position: Vec2, damage: u32, target: EnemyId) -> BulletId {
        let id = self.next_bullet_id;
        self.next_bullet_id = BulletId::new(id.get().saturating_add(1));
        self.bullets.push(Bullet {
            id,
            position,
            speed: BULLET_SPEED,
            damage,
            target,
        });
        id
    }

    pub(crate) fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub(crate) fn bullet_mut(&mut self, bullet: BulletId) -> Option<&mut Bullet> {
        self.bullet_index(bullet)
            .map(|index| &mut self.bullets[index])
    }

    pub(crate) fn remove_bullet(&mut self, bullet: BulletId) -> Option<Bullet> {
        self.bullet_index(bullet)
            .map(|index| self.bullets.remove(index))
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&enemy, |candidate| candidate.id)
            .ok()
    }

    fn bullet_index(&self, bullet: BulletId) -> Option<usize> {
        self.bullets
            .binary_search_by_key(&bullet, |candidate| candidate.id)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lethal_damage_marks_enemy_dead_and_allows_negative_health() {
        let mut registry = EntityRegistry::new();
        let id = registry
            .spawn_enemy(EnemyKind::Normal, WaveNumber::new(1), Vec2::ZERO)
            .id;

        let enemy = registry.enemy_mut(id).expect("enemy");
        assert!(!enemy.take_damage(60));
        assert!(enemy.take_damage(60));
        assert_eq!(enemy.health, -20);
        assert!(registry.live_enemy(id).is_none());
        assert!(registry.enemy(id).is_some());
    }

    #[test]
    fn reap_removes_only_dead_enemies_in_order() {
        let mut registry = EntityRegistry::new();
        let ids: Vec<_> = (0..3)
            .map(|_| {
                registry
                    .spawn_enemy(EnemyKind::Normal, WaveNumber::new(1), Vec2::ZERO)
                    .id
            })
            .collect();
        let _ = registry.enemy_mut(ids[1]).expect("enemy").take_damage(500);

        let dead = registry.reap_dead();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].id, ids[1]);
        let remaining: Vec<_> = registry.enemies().iter().map(|enemy| enemy.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[test]
    fn identifiers_survive_clear() {
        let mut registry = EntityRegistry::new();
        let first = registry
            .spawn_enemy(EnemyKind::Fast, WaveNumber::new(1), Vec2::ZERO)
            .id;
        let bullet = registry.spawn_bullet(Vec2::ZERO, 20, first);
        registry.clear();

        let second = registry
            .spawn_enemy(EnemyKind::Fast, WaveNumber::new(1), Vec2::ZERO)
            .id;
        assert!(second > first);
        assert!(registry.enemy(first).is_none());
        assert!(registry.remove_bullet(bullet).is_none());
    }
}
