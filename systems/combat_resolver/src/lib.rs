#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that advances bullets toward their targets.
//!
//! Bullets pursue the current position of their target without leading it.
//! A bullet within one tick of travel resolves as a hit; a bullet whose target
//! died or disappeared dissipates. Commands are emitted in bullet spawn order
//! and the world re-checks target liveness when it applies each hit, so a
//! second bullet aimed at an enemy killed earlier in the same tick whiffs.

use tower_defence_core::{BulletSnapshot, BulletView, Command, EnemyView, Event};

/// Combat resolver that queues bullet motion and hit commands.
#[derive(Debug, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes world events and immutable views to emit bullet commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        bullets: &BulletView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if bullets.is_empty() {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        out.reserve(bullets.len());
        for bullet in bullets.iter() {
            out.push(resolve(bullet, enemies));
        }
    }
}

fn resolve(bullet: &BulletSnapshot, enemies: &EnemyView) -> Command {
    let Some(target) = enemies.get(bullet.target).filter(|enemy| enemy.alive) else {
        return Command::DissipateBullet { bullet: bullet.id };
    };

    let offset = target.position - bullet.position;
    let distance = offset.length();
    if distance <= bullet.speed {
        return Command::ResolveBulletHit { bullet: bullet.id };
    }

    Command::MoveBullet {
        bullet: bullet.id,
        position: bullet.position + offset / distance * bullet.speed,
    }
}
