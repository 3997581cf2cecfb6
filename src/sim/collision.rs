//! Hit detection between cannonballs, hazards and the player
//!
//! Runs once per frame after every object has moved. Boxes are axis-aligned;
//! a hazard takes at most one hit per frame and a cannonball is spent on the
//! first hazard it touches.

use super::object::{GameObject, ObjectId};

/// A contact found this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A cannonball struck a hazard, both are spent
    Shot { projectile: ObjectId, hazard: ObjectId },
    /// A hazard reached the player
    Rammed { hazard: ObjectId, damage: i32 },
}

/// Find this frame's contacts, ignoring ids in `skip`
pub fn find_hits<'a>(
    objects: impl Iterator<Item = (ObjectId, &'a GameObject)> + Clone,
    skip: &[ObjectId],
) -> Vec<Hit> {
    let live = objects.filter(|(id, _)| !skip.contains(id));
    let player = live
        .clone()
        .find_map(|(_, o)| o.as_player().map(|p| p.bounds()));

    let mut spent: Vec<ObjectId> = Vec::new();
    let mut hits = Vec::new();

    for (hazard_id, object) in live.clone() {
        let GameObject::Hazard(hazard) = object else {
            continue;
        };
        let bounds = hazard.bounds();

        let shooter = live.clone().find(|(id, o)| {
            matches!(o, GameObject::Projectile(p) if p.bounds().overlaps(&bounds))
                && !spent.contains(id)
        });
        if let Some((projectile, _)) = shooter {
            spent.push(projectile);
            hits.push(Hit::Shot {
                projectile,
                hazard: hazard_id,
            });
            continue;
        }

        if player.is_some_and(|p| p.overlaps(&bounds)) {
            hits.push(Hit::Rammed {
                hazard: hazard_id,
                damage: hazard.damage(),
            });
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetLoader, MemoryAssets, Pixmap};
    use crate::settings::Settings;
    use crate::sim::camera::Camera;
    use crate::sim::player::Player;
    use crate::sim::projectile::{Hazard, HazardKind, Projectile};
    use glam::Vec2;

    fn world() -> (MemoryAssets, Settings) {
        let assets = MemoryAssets::new().with("t.png", Pixmap::filled(10, 10, [0; 4]));
        (assets, Settings::new())
    }

    fn hazard(assets: &mut MemoryAssets, settings: &Settings, at: Vec2, kind: HazardKind) -> GameObject {
        let texture = assets.load("t.png").unwrap();
        GameObject::Hazard(Hazard::new(
            at,
            3,
            kind,
            &settings.hazard,
            Camera::new(1350.0, 800.0),
            texture,
        ))
    }

    fn ball(assets: &mut MemoryAssets, settings: &Settings, at: Vec2) -> GameObject {
        let texture = assets.load("t.png").unwrap();
        GameObject::Projectile(Projectile::new(at, Vec2::ZERO, &settings.projectile, texture))
    }

    fn player(assets: &mut MemoryAssets, settings: &Settings, at: Vec2) -> GameObject {
        let texture = assets.load("t.png").unwrap();
        let mut p = Player::new(&settings.player, texture).unwrap();
        p.set_position(at);
        GameObject::Player(p)
    }

    fn ids(objects: &[GameObject]) -> impl Iterator<Item = (ObjectId, &GameObject)> + Clone {
        objects.iter().enumerate().map(|(i, o)| (ObjectId(i as u32), o))
    }

    #[test]
    fn test_shot_spends_ball_once() {
        let (mut assets, settings) = world();
        // Two overlapping hazards (30x30), one ball inside both
        let objects = vec![
            hazard(&mut assets, &settings, Vec2::new(100.0, 100.0), HazardKind::Apple),
            hazard(&mut assets, &settings, Vec2::new(110.0, 100.0), HazardKind::Melon),
            ball(&mut assets, &settings, Vec2::new(120.0, 110.0)),
        ];
        let hits = find_hits(ids(&objects), &[]);
        assert_eq!(
            hits,
            vec![Hit::Shot {
                projectile: ObjectId(2),
                hazard: ObjectId(0)
            }]
        );
    }

    #[test]
    fn test_player_rammed_by_bomb() {
        let (mut assets, settings) = world();
        let objects = vec![
            player(&mut assets, &settings, Vec2::new(100.0, 100.0)),
            hazard(&mut assets, &settings, Vec2::new(120.0, 120.0), HazardKind::Bomb),
            hazard(&mut assets, &settings, Vec2::new(500.0, 500.0), HazardKind::Apple),
        ];
        let hits = find_hits(ids(&objects), &[]);
        assert_eq!(
            hits,
            vec![Hit::Rammed {
                hazard: ObjectId(1),
                damage: settings.hazard.bomb_damage
            }]
        );
    }

    #[test]
    fn test_skipped_objects_ignored() {
        let (mut assets, settings) = world();
        let objects = vec![
            hazard(&mut assets, &settings, Vec2::new(100.0, 100.0), HazardKind::Apple),
            ball(&mut assets, &settings, Vec2::new(110.0, 110.0)),
        ];
        assert!(find_hits(ids(&objects), &[ObjectId(1)]).is_empty());
    }
}
