use station_engine::{EntityId, FocusProbe, LayerMask, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
struct SphereCollider {
    entity: EntityId,
    center: Vec3,
    radius: f32,
    layer: u8,
}

/// Line-of-sight probe over sphere colliders; returns the nearest hit.
#[derive(Debug, Default)]
pub(crate) struct SphereProbe {
    colliders: Vec<SphereCollider>,
}

impl SphereProbe {
    pub(crate) fn add(&mut self, entity: EntityId, center: Vec3, radius: f32, layer: u8) {
        self.colliders.push(SphereCollider {
            entity,
            center,
            radius,
            layer,
        });
    }

    pub(crate) fn remove(&mut self, entity: EntityId) {
        self.colliders.retain(|collider| collider.entity != entity);
    }
}

impl FocusProbe for SphereProbe {
    fn probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_range: f32,
        layer_mask: LayerMask,
    ) -> Option<EntityId> {
        let direction = direction.normalized();
        self.colliders
            .iter()
            .filter(|collider| layer_mask.includes_layer(collider.layer))
            .filter_map(|collider| {
                ray_sphere_distance(origin, direction, collider.center, collider.radius)
                    .filter(|distance| *distance <= max_range)
                    .map(|distance| (distance, collider.entity))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, entity)| entity)
    }
}

/// Distance along a unit ray to the first sphere surface; 0 when inside.
fn ray_sphere_distance(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(direction);
    let closest_sq = to_center.dot(to_center) - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    let near = along - half_chord;
    let far = along + half_chord;
    if far < 0.0 {
        None
    } else {
        Some(near.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_sphere_wins() {
        let mut probe = SphereProbe::default();
        probe.add(EntityId(1), Vec3::new(0.0, 0.0, 4.0), 0.5, 0);
        probe.add(EntityId(2), Vec3::new(0.0, 0.0, 2.0), 0.5, 0);

        let hit = probe.probe(Vec3::ZERO, Vec3::FORWARD, 10.0, LayerMask::ALL);
        assert_eq!(hit, Some(EntityId(2)));
    }

    #[test]
    fn range_and_mask_limit_hits() {
        let mut probe = SphereProbe::default();
        probe.add(EntityId(1), Vec3::new(0.0, 0.0, 8.0), 0.5, 0);
        probe.add(EntityId(2), Vec3::new(0.0, 0.0, 2.0), 0.5, 3);

        assert_eq!(
            probe.probe(Vec3::ZERO, Vec3::FORWARD, 5.0, LayerMask(1)),
            None
        );
        assert_eq!(
            probe.probe(Vec3::ZERO, Vec3::FORWARD, 10.0, LayerMask(1)),
            Some(EntityId(1))
        );
    }

    #[test]
    fn spheres_behind_or_beside_are_missed() {
        let mut probe = SphereProbe::default();
        probe.add(EntityId(1), Vec3::new(0.0, 0.0, -3.0), 0.5, 0);
        probe.add(EntityId(2), Vec3::new(2.0, 0.0, 3.0), 0.5, 0);

        assert_eq!(
            probe.probe(Vec3::ZERO, Vec3::FORWARD, 10.0, LayerMask::ALL),
            None
        );
    }
}
