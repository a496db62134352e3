//! Registry, world and system-matching integration tests

use std::cell::RefCell;
use std::rc::Rc;

use skirmish::ai::AiComponent;
use skirmish::core::types::{EntityId, Vec2};
use skirmish::ecs::*;

/// Counts how many entities it was handed each tick
struct Counter {
    required: ComponentSet,
    ticks: Rc<RefCell<Vec<usize>>>,
}

impl System for Counter {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn required_components(&self) -> ComponentSet {
        self.required
    }

    fn update(&mut self, entities: &[EntityId], _world: &mut World, _dt: f32) {
        self.ticks.borrow_mut().push(entities.len());
    }
}

/// Shoves every matched transform one unit to the right
struct Drift;

impl System for Drift {
    fn name(&self) -> &'static str {
        "drift"
    }

    fn required_components(&self) -> ComponentSet {
        ComponentSet::new().with::<TransformComponent>()
    }

    fn update(&mut self, entities: &[EntityId], world: &mut World, _dt: f32) {
        for id in entities {
            if let Some(t) = world.get_mut::<TransformComponent>(*id) {
                t.position.x += 1.0;
            }
        }
    }
}

fn component_of(kind: ComponentKind) -> Component {
    match kind {
        ComponentKind::Transform => TransformComponent::default().into(),
        ComponentKind::Physics => PhysicsComponent::default().into(),
        ComponentKind::Health => HealthComponent::default().into(),
        ComponentKind::Collider => ColliderComponent::default().into(),
        ComponentKind::Movement => MovementComponent::default().into(),
        ComponentKind::Combat => CombatComponent::default().into(),
        ComponentKind::ResourceCollector => ResourceCollectorComponent::new("Gold", 1.0).into(),
        ComponentKind::ResourceContainer => ResourceContainerComponent::default().into(),
        ComponentKind::Faction => FactionComponent::new(0).into(),
        ComponentKind::Ai => AiComponent::default().into(),
    }
}

#[test]
fn test_entity_ids_are_never_reused() {
    let mut registry = EntityRegistry::new();
    let a = registry.create_entity();
    let b = registry.create_entity();
    registry.destroy_entity(a);
    registry.cleanup();
    let c = registry.create_entity();

    assert_eq!(a, EntityId(1));
    assert_eq!(b, EntityId(2));
    assert_eq!(c, EntityId(3));
    assert_eq!(registry.entities(), vec![b, c]);
}

#[test]
fn test_destroy_is_deferred_until_cleanup() {
    let mut registry = EntityRegistry::new();
    let ticks = Rc::new(RefCell::new(Vec::new()));
    registry.register_system(Counter {
        required: ComponentSet::EMPTY,
        ticks: ticks.clone(),
    });

    let a = registry.create_entity();
    let _b = registry.create_entity();
    registry.destroy_entity(a);

    // Still listed until the sweep
    registry.update(0.1);
    assert!(registry.get_entity(a).is_some_and(|e| e.is_destroyed()));

    assert_eq!(registry.cleanup(), vec![a]);
    registry.update(0.1);
    assert_eq!(*ticks.borrow(), vec![2, 1]);
}

#[test]
fn test_systems_run_in_registration_order() {
    let mut registry = EntityRegistry::new();
    let id = registry.create_entity();
    registry.add_component(id, TransformComponent::new(Vec2::ZERO));
    registry.notify_systems(id);

    // Drift runs first, so a later system sees the moved transform
    let drift = registry.register_system(Drift);
    let counter = registry.register_system(Counter {
        required: ComponentSet::new().with::<TransformComponent>(),
        ticks: Rc::new(RefCell::new(Vec::new())),
    });
    assert_eq!(drift.index(), 0);
    assert_eq!(counter.index(), 1);
    assert_eq!(registry.system_name(counter), Some("counter"));

    registry.update(0.016);
    registry.update(0.016);
    assert_eq!(registry.get::<TransformComponent>(id).map(|t| t.position.x), Some(2.0));
}

#[test]
fn test_late_registered_system_matches_existing_entities() {
    let mut registry = EntityRegistry::new();
    let movers: Vec<EntityId> = (0..3)
        .map(|_| {
            let id = registry.create_entity();
            registry.add_component(id, TransformComponent::default());
            registry.add_component(id, MovementComponent::default());
            id
        })
        .collect();
    let _static_prop = {
        let id = registry.create_entity();
        registry.add_component(id, TransformComponent::default());
        id
    };

    let system = registry.register_system(Counter {
        required: ComponentSet::new()
            .with::<TransformComponent>()
            .with::<MovementComponent>(),
        ticks: Rc::new(RefCell::new(Vec::new())),
    });

    assert_eq!(registry.system_entities(system), movers.as_slice());
}

#[test]
fn test_matching_is_sticky_after_component_removal() {
    let mut registry = EntityRegistry::new();
    let system = registry.register_system(Drift);

    let id = registry.create_entity();
    registry.add_component(id, TransformComponent::default());
    registry.notify_systems(id);
    assert_eq!(registry.system_entities(system), &[id]);

    registry.remove_component::<TransformComponent>(id);
    // Stays listed; the predicate itself reflects the current components
    assert_eq!(registry.system_entities(system), &[id]);
    assert!(!registry.entity_matches(system, id));

    // The system tolerates the missing component
    registry.update(0.1);
}

#[test]
fn test_components_on_unknown_entity_are_rejected() {
    let mut registry = EntityRegistry::new();
    assert!(!registry.add_component(EntityId(42), HealthComponent::new(10.0)));
    assert!(registry.get::<HealthComponent>(EntityId(42)).is_none());
}

mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_set() -> impl Strategy<Value = Vec<ComponentKind>> {
        prop::sample::subsequence(ComponentKind::ALL.to_vec(), 0..=ComponentKind::ALL.len())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// `entity_matches` is exactly "required is a subset of carried"
        #[test]
        fn prop_entity_matches_is_subset_membership(required in arb_set(), carried in arb_set()) {
            let mut registry = EntityRegistry::new();
            let system = registry.register_system(Counter {
                required: required.iter().copied().collect(),
                ticks: Rc::new(RefCell::new(Vec::new())),
            });

            let id = registry.create_entity();
            for kind in &carried {
                registry.world_mut().insert_component(id, component_of(*kind));
            }

            let expected = required.iter().all(|k| carried.contains(k));
            prop_assert_eq!(registry.entity_matches(system, id), expected);

            // Asking twice changes nothing
            prop_assert_eq!(registry.entity_matches(system, id), expected);
            prop_assert_eq!(registry.world().component_set(id).len(), carried.len());
        }
    }
}
