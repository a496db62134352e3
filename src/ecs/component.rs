//! Component kinds, the closed component sum type, and capability sets
//!
//! Every component an entity can carry is one variant of [`Component`],
//! tagged by a [`ComponentKind`]. Typed access goes through
//! [`ComponentData`], which each component struct implements, so lookups
//! are checked at compile time instead of downcasting an erased value.

use crate::ai::AiComponent;
use crate::ecs::components::{
    ColliderComponent, CombatComponent, FactionComponent, HealthComponent, MovementComponent,
    PhysicsComponent, ResourceCollectorComponent, ResourceContainerComponent, TransformComponent,
};

/// Typed view over one variant of [`Component`]
pub trait ComponentData: Sized + 'static {
    const KIND: ComponentKind;

    fn into_component(self) -> Component;
    fn from_component(component: &Component) -> Option<&Self>;
    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
    fn take_component(component: Component) -> Option<Self>;
}

macro_rules! component_kinds {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        /// Tag for each component type in the closed set
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum ComponentKind {
            $($variant,)*
        }

        impl ComponentKind {
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$variant,)*];

            pub fn name(&self) -> &'static str {
                match self {
                    $(ComponentKind::$variant => stringify!($variant),)*
                }
            }
        }

        /// A component value; one variant per kind
        #[derive(Debug)]
        pub enum Component {
            $($variant($ty),)*
        }

        impl Component {
            pub fn kind(&self) -> ComponentKind {
                match self {
                    $(Component::$variant(_) => ComponentKind::$variant,)*
                }
            }
        }

        $(
            impl ComponentData for $ty {
                const KIND: ComponentKind = ComponentKind::$variant;

                fn into_component(self) -> Component {
                    Component::$variant(self)
                }

                fn from_component(component: &Component) -> Option<&Self> {
                    match component {
                        Component::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
                    match component {
                        Component::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn take_component(component: Component) -> Option<Self> {
                    match component {
                        Component::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Component {
                fn from(value: $ty) -> Self {
                    Component::$variant(value)
                }
            }
        )*
    };
}

component_kinds! {
    Transform => TransformComponent,
    Physics => PhysicsComponent,
    Health => HealthComponent,
    Collider => ColliderComponent,
    Movement => MovementComponent,
    Combat => CombatComponent,
    ResourceCollector => ResourceCollectorComponent,
    ResourceContainer => ResourceContainerComponent,
    Faction => FactionComponent,
    Ai => AiComponent,
}

/// Set of component kinds, stored as a bitmask
///
/// Used both for a system's required capabilities and for the kinds an
/// entity currently carries; matching is a subset test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ComponentSet(u32);

impl ComponentSet {
    pub const EMPTY: ComponentSet = ComponentSet(0);

    pub fn new() -> Self {
        Self::EMPTY
    }

    #[inline]
    fn bit(kind: ComponentKind) -> u32 {
        1 << (kind as u8)
    }

    /// Builder form of [`insert`](Self::insert) keyed by component type
    pub fn with<T: ComponentData>(mut self) -> Self {
        self.insert(T::KIND);
        self
    }

    pub fn insert(&mut self, kind: ComponentKind) {
        self.0 |= Self::bit(kind);
    }

    pub fn remove(&mut self, kind: ComponentKind) {
        self.0 &= !Self::bit(kind);
    }

    #[inline]
    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }

    /// True if every kind in `self` is also in `other`
    #[inline]
    pub fn is_subset(&self, other: &ComponentSet) -> bool {
        self.0 & other.0 == self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        ComponentKind::ALL.iter().copied().filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<ComponentKind> for ComponentSet {
    fn from_iter<I: IntoIterator<Item = ComponentKind>>(iter: I) -> Self {
        let mut set = ComponentSet::new();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl<const N: usize> From<[ComponentKind; N]> for ComponentSet {
    fn from(kinds: [ComponentKind; N]) -> Self {
        kinds.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_kind_roundtrip() {
        let component: Component = HealthComponent::new(40.0).into();
        assert_eq!(component.kind(), ComponentKind::Health);
        assert!(HealthComponent::from_component(&component).is_some());
        assert!(TransformComponent::from_component(&component).is_none());
    }

    #[test]
    fn test_set_subset() {
        let required = ComponentSet::new()
            .with::<TransformComponent>()
            .with::<MovementComponent>();
        let carried = ComponentSet::from([
            ComponentKind::Transform,
            ComponentKind::Movement,
            ComponentKind::Health,
        ]);

        assert!(required.is_subset(&carried));
        assert!(!carried.is_subset(&required));
        assert!(ComponentSet::EMPTY.is_subset(&required));
        assert_eq!(carried.len(), 3);
    }

    #[test]
    fn test_set_iter_in_kind_order() {
        let set = ComponentSet::from([ComponentKind::Ai, ComponentKind::Transform]);
        let kinds: Vec<_> = set.iter().collect();
        assert_eq!(kinds, vec![ComponentKind::Transform, ComponentKind::Ai]);
    }

    #[test]
    fn test_set_remove() {
        let mut set = ComponentSet::from([ComponentKind::Health]);
        set.remove(ComponentKind::Health);
        assert!(set.is_empty());
    }
}
