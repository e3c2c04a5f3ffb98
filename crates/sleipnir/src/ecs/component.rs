//! # Component — A Closed Set of Component Kinds
//!
//! Every component the simulation knows about is a variant of [`Component`].
//! Each variant has a stable discriminant, [`ComponentKind`], which doubles as
//! the slot index inside an entity's [`Components`] table.
//!
//! ## Why a closed enum?
//!
//! A generic ECS stores `Box<dyn Any>` keyed by `TypeId`, which means every
//! lookup is a runtime type check. The simulation core only ever deals with a
//! fixed family of components, so we trade openness for:
//!
//! - lookups that are an array index (`kind as usize`)
//! - a kind tag that is stable across builds and serializable
//! - exhaustive `match` when a system wants to handle every kind
//!
//! Typed access still reads like a generic ECS: the [`ComponentType`] trait
//! maps each payload type to its variant at compile time, so
//! `world.get::<RigidBody>(e)` resolves to a fixed slot with no reflection.
//!
//! ```text
//! Components (one per entity)
//!   slots: [Transform?, RigidBody?, Acceleration?, ... , Material?]
//!           ^ index = ComponentKind as usize
//! ```

use serde::{Deserialize, Serialize};

use crate::ecs::hierarchy::{Children, Parent};
use crate::math::{Transform, Vec4};
use crate::physics::body::{
    Acceleration, AngularAcceleration, AngularDamping, AngularMass, AngularVelocity, Damping,
    RigidBody,
};
use crate::physics::collider::Collider;

/// Display name, shown by the editor. Never read by the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Surface data for the external renderer. Never read by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Linear RGBA.
    pub base_color: Vec4,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec4::ONE,
        }
    }
}

// ── Kinds ───────────────────────────────────────────────────────────────

macro_rules! components {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        /// Stable discriminant of a [`Component`] variant.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ComponentKind {
            $($variant,)*
        }

        impl ComponentKind {
            /// Every kind, in slot order.
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$variant,)*];
            /// Number of kinds (size of a [`Components`] table).
            pub const COUNT: usize = Self::ALL.len();

            pub fn name(self) -> &'static str {
                match self {
                    $(ComponentKind::$variant => stringify!($variant),)*
                }
            }
        }

        /// A component value of any kind.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kind", content = "value")]
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
            impl ComponentType for $ty {
                const KIND: ComponentKind = ComponentKind::$variant;

                fn from_component(component: &Component) -> Option<&Self> {
                    match component {
                        Component::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
                    match component {
                        Component::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn from_component_owned(component: Component) -> Option<Self> {
                    match component {
                        Component::$variant(value) => Some(value),
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

components! {
    Transform => Transform,
    RigidBody => RigidBody,
    Acceleration => Acceleration,
    Damping => Damping,
    AngularVelocity => AngularVelocity,
    AngularAcceleration => AngularAcceleration,
    AngularDamping => AngularDamping,
    AngularMass => AngularMass,
    Collider => Collider,
    Parent => Parent,
    Children => Children,
    Name => Name,
    Material => Material,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete payload type bound to one [`ComponentKind`].
///
/// Implemented for every variant of [`Component`]; not meant to be
/// implemented outside this crate.
pub trait ComponentType: Sized + Into<Component> {
    const KIND: ComponentKind;

    fn from_component(component: &Component) -> Option<&Self>;
    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
    fn from_component_owned(component: Component) -> Option<Self>;
}

// ── Per-entity table ────────────────────────────────────────────────────

/// The components attached to one entity: at most one per kind, ordered by
/// kind.
#[derive(Debug, Clone)]
pub struct Components {
    slots: [Option<Component>; ComponentKind::COUNT],
}

impl Components {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Insert a component, returning the previous one of the same kind.
    pub fn insert(&mut self, component: Component) -> Option<Component> {
        let slot = component.kind() as usize;
        self.slots[slot].replace(component)
    }

    pub fn remove(&mut self, kind: ComponentKind) -> Option<Component> {
        self.slots[kind as usize].take()
    }

    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.slots[kind as usize].is_some()
    }

    pub fn get_kind(&self, kind: ComponentKind) -> Option<&Component> {
        self.slots[kind as usize].as_ref()
    }

    pub fn get_kind_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.slots[kind as usize].as_mut()
    }

    pub fn get<T: ComponentType>(&self) -> Option<&T> {
        self.get_kind(T::KIND).and_then(T::from_component)
    }

    pub fn get_mut<T: ComponentType>(&mut self) -> Option<&mut T> {
        self.get_kind_mut(T::KIND).and_then(T::from_component_mut)
    }

    pub fn has<T: ComponentType>(&self) -> bool {
        self.contains(T::KIND)
    }

    pub fn take<T: ComponentType>(&mut self) -> Option<T> {
        self.remove(T::KIND).and_then(T::from_component_owned)
    }

    /// Iterate present components in kind order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.slots.iter().flatten()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.iter().map(Component::kind)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl Default for Components {
    fn default() -> Self {
        Self::new()
    }
}

// ── Bundles ─────────────────────────────────────────────────────────────

/// A group of components inserted together by
/// [`World::spawn`](super::world::World::spawn).
///
/// Implemented for tuples of up to eight [`ComponentType`]s and for
/// `Vec<Component>` (the shape produced by deserialized editor commands).
pub trait Bundle {
    fn insert_into(self, components: &mut Components);
}

impl Bundle for () {
    fn insert_into(self, _components: &mut Components) {}
}

impl Bundle for Vec<Component> {
    fn insert_into(self, components: &mut Components) {
        for component in self {
            components.insert(component);
        }
    }
}

impl Bundle for Component {
    fn insert_into(self, components: &mut Components) {
        components.insert(self);
    }
}

macro_rules! impl_bundle {
    ($($name:ident),+) => {
        impl<$($name: ComponentType),+> Bundle for ($($name,)+) {
            #[allow(non_snake_case)]
            fn insert_into(self, components: &mut Components) {
                let ($($name,)+) = self;
                $(components.insert($name.into());)+
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn kinds_match_slots() {
        for (i, kind) in ComponentKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, i);
        }
        assert_eq!(ComponentKind::COUNT, 13);
    }

    #[test]
    fn insert_replaces_same_kind() {
        let mut c = Components::new();
        assert!(c.insert(RigidBody::new(1.0).into()).is_none());
        let prev = c.insert(RigidBody::new(2.0).into());
        assert!(matches!(prev, Some(Component::RigidBody(b)) if b.mass == 1.0));
        assert_eq!(c.get::<RigidBody>().unwrap().mass, 2.0);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn typed_lookup_uses_kind() {
        let mut c = Components::new();
        c.insert(Acceleration(Vec3::Y).into());
        assert!(c.has::<Acceleration>());
        assert!(c.get::<Damping>().is_none());
        c.get_mut::<Acceleration>().unwrap().0 = Vec3::X;
        assert_eq!(c.take::<Acceleration>(), Some(Acceleration(Vec3::X)));
        assert!(c.is_empty());
    }

    #[test]
    fn iteration_is_kind_ordered() {
        let mut c = Components::new();
        c.insert(Name::new("ball").into());
        c.insert(Collider::sphere(0.5).into());
        c.insert(Transform::default().into());
        let kinds: Vec<_> = c.kinds().collect();
        assert_eq!(
            kinds,
            vec![ComponentKind::Transform, ComponentKind::Collider, ComponentKind::Name]
        );
    }

    #[test]
    fn tuple_bundle_inserts_all() {
        let mut c = Components::new();
        (Transform::default(), RigidBody::new(1.0), Damping { factor: 0.9 }).insert_into(&mut c);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn component_serde_is_tagged() {
        let json = serde_json::to_string(&Component::Damping(Damping { factor: 0.5 })).unwrap();
        assert_eq!(json, r#"{"kind":"Damping","value":{"factor":0.5}}"#);
        let back: Component = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), ComponentKind::Damping);
    }
}
