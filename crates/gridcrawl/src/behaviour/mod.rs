// behaviour/mod.rs
//
// Per-entity behaviours driven by lifecycle events.
//
// A behaviour overrides only the handlers it cares about; the rest default to
// no-ops, so dispatching an event a behaviour doesn't handle does nothing.
// Behaviours are stored beside the Scene (like tweens), keyed by their parent
// EntityId, and receive everything they touch through a BehaviourContext.
//
// Usage:
//   let mut behaviours = BehaviourState::new();
//   behaviours.attach(player_id, InputController::new());
//   behaviours.dispatch(LifecycleEvent::Update, &mut scene, &keys, &world);

pub mod input_controller;

use crate::api::types::{BehaviourId, EntityId};
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use crate::input::keys::KeyState;
use crate::world::grid::CollisionWorld;

pub use input_controller::{ControllerConfig, InputController, KeyBindings};

/// Engine lifecycle events a behaviour can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Sent once, before the behaviour's first `Update`.
    Initialize,
    /// Sent every fixed step.
    Update,
    /// Sent when the parent entity is despawned.
    Destroy,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 3] = [Self::Initialize, Self::Update, Self::Destroy];

    pub fn name(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }

    /// Look up an event by its handler name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }
}

/// Everything a behaviour may read or write during one handler call.
pub struct BehaviourContext<'a> {
    /// The parent entity. Exclusively borrowed for the duration of the call.
    pub entity: &'a mut Entity,
    /// Keys held this step.
    pub keys: &'a KeyState,
    /// Collision queries.
    pub world: &'a dyn CollisionWorld,
}

/// A pluggable unit of per-entity logic.
pub trait Behaviour {
    /// Name used in log messages.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn initialize(&mut self, _ctx: &mut BehaviourContext<'_>) {}

    fn update(&mut self, _ctx: &mut BehaviourContext<'_>) {}

    fn destroy(&mut self, _ctx: &mut BehaviourContext<'_>) {}

    /// Route an event to its handler.
    fn apply(&mut self, event: LifecycleEvent, ctx: &mut BehaviourContext<'_>) {
        match event {
            LifecycleEvent::Initialize => self.initialize(ctx),
            LifecycleEvent::Update => self.update(ctx),
            LifecycleEvent::Destroy => self.destroy(ctx),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviourError {
    #[error("behaviour has no parent entity")]
    Detached,

    #[error("behaviour belongs to {parent:?} but was applied to {entity:?}")]
    WrongEntity { parent: EntityId, entity: EntityId },
}

/// A behaviour plus its back-reference to the owning entity.
pub struct AttachedBehaviour {
    parent: Option<EntityId>,
    initialized: bool,
    behaviour: Box<dyn Behaviour>,
}

impl AttachedBehaviour {
    /// Wrap a behaviour that has no parent yet.
    pub fn new(behaviour: impl Behaviour + 'static) -> Self {
        Self::from_box(Box::new(behaviour))
    }

    pub fn from_box(behaviour: Box<dyn Behaviour>) -> Self {
        Self {
            parent: None,
            initialized: false,
            behaviour,
        }
    }

    /// Record the owning entity. Calling again re-parents.
    pub fn set_parent(&mut self, parent: EntityId) {
        self.parent = Some(parent);
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn name(&self) -> &'static str {
        self.behaviour.name()
    }

    pub fn behaviour(&self) -> &dyn Behaviour {
        self.behaviour.as_ref()
    }

    pub fn behaviour_mut(&mut self) -> &mut dyn Behaviour {
        self.behaviour.as_mut()
    }

    /// Run the handler for `event` against the parent entity in `ctx`.
    ///
    /// Fails without running anything if no parent was set, or if `ctx`
    /// carries some other entity.
    pub fn apply(
        &mut self,
        event: LifecycleEvent,
        ctx: &mut BehaviourContext<'_>,
    ) -> Result<(), BehaviourError> {
        let parent = self.parent.ok_or(BehaviourError::Detached)?;
        if ctx.entity.id != parent {
            return Err(BehaviourError::WrongEntity {
                parent,
                entity: ctx.entity.id,
            });
        }
        self.behaviour.apply(event, ctx);
        if event == LifecycleEvent::Initialize {
            self.initialized = true;
        }
        Ok(())
    }

    /// Name-driven variant of [`apply`](Self::apply) for hosts that speak
    /// strings. Unknown names are ignored.
    pub fn apply_named(
        &mut self,
        name: &str,
        ctx: &mut BehaviourContext<'_>,
    ) -> Result<(), BehaviourError> {
        match LifecycleEvent::from_name(name) {
            Some(event) => self.apply(event, ctx),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for AttachedBehaviour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachedBehaviour")
            .field("name", &self.name())
            .field("parent", &self.parent)
            .field("initialized", &self.initialized)
            .finish()
    }
}

/// All attached behaviours, in attachment order.
#[derive(Debug, Default)]
pub struct BehaviourState {
    slots: Vec<(BehaviourId, AttachedBehaviour)>,
    next_id: u32,
}

impl BehaviourState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a behaviour to an entity. Returns a handle for later removal.
    pub fn attach(&mut self, entity: EntityId, behaviour: impl Behaviour + 'static) -> BehaviourId {
        self.attach_boxed(entity, Box::new(behaviour))
    }

    pub fn attach_boxed(&mut self, entity: EntityId, behaviour: Box<dyn Behaviour>) -> BehaviourId {
        let mut attached = AttachedBehaviour::from_box(behaviour);
        attached.set_parent(entity);
        self.insert(attached)
    }

    /// Store a pre-built behaviour as-is. Detached ones are skipped by dispatch.
    pub fn insert(&mut self, attached: AttachedBehaviour) -> BehaviourId {
        let id = BehaviourId(self.next_id);
        self.next_id += 1;
        log::debug!(
            "attach {} ({:?}) to {:?}",
            attached.name(),
            id,
            attached.parent()
        );
        self.slots.push((id, attached));
        id
    }

    /// Remove one behaviour without running `Destroy`.
    pub fn detach(&mut self, id: BehaviourId) -> Option<AttachedBehaviour> {
        let idx = self.slots.iter().position(|(slot_id, _)| *slot_id == id)?;
        Some(self.slots.remove(idx).1)
    }

    pub fn get(&self, id: BehaviourId) -> Option<&AttachedBehaviour> {
        self.slots.iter().find(|(slot_id, _)| *slot_id == id).map(|(_, b)| b)
    }

    pub fn get_mut(&mut self, id: BehaviourId) -> Option<&mut AttachedBehaviour> {
        self.slots.iter_mut().find(|(slot_id, _)| *slot_id == id).map(|(_, b)| b)
    }

    /// Behaviours whose parent is `entity`.
    pub fn for_entity(&self, entity: EntityId) -> impl Iterator<Item = &AttachedBehaviour> {
        self.slots
            .iter()
            .map(|(_, b)| b)
            .filter(move |b| b.parent() == Some(entity))
    }

    /// Send `Destroy` to every behaviour of `entity`, then drop them.
    /// Returns how many were removed.
    pub fn remove_entity(
        &mut self,
        entity: EntityId,
        scene: &mut Scene,
        keys: &KeyState,
        world: &dyn CollisionWorld,
    ) -> usize {
        if let Some(target) = scene.get_mut(entity) {
            for (_, slot) in self.slots.iter_mut().filter(|(_, b)| b.parent() == Some(entity)) {
                let mut ctx = BehaviourContext {
                    entity: &mut *target,
                    keys,
                    world,
                };
                if let Err(err) = slot.apply(LifecycleEvent::Destroy, &mut ctx) {
                    log::warn!("destroy {}: {}", slot.name(), err);
                }
            }
        }

        let before = self.slots.len();
        self.slots.retain(|(_, b)| b.parent() != Some(entity));
        before - self.slots.len()
    }

    /// Send `Initialize` to every behaviour that hasn't had it yet and whose
    /// parent is live. Returns how many were initialized.
    pub fn initialize_pending(
        &mut self,
        scene: &mut Scene,
        keys: &KeyState,
        world: &dyn CollisionWorld,
    ) -> usize {
        self.run(LifecycleEvent::Initialize, scene, keys, world, true)
    }

    /// Send `event` to every behaviour whose parent is in the scene and
    /// active. Returns how many handlers ran.
    pub fn dispatch(
        &mut self,
        event: LifecycleEvent,
        scene: &mut Scene,
        keys: &KeyState,
        world: &dyn CollisionWorld,
    ) -> usize {
        self.run(event, scene, keys, world, false)
    }

    fn run(
        &mut self,
        event: LifecycleEvent,
        scene: &mut Scene,
        keys: &KeyState,
        world: &dyn CollisionWorld,
        pending_only: bool,
    ) -> usize {
        let mut applied = 0;
        for (id, slot) in self.slots.iter_mut() {
            if pending_only && slot.is_initialized() {
                continue;
            }
            let Some(parent) = slot.parent() else {
                log::warn!("skipping detached behaviour {} ({:?})", slot.name(), id);
                continue;
            };
            let Some(entity) = scene.get_mut(parent) else {
                continue;
            };
            if !entity.active {
                continue;
            }

            let mut ctx = BehaviourContext { entity, keys, world };
            match slot.apply(event, &mut ctx) {
                Ok(()) => applied += 1,
                Err(err) => log::warn!("{} {}: {}", event.name(), slot.name(), err),
            }
        }
        applied
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid::ProbeFn;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<(EntityId, LifecycleEvent)>>>;

    /// Records every handler it receives.
    struct Recorder {
        log: Log,
    }

    impl Behaviour for Recorder {
        fn initialize(&mut self, ctx: &mut BehaviourContext<'_>) {
            self.log.borrow_mut().push((ctx.entity.id, LifecycleEvent::Initialize));
        }

        fn update(&mut self, ctx: &mut BehaviourContext<'_>) {
            self.log.borrow_mut().push((ctx.entity.id, LifecycleEvent::Update));
        }

        fn destroy(&mut self, ctx: &mut BehaviourContext<'_>) {
            self.log.borrow_mut().push((ctx.entity.id, LifecycleEvent::Destroy));
        }
    }

    /// Handles `update` only.
    struct Spinner;

    impl Behaviour for Spinner {
        fn update(&mut self, ctx: &mut BehaviourContext<'_>) {
            ctx.entity.facing += 1.0;
        }
    }

    fn open_world() -> ProbeFn<impl Fn(u32, f32, f32, f32) -> Option<crate::world::Collision>> {
        ProbeFn::new(|_, _, _, _| None)
    }

    #[test]
    fn event_names_round_trip() {
        for event in LifecycleEvent::ALL {
            assert_eq!(LifecycleEvent::from_name(event.name()), Some(event));
        }
        assert_eq!(LifecycleEvent::from_name("render"), None);
        assert_eq!(LifecycleEvent::from_name("Update"), None);
    }

    #[test]
    fn unhandled_event_is_noop() {
        let world = open_world();
        let keys = KeyState::new();
        let mut entity = Entity::new(EntityId(1)).with_facing(10.0);
        let mut attached = AttachedBehaviour::new(Spinner);
        attached.set_parent(EntityId(1));

        let mut ctx = BehaviourContext { entity: &mut entity, keys: &keys, world: &world };
        assert_eq!(attached.apply(LifecycleEvent::Initialize, &mut ctx), Ok(()));
        assert_eq!(attached.apply(LifecycleEvent::Destroy, &mut ctx), Ok(()));
        assert_eq!(attached.apply_named("render", &mut ctx), Ok(()));
        assert_eq!(attached.apply_named("", &mut ctx), Ok(()));
        assert_eq!(entity.facing, 10.0);
    }

    #[test]
    fn update_runs_exactly_once() {
        let world = open_world();
        let keys = KeyState::new();
        let log: Log = Rc::default();
        let mut entity = Entity::new(EntityId(4));
        let mut attached = AttachedBehaviour::new(Recorder { log: log.clone() });
        attached.set_parent(EntityId(4));

        let mut ctx = BehaviourContext { entity: &mut entity, keys: &keys, world: &world };
        attached.apply_named("update", &mut ctx).unwrap();
        assert_eq!(*log.borrow(), vec![(EntityId(4), LifecycleEvent::Update)]);
    }

    #[test]
    fn detached_behaviour_refuses_to_run() {
        let world = open_world();
        let keys = KeyState::new();
        let mut entity = Entity::new(EntityId(1));
        let mut attached = AttachedBehaviour::new(Spinner);

        let mut ctx = BehaviourContext { entity: &mut entity, keys: &keys, world: &world };
        assert_eq!(attached.apply(LifecycleEvent::Update, &mut ctx), Err(BehaviourError::Detached));
        assert_eq!(entity.facing, 0.0);
    }

    #[test]
    fn set_parent_overwrites() {
        let world = open_world();
        let keys = KeyState::new();
        let mut entity = Entity::new(EntityId(2));
        let mut attached = AttachedBehaviour::new(Spinner);
        attached.set_parent(EntityId(1));
        attached.set_parent(EntityId(2));
        assert_eq!(attached.parent(), Some(EntityId(2)));

        let mut ctx = BehaviourContext { entity: &mut entity, keys: &keys, world: &world };
        attached.apply(LifecycleEvent::Update, &mut ctx).unwrap();
        assert_eq!(entity.facing, 1.0);
    }

    #[test]
    fn wrong_entity_is_rejected() {
        let world = open_world();
        let keys = KeyState::new();
        let mut other = Entity::new(EntityId(9));
        let mut attached = AttachedBehaviour::new(Spinner);
        attached.set_parent(EntityId(1));

        let mut ctx = BehaviourContext { entity: &mut other, keys: &keys, world: &world };
        assert_eq!(
            attached.apply(LifecycleEvent::Update, &mut ctx),
            Err(BehaviourError::WrongEntity { parent: EntityId(1), entity: EntityId(9) })
        );
        assert_eq!(other.facing, 0.0);
    }

    #[test]
    fn dispatch_skips_missing_and_inactive_parents() {
        let world = open_world();
        let keys = KeyState::new();
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)));
        let mut sleeper = Entity::new(EntityId(2));
        sleeper.active = false;
        scene.spawn(sleeper);

        let mut behaviours = BehaviourState::new();
        behaviours.attach(EntityId(1), Spinner);
        behaviours.attach(EntityId(2), Spinner);
        behaviours.attach(EntityId(3), Spinner);
        behaviours.insert(AttachedBehaviour::new(Spinner));

        let ran = behaviours.dispatch(LifecycleEvent::Update, &mut scene, &keys, &world);
        assert_eq!(ran, 1);
        assert_eq!(scene.get(EntityId(1)).unwrap().facing, 1.0);
        assert_eq!(scene.get(EntityId(2)).unwrap().facing, 0.0);
    }

    #[test]
    fn initialize_runs_once_per_behaviour() {
        let world = open_world();
        let keys = KeyState::new();
        let log: Log = Rc::default();
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)));

        let mut behaviours = BehaviourState::new();
        let first = behaviours.attach(EntityId(1), Recorder { log: log.clone() });
        assert_eq!(behaviours.initialize_pending(&mut scene, &keys, &world), 1);
        assert_eq!(behaviours.initialize_pending(&mut scene, &keys, &world), 0);
        assert!(behaviours.get(first).unwrap().is_initialized());

        // A late attachment gets its own Initialize.
        behaviours.attach(EntityId(1), Recorder { log: log.clone() });
        assert_eq!(behaviours.initialize_pending(&mut scene, &keys, &world), 1);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn remove_entity_destroys_then_drops() {
        let world = open_world();
        let keys = KeyState::new();
        let log: Log = Rc::default();
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)));
        scene.spawn(Entity::new(EntityId(2)));

        let mut behaviours = BehaviourState::new();
        behaviours.attach(EntityId(1), Recorder { log: log.clone() });
        behaviours.attach(EntityId(1), Spinner);
        behaviours.attach(EntityId(2), Recorder { log: log.clone() });

        assert_eq!(behaviours.remove_entity(EntityId(1), &mut scene, &keys, &world), 2);
        assert_eq!(*log.borrow(), vec![(EntityId(1), LifecycleEvent::Destroy)]);
        assert_eq!(behaviours.len(), 1);
        assert_eq!(behaviours.for_entity(EntityId(1)).count(), 0);
        assert_eq!(behaviours.for_entity(EntityId(2)).count(), 1);
    }

    #[test]
    fn detach_by_handle() {
        let mut behaviours = BehaviourState::new();
        let a = behaviours.attach(EntityId(1), Spinner);
        let b = behaviours.attach(EntityId(1), Spinner);
        assert_ne!(a, b);
        assert_eq!(behaviours.detach(a).and_then(|x| x.parent()), Some(EntityId(1)));
        assert!(behaviours.detach(a).is_none());
        assert!(behaviours.get(b).is_some());
        assert_eq!(behaviours.len(), 1);
    }
}
