//! The closed component schema.
//!
//! Every entity carries one [`Bundle`]: a fixed record holding exactly one
//! instance of every component kind plus a presence bitset. The schema is
//! compile-time-known and deliberately not extensible at runtime — there is
//! no open registry and no dynamic dispatch, just a struct of plain-data
//! fields indexed by [`Kind`].
//!
//! Access contract:
//! - [`Bundle::insert`] overwrites any prior instance and marks the kind
//!   present.
//! - [`Bundle::get`] / [`Bundle::get_mut`] panic when the kind is absent;
//!   call sites are expected to guard with [`Bundle::has`] first. The
//!   non-panicking [`Bundle::try_get`] forms exist for iteration-heavy code.
//! - [`Bundle::remove`] resets the field to its default and clears the bit.

use std::collections::HashMap;

use fixedbitset::FixedBitSet;

use crate::anim::Animation;
use crate::math::{Color, Vec2};

/// A named player action that can be buffered or cooldown-gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    Attack,
    Dash,
    BoneThrow,
}

impl Action {
    /// The config/debug-facing name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Jump => "jump",
            Action::Attack => "attack",
            Action::Dash => "dash",
            Action::BoneThrow => "bone_throw",
        }
    }
}

/// Position, velocity and rotation of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
}

impl Transform {
    pub fn new(pos: Vec2, velocity: Vec2, angle: f32) -> Self {
        Self { pos, velocity, angle }
    }
}

/// The geometric variant of a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Circle { radius: f32, points: u32 },
    Rect { size: Vec2 },
}

/// A render shape that doubles as the AABB collision proxy when rectangular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub fill: Color,
    pub outline: Color,
    pub thickness: f32,
}

impl Shape {
    pub fn circle(radius: f32, points: u32, fill: Color, outline: Color, thickness: f32) -> Self {
        Self { kind: ShapeKind::Circle { radius, points }, fill, outline, thickness }
    }

    pub fn rect(size: Vec2, fill: Color, outline: Color, thickness: f32) -> Self {
        Self { kind: ShapeKind::Rect { size }, fill, outline, thickness }
    }

    /// The rectangle size, or zero for circles. Used by the AABB overlap test.
    pub fn rect_size(&self) -> Vec2 {
        match self.kind {
            ShapeKind::Rect { size } => size,
            ShapeKind::Circle { .. } => Vec2::ZERO,
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::circle(0.0, 0, Color::TRANSPARENT, Color::TRANSPARENT, 0.0)
    }
}

/// Legacy radius-based collision marker. Low use; kept for parity with the
/// projectile spawn path.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Collision {
    pub radius: f32,
}

impl Collision {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

/// Current frame's raw input flags for the controlled entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Input {
    pub up: bool,
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub attack: bool,
    pub dash: bool,
    pub throw: bool,
}

/// Remaining frames before automatic destruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifespan {
    pub remaining: i32,
    pub total: i32,
}

impl Lifespan {
    pub fn new(total: i32) -> Self {
        Self { remaining: total, total }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub score: i32,
}

/// The player/enemy finite state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Idle,
    Running,
    Jump1,
    Jump2,
    Falling,
    Attacking,
    Dashing,
    RunningStart,
    RunningStop,
    RunningTurn,
}

impl PlayerState {
    pub fn name(self) -> &'static str {
        match self {
            PlayerState::Idle => "Idle",
            PlayerState::Running => "Running",
            PlayerState::Jump1 => "Jump1",
            PlayerState::Jump2 => "Jump2",
            PlayerState::Falling => "Falling",
            PlayerState::Attacking => "Attacking",
            PlayerState::Dashing => "Dashing",
            PlayerState::RunningStart => "RunningStart",
            PlayerState::RunningStop => "RunningStop",
            PlayerState::RunningTurn => "RunningTurn",
        }
    }
}

/// State machine position plus facing and the transition lock countdown.
///
/// While `lock_frames > 0` no system may request a new transition; the
/// movement system decrements the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub state: PlayerState,
    pub facing_right: bool,
    pub lock_frames: i32,
}

impl State {
    pub fn new(state: PlayerState) -> Self {
        Self { state, ..Self::default() }
    }
}

impl Default for State {
    fn default() -> Self {
        Self { state: PlayerState::Idle, facing_right: true, lock_frames: 0 }
    }
}

/// A single ability cooldown: ready when `remaining` has counted down to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cooldown {
    pub duration: i32,
    pub remaining: i32,
}

impl Cooldown {
    pub fn new(duration: i32) -> Self {
        Self { duration, remaining: 0 }
    }

    pub fn ready(&self) -> bool {
        self.remaining <= 0
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    pub fn tick(&mut self) {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
    }
}

/// Per-action cooldown set. Unknown actions are never ready.
#[derive(Debug, Clone, Default)]
pub struct Cooldowns {
    slots: HashMap<Action, Cooldown>,
}

impl Cooldowns {
    pub fn add(&mut self, action: Action, duration: i32) {
        self.slots.insert(action, Cooldown::new(duration));
    }

    pub fn ready(&self, action: Action) -> bool {
        self.slots.get(&action).is_some_and(Cooldown::ready)
    }

    pub fn reset(&mut self, action: Action) {
        if let Some(cd) = self.slots.get_mut(&action) {
            cd.reset();
        }
    }

    /// Decrement every slot toward zero. Called once per frame.
    pub fn tick(&mut self) {
        for cd in self.slots.values_mut() {
            cd.tick();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, &Cooldown)> {
        self.slots.iter().map(|(a, cd)| (*a, cd))
    }
}

/// An input command held eligible for consumption for a short grace window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buffered {
    pub action: Action,
    pub frames_remaining: i32,
}

/// Ordered buffer of recently flagged actions.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    inputs: Vec<Buffered>,
}

impl Buffer {
    /// Default grace window in frames.
    pub const WINDOW: i32 = 15;

    pub fn push(&mut self, action: Action, window: i32) {
        self.inputs.push(Buffered { action, frames_remaining: window });
    }

    /// Decrement every entry and drop those whose window has closed.
    pub fn tick(&mut self) {
        for input in &mut self.inputs {
            input.frames_remaining -= 1;
        }
        self.inputs.retain(|i| i.frames_remaining > 0);
    }

    pub fn contains(&self, action: Action) -> bool {
        self.inputs.iter().any(|i| i.action == action)
    }

    /// Consume every buffered occurrence of an action.
    pub fn clear(&mut self, action: Action) {
        self.inputs.retain(|i| i.action != action);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buffered> {
        self.inputs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Dash ability timing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dash {
    /// Total dash duration in frames.
    pub duration: i32,
    /// Countdown while active.
    pub timer: i32,
    pub active: bool,
}

impl Dash {
    pub fn new(duration: i32) -> Self {
        Self { duration, timer: 0, active: false }
    }

    pub fn start(&mut self) {
        self.timer = self.duration;
        self.active = true;
    }

    pub fn tick(&mut self) {
        if self.active && self.timer > 0 {
            self.timer -= 1;
            if self.timer == 0 {
                self.active = false;
            }
        }
    }
}

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub max: i32,
    pub current: i32,
}

impl Health {
    pub fn new(hp: i32) -> Self {
        Self { max: hp, current: hp }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Per-frame downward acceleration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gravity {
    pub accel: f32,
}

impl Gravity {
    pub fn new(accel: f32) -> Self {
        Self { accel }
    }
}

/// Jump charges, edge-trigger latch and the coyote-time countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jump {
    pub jumps_left: i32,
    pub jump_released: bool,
    pub coyote_timer: i32,
}

impl Jump {
    pub fn with_charges(max_jumps: i32) -> Self {
        Self { jumps_left: max_jumps, ..Self::default() }
    }
}

impl Default for Jump {
    fn default() -> Self {
        Self { jumps_left: 2, jump_released: true, coyote_timer: 0 }
    }
}

/// The currently playing animation instance plus the logical name it was
/// loaded under, used to detect when a state change requires a swap.
#[derive(Debug, Clone, Default)]
pub struct AnimationRef {
    pub anim: Animation,
    pub name: String,
}

impl AnimationRef {
    pub fn new(anim: Animation, name: impl Into<String>) -> Self {
        Self { anim, name: name.into() }
    }
}

/// The polygon variant of an environment collision box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EcbKind {
    /// Four-vertex diamond: top, right, bottom, left.
    #[default]
    Diamond,
    /// Truncated variant with the bottom vertex at the center.
    Triangle,
}

/// Environment collision box: a small 4-point polygon centered on the entity,
/// used for ground and platform contact (distinct from the render shape).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ecb {
    pub kind: EcbKind,
    pub width: f32,
    pub height: f32,
    points: [Vec2; 4],
}

impl Ecb {
    pub fn diamond(center: Vec2, width: f32, height: f32) -> Self {
        let mut ecb = Self { kind: EcbKind::Diamond, width, height, points: [Vec2::ZERO; 4] };
        ecb.recenter(center);
        ecb
    }

    pub fn triangle(center: Vec2, width: f32, height: f32) -> Self {
        let mut ecb = Self { kind: EcbKind::Triangle, width, height, points: [Vec2::ZERO; 4] };
        ecb.recenter(center);
        ecb
    }

    /// Rebuild the polygon around a new center, preserving kind and size.
    pub fn recenter(&mut self, center: Vec2) {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let bottom = match self.kind {
            EcbKind::Diamond => Vec2::new(center.x, center.y + half_h),
            EcbKind::Triangle => center,
        };
        self.points = [
            Vec2::new(center.x, center.y - half_h),
            Vec2::new(center.x + half_w, center.y),
            bottom,
            Vec2::new(center.x - half_w, center.y),
        ];
    }

    /// The bottom vertex, where ground contact is tested.
    pub fn bottom(&self) -> Vec2 {
        self.points[2]
    }

    /// Vertical distance from the entity center down to the bottom vertex.
    pub fn bottom_offset(&self) -> f32 {
        match self.kind {
            EcbKind::Diamond => self.height / 2.0,
            EcbKind::Triangle => 0.0,
        }
    }

    pub fn points(&self) -> &[Vec2; 4] {
        &self.points
    }
}

/// Presence-only marker disabling further physics and position updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stuck;

/// A component kind in the closed schema.
///
/// Implemented only by the types listed in the schema macro below; the trait
/// exists to project a kind in and out of a [`Bundle`].
pub trait Component: Default + 'static {
    const KIND: Kind;

    fn slot(bundle: &Bundle) -> &Self;
    fn slot_mut(bundle: &mut Bundle) -> &mut Self;
}

macro_rules! component_schema {
    ($( $field:ident : $ty:ident => $kind:ident ),+ $(,)?) => {
        /// Enumeration of every component kind an entity can carry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Kind {
            $( $kind, )+
        }

        impl Kind {
            /// Every kind, in schema order.
            pub const ALL: &'static [Kind] = &[ $( Kind::$kind, )+ ];

            #[inline]
            fn bit(self) -> usize {
                self as usize
            }
        }

        /// The number of component kinds in the schema.
        pub const KIND_COUNT: usize = Kind::ALL.len();

        /// Fixed per-entity component record with a presence bitset.
        #[derive(Debug, Clone)]
        pub struct Bundle {
            present: FixedBitSet,
            $( $field: $ty, )+
        }

        impl Default for Bundle {
            fn default() -> Self {
                Self {
                    present: FixedBitSet::with_capacity(KIND_COUNT),
                    $( $field: <$ty>::default(), )+
                }
            }
        }

        $(
            impl Component for $ty {
                const KIND: Kind = Kind::$kind;

                #[inline]
                fn slot(bundle: &Bundle) -> &Self {
                    &bundle.$field
                }

                #[inline]
                fn slot_mut(bundle: &mut Bundle) -> &mut Self {
                    &mut bundle.$field
                }
            }
        )+
    };
}

component_schema! {
    transform: Transform => Transform,
    shape: Shape => Shape,
    collision: Collision => Collision,
    input: Input => Input,
    lifespan: Lifespan => Lifespan,
    score: Score => Score,
    state: State => State,
    cooldowns: Cooldowns => Cooldowns,
    dash: Dash => Dash,
    health: Health => Health,
    gravity: Gravity => Gravity,
    jump: Jump => Jump,
    buffer: Buffer => Buffer,
    animation: AnimationRef => Animation,
    ecb: Ecb => Ecb,
    stuck: Stuck => Stuck,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn has<C: Component>(&self) -> bool {
        self.present.contains(C::KIND.bit())
    }

    /// Attach a component, silently replacing any prior instance of the kind.
    pub fn insert<C: Component>(&mut self, value: C) -> &mut C {
        *C::slot_mut(self) = value;
        self.present.insert(C::KIND.bit());
        C::slot_mut(self)
    }

    /// Borrow an attached component.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not attached. Callers guard with [`Bundle::has`].
    pub fn get<C: Component>(&self) -> &C {
        assert!(self.has::<C>(), "component {:?} not attached", C::KIND);
        C::slot(self)
    }

    /// Mutably borrow an attached component.
    ///
    /// # Panics
    ///
    /// Panics if the kind is not attached. Callers guard with [`Bundle::has`].
    pub fn get_mut<C: Component>(&mut self) -> &mut C {
        assert!(self.has::<C>(), "component {:?} not attached", C::KIND);
        C::slot_mut(self)
    }

    pub fn try_get<C: Component>(&self) -> Option<&C> {
        self.has::<C>().then(|| C::slot(self))
    }

    pub fn try_get_mut<C: Component>(&mut self) -> Option<&mut C> {
        if self.has::<C>() { Some(C::slot_mut(self)) } else { None }
    }

    /// Detach a component, resetting its slot to the default value.
    pub fn remove<C: Component>(&mut self) {
        *C::slot_mut(self) = C::default();
        self.present.set(C::KIND.bit(), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_marks_present() {
        // Given
        let mut bundle = Bundle::new();
        assert!(!bundle.has::<Transform>());

        // When
        bundle.insert(Transform::new(Vec2::new(1.0, 2.0), Vec2::ZERO, 0.0));

        // Then
        assert!(bundle.has::<Transform>());
        assert_eq!(bundle.get::<Transform>().pos, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn insert_twice_replaces() {
        // Given
        let mut bundle = Bundle::new();
        bundle.insert(Health::new(5));

        // When
        bundle.insert(Health::new(3));

        // Then
        assert_eq!(bundle.get::<Health>().max, 3);
        assert_eq!(bundle.get::<Health>().current, 3);
    }

    #[test]
    fn remove_resets_to_default() {
        // Given
        let mut bundle = Bundle::new();
        bundle.insert(Lifespan::new(10));

        // When
        bundle.remove::<Lifespan>();

        // Then
        assert!(!bundle.has::<Lifespan>());
        assert_eq!(bundle.try_get::<Lifespan>(), None);
    }

    #[test]
    #[should_panic(expected = "not attached")]
    fn get_absent_kind_panics() {
        // Given
        let bundle = Bundle::new();

        // When - precondition misuse
        let _ = bundle.get::<Gravity>();
    }

    #[test]
    fn presence_is_per_kind() {
        // Given
        let mut bundle = Bundle::new();

        // When
        bundle.insert(Stuck);
        bundle.insert(Gravity::new(0.5));

        // Then
        assert!(bundle.has::<Stuck>());
        assert!(bundle.has::<Gravity>());
        assert!(!bundle.has::<Jump>());
    }

    #[test]
    fn cooldown_lifecycle() {
        // Given
        let mut cds = Cooldowns::default();
        cds.add(Action::Dash, 3);

        // Then - fresh cooldowns start ready
        assert!(cds.ready(Action::Dash));
        assert!(!cds.ready(Action::Attack)); // never registered

        // When
        cds.reset(Action::Dash);

        // Then
        assert!(!cds.ready(Action::Dash));

        // When - tick down
        cds.tick();
        cds.tick();
        assert!(!cds.ready(Action::Dash));
        cds.tick();

        // Then
        assert!(cds.ready(Action::Dash));
    }

    #[test]
    fn buffer_window_expiry() {
        // Given
        let mut buffer = Buffer::default();
        buffer.push(Action::Jump, 2);

        // Then
        assert!(buffer.contains(Action::Jump));

        // When - window elapses
        buffer.tick();
        assert!(buffer.contains(Action::Jump));
        buffer.tick();

        // Then
        assert!(!buffer.contains(Action::Jump));
        assert!(buffer.is_empty());
    }

    #[test]
    fn buffer_clear_consumes_all_occurrences() {
        // Given
        let mut buffer = Buffer::default();
        buffer.push(Action::Jump, 15);
        buffer.push(Action::Dash, 15);
        buffer.push(Action::Jump, 15);

        // When
        buffer.clear(Action::Jump);

        // Then
        assert!(!buffer.contains(Action::Jump));
        assert!(buffer.contains(Action::Dash));
    }

    #[test]
    fn dash_deactivates_at_zero() {
        // Given
        let mut dash = Dash::new(2);
        dash.start();
        assert!(dash.active);

        // When
        dash.tick();
        assert!(dash.active);
        dash.tick();

        // Then
        assert!(!dash.active);
    }

    #[test]
    fn ecb_diamond_geometry() {
        // Given
        let ecb = Ecb::diamond(Vec2::new(10.0, 20.0), 40.0, 80.0);

        // Then
        assert_eq!(ecb.points()[0], Vec2::new(10.0, -20.0)); // top
        assert_eq!(ecb.points()[1], Vec2::new(30.0, 20.0)); // right
        assert_eq!(ecb.bottom(), Vec2::new(10.0, 60.0));
        assert_eq!(ecb.points()[3], Vec2::new(-10.0, 20.0)); // left
        assert_eq!(ecb.bottom_offset(), 40.0);
    }

    #[test]
    fn ecb_triangle_bottom_at_center() {
        // Given
        let ecb = Ecb::triangle(Vec2::new(5.0, 5.0), 20.0, 20.0);

        // Then
        assert_eq!(ecb.bottom(), Vec2::new(5.0, 5.0));
        assert_eq!(ecb.bottom_offset(), 0.0);
    }

    #[test]
    fn ecb_recenter_preserves_shape() {
        // Given
        let mut ecb = Ecb::diamond(Vec2::ZERO, 40.0, 80.0);

        // When
        ecb.recenter(Vec2::new(100.0, 50.0));

        // Then
        assert_eq!(ecb.bottom(), Vec2::new(100.0, 90.0));
        assert_eq!(ecb.width, 40.0);
        assert_eq!(ecb.height, 80.0);
    }
}
