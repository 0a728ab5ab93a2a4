//! Interfaces between the stack and the world around it.
//!
//! The stack never renders anything itself. It drives a [`Host`] with opaque
//! geometry, opacity, hierarchy and lifecycle commands, asks a
//! [`StackDataSource`] for neighboring screens and reports progress to a
//! [`StackDelegate`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::animation::SettleAnimation;
use crate::geometry::Rect;

/// Identifies a stack controller in data source and delegate callbacks.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StackId(u64);

static NEXT_STACK_ID: AtomicU64 = AtomicU64::new(1);

impl StackId {
    pub fn next() -> Self {
        Self(NEXT_STACK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Which way a finished settle moved the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Snapped back; the visible screen did not change
    Visible,
    After,
    Before,
}

/// A drawable layer addressed by a host command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layer<'a, S> {
    Screen(&'a S),
    /// The dimming scrim that tracks the visible screen
    Overlay,
}

/// Z-order position when inserting a screen's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Bottom of the container (index 0)
    Back,
    Front,
}

/// Primitives the stack consumes from the host GUI framework.
///
/// All methods are called on the single event thread, in strict sequence.
pub trait Host {
    /// Opaque handle to a screen owned by the host.
    type Screen: Clone + PartialEq + fmt::Debug;

    /// Add as child, then notify it moved to the container.
    fn add_child(&mut self, screen: &Self::Screen);

    /// Notify it will leave, remove its view if present, remove from parent.
    fn remove_child(&mut self, screen: &Self::Screen);

    fn insert_view(&mut self, screen: &Self::Screen, placement: Placement);

    /// Take the view out of the hierarchy while keeping the child relationship.
    fn remove_view(&mut self, screen: &Self::Screen);

    fn bring_overlay_to_front(&mut self);

    fn set_frame(&mut self, layer: Layer<'_, Self::Screen>, frame: Rect);

    fn set_opacity(&mut self, layer: Layer<'_, Self::Screen>, opacity: f32);

    fn begin_appearance(&mut self, screen: &Self::Screen, appearing: bool);

    fn end_appearance(&mut self, screen: &Self::Screen);

    fn set_interaction_enabled(&mut self, enabled: bool);

    /// A settle animation was scheduled. Hosts that mirror the animation
    /// natively can read its duration, curve and endpoints here.
    fn animation_started(&mut self, _animation: &SettleAnimation) {}
}

/// Supplies the neighbors of a screen. Returning `None` marks the edge of
/// the content in that direction.
pub trait StackDataSource<S> {
    fn screen_before(&mut self, stack: StackId, reference: &S) -> Option<S>;

    fn screen_after(&mut self, stack: StackId, reference: &S) -> Option<S>;
}

/// Observes transitions.
pub trait StackDelegate<S> {
    /// Fired once per gesture or programmatic move, before any layout change.
    fn will_transition(&mut self, stack: StackId, from: &S);

    /// Fired exactly once per completed settle. `from` is `None` for snap-back.
    fn did_finish_animating(
        &mut self,
        stack: StackId,
        to: &S,
        from: Option<&S>,
        direction: Direction,
    );
}
