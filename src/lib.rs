//! A gesture-driven, horizontally swipeable card stack.
//!
//! One screen is visible at a time, flanked by a lazily requested *before*
//! and *after* screen. Dragging left pulls the after screen up from behind
//! the visible one; dragging right slides the before screen in over it. On
//! release the stack either commits to the neighbor or snaps back, then
//! rotates its three roles and asks for a fresh neighbor.
//!
//! The crate renders nothing. A [`host::Host`] receives geometry, opacity,
//! hierarchy and appearance commands; a [`host::StackDataSource`] supplies
//! neighbors; a [`host::StackDelegate`] hears about transitions.

pub mod animation;
pub mod animator;
pub mod buffer;
pub mod config;
pub mod controller;
pub mod driver;
pub mod geometry;
pub mod gesture;
pub mod host;
pub mod layout;
pub mod role;

pub mod prelude {
    pub use crate::animation::{AnimationId, SettleAnimation, TimingFunction, Transition};
    pub use crate::animator::{StackChanges, TransitionState};
    pub use crate::config::StackConfig;
    pub use crate::controller::{Response, StackedController};
    pub use crate::driver::{insert_frame_clock, DEFAULT_FRAME_INTERVAL};
    pub use crate::geometry::{Rect, Size};
    pub use crate::gesture::{GesturePhase, GestureSample, SettleOutcome};
    pub use crate::host::{
        Direction, Host, Layer, Placement, StackDataSource, StackDelegate, StackId,
    };
    pub use crate::layout::LayerState;
    pub use crate::role::{AppearancePhase, Role};
}
