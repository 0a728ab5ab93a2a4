//! Geometry and opacity for every layer, per drag sample and per settle target.
//!
//! All functions here are pure: they describe what each layer should look
//! like and leave applying it to the animator.

use crate::config::StackConfig;
use crate::geometry::{Rect, Size};
use crate::gesture::{Drag, DragDirection, SettleOutcome};
use crate::role::{Role, Roles};

/// Last known frame and opacity of a layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerState {
    pub frame: Rect,
    pub opacity: f32,
}

impl LayerState {
    pub fn new(frame: Rect, opacity: f32) -> Self {
        Self { frame, opacity }
    }

    /// Full bounds, fully opaque.
    pub fn full(size: Size) -> Self {
        Self::new(Rect::from_size(size), 1.0)
    }
}

/// A partial change to a layer; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerUpdate {
    pub frame: Option<Rect>,
    pub opacity: Option<f32>,
}

impl LayerUpdate {
    pub fn frame(frame: Rect) -> Self {
        Self {
            frame: Some(frame),
            opacity: None,
        }
    }

    pub fn opacity(opacity: f32) -> Self {
        Self {
            frame: None,
            opacity: Some(opacity),
        }
    }

    pub fn state(state: LayerState) -> Self {
        Self {
            frame: Some(state.frame),
            opacity: Some(state.opacity),
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// The state that results from applying this update to `state`.
    pub fn applied_to(&self, state: LayerState) -> LayerState {
        LayerState {
            frame: self.frame.unwrap_or(state.frame),
            opacity: self.opacity.unwrap_or(state.opacity),
        }
    }
}

/// Updates for the three roles plus the overlay scrim.
#[derive(Debug, Clone, Default)]
pub struct StackLayout {
    roles: Roles<LayerUpdate>,
    pub overlay: Option<LayerUpdate>,
}

impl StackLayout {
    pub fn role(&self, role: Role) -> Option<&LayerUpdate> {
        self.roles.get(role)
    }

    fn set(mut self, role: Role, update: LayerUpdate) -> Self {
        self.roles.insert(role, update);
        self
    }

    fn overlay(mut self, update: LayerUpdate) -> Self {
        self.overlay = Some(update);
        self
    }

    pub fn roles(&self) -> impl Iterator<Item = (Role, &LayerUpdate)> {
        self.roles.iter()
    }
}

/// Where the before screen waits: one full width to the left.
pub fn offscreen_before(size: Size) -> Rect {
    Rect::new(-size.width, 0.0, size.width, size.height)
}

/// A neighbor resting behind the visible screen, shrunk and faded.
pub fn resting_after(size: Size, config: &StackConfig) -> LayerState {
    LayerState::new(
        Rect::centered(size, config.rest_scale()),
        config.rest_opacity(),
    )
}

/// Starting positions when a transition begins, given the visible screen's
/// current frame.
pub fn prepare(size: Size, config: &StackConfig, visible_frame: Rect) -> StackLayout {
    StackLayout::default()
        .set(
            Role::Before,
            LayerUpdate::state(LayerState::new(offscreen_before(size), 1.0)),
        )
        .set(Role::After, LayerUpdate::state(resting_after(size, config)))
        .overlay(LayerUpdate::state(LayerState::new(visible_frame, 0.0)))
}

/// Live layout for one drag sample.
pub fn drag(
    size: Size,
    config: &StackConfig,
    drag: &Drag,
    has_after: bool,
    has_before: bool,
) -> StackLayout {
    match drag.direction {
        DragDirection::Forward => forward(size, config, drag, has_after),
        DragDirection::Backward => backward(size, config, drag, has_before),
    }
}

fn forward(size: Size, config: &StackConfig, drag: &Drag, has_after: bool) -> StackLayout {
    let p = drag.progress;
    let mut layout = StackLayout::default();

    let visible_frame = if has_after {
        let scale = config.rest_scale() + p * config.size_diff;
        let opacity = config.rest_opacity() + p * config.alpha_diff;
        layout = layout.set(
            Role::After,
            LayerUpdate::state(LayerState::new(Rect::centered(size, scale), opacity)),
        );
        Rect::new(-drag.diff, 0.0, size.width, size.height)
    } else {
        // Nothing to reveal: resist the drag
        Rect::new(
            -(drag.diff * config.bounce_size),
            0.0,
            size.width,
            size.height,
        )
    };

    layout
        .set(
            Role::Visible,
            LayerUpdate::frame(visible_frame).with_opacity(1.0),
        )
        .overlay(LayerUpdate::state(LayerState::new(
            visible_frame,
            p * config.alpha_diff,
        )))
        .set(Role::Before, LayerUpdate::opacity(0.0))
}

fn backward(size: Size, config: &StackConfig, drag: &Drag, has_before: bool) -> StackLayout {
    let mut layout = StackLayout::default();

    let p = if has_before {
        layout = layout.set(
            Role::Before,
            LayerUpdate::state(LayerState::new(
                Rect::new(-(size.width + drag.diff), 0.0, size.width, size.height),
                1.0,
            )),
        );
        drag.progress
    } else {
        drag.raw.abs() * (1.0 - config.bounce_size)
    };

    let visible = LayerState::new(
        Rect::centered(size, 1.0 - p * config.size_diff),
        1.0 - p * config.alpha_diff,
    );

    layout
        .set(Role::Visible, LayerUpdate::state(visible))
        .set(Role::After, LayerUpdate::opacity(0.0))
}

/// Final layout a settle animates toward.
pub fn settle_target(size: Size, config: &StackConfig, outcome: SettleOutcome) -> StackLayout {
    match outcome {
        SettleOutcome::CommitAfter => {
            let gone = offscreen_before(size);
            StackLayout::default()
                .set(Role::After, LayerUpdate::state(LayerState::full(size)))
                .set(Role::Visible, LayerUpdate::frame(gone))
                .overlay(LayerUpdate::state(LayerState::new(gone, config.alpha_diff)))
        }
        SettleOutcome::CommitBefore => StackLayout::default()
            .set(Role::Before, LayerUpdate::state(LayerState::full(size)))
            .set(Role::Visible, LayerUpdate::state(resting_after(size, config))),
        SettleOutcome::SnapBack => {
            let width = size.width * config.rest_scale();
            let height = size.height * config.rest_scale();
            // Whole-unit inset keeps the resting neighbor on the pixel grid
            let rest = Rect::new(
                (size.width - width).ceil() / 2.0,
                (size.height - height).ceil() / 2.0,
                width,
                height,
            );
            StackLayout::default()
                .set(Role::Visible, LayerUpdate::state(LayerState::full(size)))
                .overlay(LayerUpdate::state(LayerState::new(
                    Rect::from_size(size),
                    0.0,
                )))
                .set(
                    Role::After,
                    LayerUpdate::state(LayerState::new(rest, config.rest_opacity())),
                )
                .set(
                    Role::Before,
                    LayerUpdate::state(LayerState::new(offscreen_before(size), 1.0)),
                )
        }
    }
}
