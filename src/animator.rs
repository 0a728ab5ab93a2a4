//! Transition state machine: live drag layout, appearance bookkeeping and
//! the settle animation lifecycle.
//!
//! `Idle -> DraggingForward | DraggingBackward -> Settling -> Idle`.
//! A drag may flip direction any number of times before release; a settle
//! always runs to completion.

use std::collections::VecDeque;
use std::time::Instant;

use bitflags::bitflags;

use crate::animation::{
    AdvanceResult, AnimationId, SettleAnimation, SettleRunner, Track, TrackTarget, Transition,
};
use crate::buffer::ScreenBuffer;
use crate::config::StackConfig;
use crate::geometry::{Rect, Size};
use crate::gesture::{Drag, DragDirection, SettleOutcome};
use crate::host::{Host, Layer, Placement};
use crate::layout::{self, LayerState, LayerUpdate, StackLayout};
use crate::role::{AppearancePhase, Appearances, Role};

bitflags! {
    /// What changed since the host last collected changes
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct StackChanges: u8 {
        const BEFORE    = 0b00001;
        const VISIBLE   = 0b00010;
        const AFTER     = 0b00100;
        /// The dimming scrim moved or faded
        const OVERLAY   = 0b01000;
        /// Screens were attached, detached, inserted or reordered
        const HIERARCHY = 0b10000;
    }
}

impl StackChanges {
    pub fn role(role: Role) -> Self {
        match role {
            Role::Before => StackChanges::BEFORE,
            Role::Visible => StackChanges::VISIBLE,
            Role::After => StackChanges::AFTER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    DraggingForward,
    DraggingBackward,
    Settling,
}

/// Queued after a settle's final frame has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub id: AnimationId,
    pub outcome: SettleOutcome,
}

/// Borrowed view of everything the animator drives for one operation.
pub(crate) struct Stage<'a, H: Host> {
    pub buffer: &'a mut ScreenBuffer<H::Screen>,
    pub host: &'a mut H,
    pub config: &'a StackConfig,
    pub size: Size,
    pub changes: &'a mut StackChanges,
}

pub struct Animator {
    state: TransitionState,
    appearances: Appearances,
    overlay: LayerState,
    interaction_enabled: bool,
    /// The in-flight settle, present only while its frames are running
    runner: Option<SettleRunner>,
    /// The settle awaiting completion; set for the whole Settling state
    settling: Option<Completion>,
    completions: VecDeque<Completion>,
}

impl Animator {
    pub fn new() -> Self {
        Self {
            state: TransitionState::Idle,
            appearances: Appearances::default(),
            overlay: LayerState::default(),
            interaction_enabled: true,
            runner: None,
            settling: None,
            completions: VecDeque::new(),
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TransitionState::Idle
    }

    pub fn is_settling(&self) -> bool {
        self.state == TransitionState::Settling
    }

    pub fn is_interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    pub fn appearances(&self) -> Appearances {
        self.appearances
    }

    pub fn overlay(&self) -> LayerState {
        self.overlay
    }

    /// The settle currently running, if any.
    pub fn animation(&self) -> Option<&SettleAnimation> {
        self.runner.as_ref().map(SettleRunner::animation)
    }

    /// Put the overlay at full bounds, transparent, on top of everything.
    pub(crate) fn reset_overlay<H: Host>(&mut self, stage: &mut Stage<'_, H>) {
        let state = LayerState::new(Rect::from_size(stage.size), 0.0);
        self.apply_overlay(stage, &LayerUpdate::state(state));
        stage.host.bring_overlay_to_front();
        *stage.changes |= StackChanges::HIERARCHY;
    }

    /// Start of a gesture or programmatic move: the visible screen begins
    /// leaving and the neighbors take their starting positions.
    pub(crate) fn prepare<H: Host>(&mut self, stage: &mut Stage<'_, H>) {
        if let Some(visible) = stage.buffer.get(Role::Visible) {
            if self.appearances.get(Role::Visible) == AppearancePhase::NotTransitioning {
                self.appearances.set(Role::Visible, AppearancePhase::Leaving);
                stage.host.begin_appearance(visible, false);
            }
        }

        let visible_frame = stage
            .buffer
            .state(Role::Visible)
            .map(|state| state.frame)
            .unwrap_or_else(|| Rect::from_size(stage.size));
        let prepared = layout::prepare(stage.size, stage.config, visible_frame);
        self.apply(stage, &prepared);
        stage.host.bring_overlay_to_front();
        *stage.changes |= StackChanges::HIERARCHY;

        // Zero displacement counts as forward until the first sample says otherwise
        self.state = TransitionState::DraggingForward;
        log::debug!("Transition prepared");
    }

    /// Make `direction`'s neighbor the one being approached, force-completing
    /// the appearance transition of the neighbor on the other side.
    pub(crate) fn approach<H: Host>(&mut self, stage: &mut Stage<'_, H>, direction: DragDirection) {
        let (target, other, placement) = match direction {
            DragDirection::Forward => (Role::After, Role::Before, Placement::Back),
            DragDirection::Backward => (Role::Before, Role::After, Placement::Front),
        };

        let abandoned = self.appearances.clear(other);
        if let Some(screen) = stage.buffer.get(other) {
            match abandoned {
                AppearancePhase::Entering => {
                    stage.host.begin_appearance(screen, false);
                    stage.host.end_appearance(screen);
                }
                AppearancePhase::Leaving => stage.host.end_appearance(screen),
                AppearancePhase::NotTransitioning => {}
            }
        }

        if let Some(screen) = stage.buffer.get(target) {
            if self.appearances.get(target) != AppearancePhase::Entering {
                self.appearances.set(target, AppearancePhase::Entering);
                stage.host.begin_appearance(screen, true);
            }
        }

        if stage.buffer.contains(target) && !stage.buffer.is_mounted(target) {
            stage.buffer.mount(target, placement, stage.host);
            *stage.changes |= StackChanges::HIERARCHY;
        }
    }

    /// Apply one live drag sample.
    pub(crate) fn drag<H: Host>(&mut self, stage: &mut Stage<'_, H>, drag: &Drag) {
        let state = match drag.direction {
            DragDirection::Forward => TransitionState::DraggingForward,
            DragDirection::Backward => TransitionState::DraggingBackward,
        };
        if state != self.state {
            log::debug!("{:?} -> {:?}", self.state, state);
            self.state = state;
        }

        self.approach(stage, drag.direction);
        let live = layout::drag(
            stage.size,
            stage.config,
            drag,
            stage.buffer.contains(Role::After),
            stage.buffer.contains(Role::Before),
        );
        self.apply(stage, &live);
        log::trace!("Drag diff {} progress {}", drag.diff, drag.progress);
    }

    /// Begin the terminal animation toward `outcome`.
    ///
    /// `progress` is drag distance over width and only scales the duration.
    /// Commits toward a missing neighbor are downgraded to a snap-back.
    pub(crate) fn start_settle<H: Host>(
        &mut self,
        stage: &mut Stage<'_, H>,
        outcome: SettleOutcome,
        progress: f32,
    ) -> AnimationId {
        let outcome = match outcome {
            SettleOutcome::CommitAfter if !stage.buffer.contains(Role::After) => {
                SettleOutcome::SnapBack
            }
            SettleOutcome::CommitBefore if !stage.buffer.contains(Role::Before) => {
                SettleOutcome::SnapBack
            }
            outcome => outcome,
        };

        self.interaction_enabled = false;
        stage.host.set_interaction_enabled(false);

        let config = stage.config;
        let transition = match outcome {
            SettleOutcome::CommitAfter => {
                self.approach(stage, DragDirection::Forward);
                Transition::new(
                    config.commit_duration_ms(progress),
                    config.commit_after_timing,
                )
            }
            SettleOutcome::CommitBefore => {
                self.approach(stage, DragDirection::Backward);
                Transition::new(
                    config.commit_duration_ms(progress),
                    config.commit_before_timing,
                )
            }
            SettleOutcome::SnapBack => {
                self.reverse_for_snap_back(stage);
                Transition::new(
                    config.snap_back_duration_ms(progress),
                    config.snap_back_timing,
                )
            }
        };

        let target = layout::settle_target(stage.size, config, outcome);
        let animation = SettleAnimation {
            id: AnimationId::next(),
            outcome,
            transition,
            tracks: self.tracks(stage, &target),
        };
        let id = animation.id;
        log::debug!(
            "Settling {:?} over {}ms",
            outcome,
            animation.transition.duration_ms
        );

        stage.host.animation_started(&animation);
        self.runner = Some(SettleRunner::new(animation));
        self.settling = Some(Completion { id, outcome });
        self.state = TransitionState::Settling;
        id
    }

    /// Neighbors that were entering start leaving, the visible screen
    /// starts entering again.
    fn reverse_for_snap_back<H: Host>(&mut self, stage: &mut Stage<'_, H>) {
        for role in [Role::After, Role::Before] {
            if self.appearances.get(role) == AppearancePhase::Entering {
                self.appearances.set(role, AppearancePhase::Leaving);
                if let Some(screen) = stage.buffer.get(role) {
                    stage.host.begin_appearance(screen, false);
                }
            }
        }
        if let Some(visible) = stage.buffer.get(Role::Visible) {
            if self.appearances.get(Role::Visible) != AppearancePhase::Entering {
                self.appearances.set(Role::Visible, AppearancePhase::Entering);
                stage.host.begin_appearance(visible, true);
            }
        }
    }

    fn tracks<H: Host>(&self, stage: &Stage<'_, H>, target: &StackLayout) -> Vec<Track> {
        let mut tracks: Vec<Track> = target
            .roles()
            .filter_map(|(role, update)| {
                let from = stage.buffer.state(role)?;
                Some(Track {
                    target: TrackTarget::Role(role),
                    from,
                    to: update.applied_to(from),
                })
            })
            .collect();
        if let Some(update) = target.overlay {
            tracks.push(Track {
                target: TrackTarget::Overlay,
                from: self.overlay,
                to: update.applied_to(self.overlay),
            });
        }
        tracks
    }

    /// Update phase: push the running settle's frame for `now`. A finished
    /// settle queues its completion for [`Animator::take_completion`].
    pub(crate) fn advance<H: Host>(&mut self, stage: &mut Stage<'_, H>, now: Instant) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };
        let result = runner.advance(now);
        let finished = runner.is_finished();

        if let AdvanceResult::Changed(states) = result {
            self.apply_tracks(stage, states);
        }
        if finished {
            self.queue_completion();
        }
    }

    /// Jump the running settle to its final frame.
    pub(crate) fn finish_now<H: Host>(&mut self, stage: &mut Stage<'_, H>) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };
        let states = runner.finish_now();
        self.apply_tracks(stage, states);
        self.queue_completion();
    }

    fn queue_completion(&mut self) {
        self.runner = None;
        if let Some(completion) = self.settling {
            self.completions.push_back(completion);
        }
    }

    pub(crate) fn take_completion(&mut self) -> Option<Completion> {
        self.completions.pop_front()
    }

    /// First half of completing a settle: balance every pending appearance
    /// transition. Returns false for a completion that does not belong to
    /// the current settle.
    pub(crate) fn end_settle<H: Host>(
        &mut self,
        stage: &mut Stage<'_, H>,
        completion: Completion,
    ) -> bool {
        if self.settling != Some(completion) {
            log::warn!("Ignoring stale completion for {:?}", completion.id);
            return false;
        }
        self.end_transitions(stage);
        true
    }

    /// Second half of completing a settle: back to Idle, input re-enabled.
    pub(crate) fn resume<H: Host>(&mut self, stage: &mut Stage<'_, H>) {
        self.settling = None;
        self.state = TransitionState::Idle;
        if !self.interaction_enabled {
            self.interaction_enabled = true;
            stage.host.set_interaction_enabled(true);
        }
        log::debug!("Settled");
    }

    fn end_transitions<H: Host>(&mut self, stage: &mut Stage<'_, H>) {
        for role in [Role::Visible, Role::After, Role::Before] {
            let phase = self.appearances.clear(role);
            if let (true, Some(screen)) = (phase.is_transitioning(), stage.buffer.get(role)) {
                stage.host.end_appearance(screen);
            }
        }
    }

    fn apply_tracks<H: Host>(
        &mut self,
        stage: &mut Stage<'_, H>,
        states: Vec<(TrackTarget, LayerState)>,
    ) {
        for (target, state) in states {
            let update = LayerUpdate::state(state);
            match target {
                TrackTarget::Role(role) => {
                    if stage.buffer.apply(role, &update, stage.host) {
                        *stage.changes |= StackChanges::role(role);
                    }
                }
                TrackTarget::Overlay => self.apply_overlay(stage, &update),
            }
        }
    }

    pub(crate) fn apply<H: Host>(&mut self, stage: &mut Stage<'_, H>, layout: &StackLayout) {
        for (role, update) in layout.roles() {
            if stage.buffer.apply(role, update, stage.host) {
                *stage.changes |= StackChanges::role(role);
            }
        }
        if let Some(update) = layout.overlay {
            self.apply_overlay(stage, &update);
        }
    }

    fn apply_overlay<H: Host>(&mut self, stage: &mut Stage<'_, H>, update: &LayerUpdate) {
        if let Some(frame) = update.frame {
            stage.host.set_frame(Layer::Overlay, frame);
        }
        if let Some(opacity) = update.opacity {
            stage.host.set_opacity(Layer::Overlay, opacity);
        }
        self.overlay = update.applied_to(self.overlay);
        *stage.changes |= StackChanges::OVERLAY;
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}
