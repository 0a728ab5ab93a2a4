//! The public control surface of a card stack.

use std::time::Instant;

use crate::animation::AnimationId;
use crate::animator::{Animator, Completion, Stage, StackChanges, TransitionState};
use crate::buffer::ScreenBuffer;
use crate::config::StackConfig;
use crate::geometry::{Rect, Size};
use crate::gesture::{self, Drag, DragDirection, GesturePhase, GestureSample, SettleOutcome};
use crate::host::{Direction, Host, StackDataSource, StackDelegate, StackId};
use crate::layout::{LayerState, LayerUpdate};
use crate::role::{Appearances, Role};

/// Whether a call was acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ignored,
    Handled,
}

impl Response {
    pub fn is_handled(self) -> bool {
        self == Response::Handled
    }
}

/// A horizontally swipeable stack holding one visible screen between a
/// lazily loaded before and after screen.
///
/// The controller is driven entirely from the host's event thread: feed it
/// drag samples with [`StackedController::handle_gesture`] and frame
/// timestamps with [`StackedController::tick`].
///
/// # Example
/// ```ignore
/// let mut stack = StackedController::new(host, Size::new(390.0, 844.0))
///     .data_source(pages)
///     .delegate(observer)
///     .initial_screen(first_page);
/// stack.load();
///
/// // From the drag recognizer
/// stack.handle_gesture(GestureSample::began());
/// stack.handle_gesture(GestureSample::changed(-140.0));
/// stack.handle_gesture(GestureSample::ended(-140.0, -80.0));
///
/// // Every frame
/// let changes = stack.tick(Instant::now());
/// ```
pub struct StackedController<H: Host> {
    id: StackId,
    config: StackConfig,
    size: Size,
    host: H,
    buffer: ScreenBuffer<H::Screen>,
    animator: Animator,
    data_source: Option<Box<dyn StackDataSource<H::Screen>>>,
    delegate: Option<Box<dyn StackDelegate<H::Screen>>>,
    initial_screen: Option<H::Screen>,
    loaded: bool,
    changes: StackChanges,
}

impl<H: Host> StackedController<H> {
    pub fn new(host: H, size: Size) -> Self {
        Self {
            id: StackId::next(),
            config: StackConfig::default(),
            size,
            host,
            buffer: ScreenBuffer::new(),
            animator: Animator::new(),
            data_source: None,
            delegate: None,
            initial_screen: None,
            loaded: false,
            changes: StackChanges::empty(),
        }
    }

    pub fn config(mut self, config: StackConfig) -> Self {
        self.config = config;
        self
    }

    pub fn data_source<D: StackDataSource<H::Screen> + 'static>(mut self, source: D) -> Self {
        self.data_source = Some(Box::new(source));
        self
    }

    pub fn delegate<D: StackDelegate<H::Screen> + 'static>(mut self, delegate: D) -> Self {
        self.delegate = Some(Box::new(delegate));
        self
    }

    /// The screen shown when the stack loads.
    pub fn initial_screen(mut self, screen: H::Screen) -> Self {
        self.initial_screen = Some(screen);
        self
    }

    pub fn set_data_source(&mut self, source: Option<Box<dyn StackDataSource<H::Screen>>>) {
        self.data_source = source;
    }

    pub fn set_delegate(&mut self, delegate: Option<Box<dyn StackDelegate<H::Screen>>>) {
        self.delegate = delegate;
    }

    pub fn id(&self) -> StackId {
        self.id
    }

    pub fn state(&self) -> TransitionState {
        self.animator.state()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn stack_config(&self) -> &StackConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_interaction_enabled(&self) -> bool {
        self.animator.is_interaction_enabled()
    }

    pub fn screen(&self, role: Role) -> Option<&H::Screen> {
        self.buffer.get(role)
    }

    pub fn visible(&self) -> Option<&H::Screen> {
        self.buffer.get(Role::Visible)
    }

    pub fn before(&self) -> Option<&H::Screen> {
        self.buffer.get(Role::Before)
    }

    pub fn after(&self) -> Option<&H::Screen> {
        self.buffer.get(Role::After)
    }

    /// Last frame and opacity pushed to the host for `role`.
    pub fn layer(&self, role: Role) -> Option<LayerState> {
        self.buffer.state(role)
    }

    pub fn overlay(&self) -> LayerState {
        self.animator.overlay()
    }

    pub fn appearances(&self) -> Appearances {
        self.animator.appearances()
    }

    /// Collect and clear the changes accumulated since the last call.
    pub fn take_changes(&mut self) -> StackChanges {
        std::mem::replace(&mut self.changes, StackChanges::empty())
    }

    /// Attach the initial screen, request its neighbors and set up the
    /// overlay. Only the first call has any effect.
    pub fn load(&mut self) -> Response {
        if self.loaded {
            return Response::Ignored;
        }
        self.loaded = true;

        if let Some(screen) = self.initial_screen.take() {
            self.buffer.set_visible(screen, self.size, &mut self.host);
            self.changes |= StackChanges::VISIBLE | StackChanges::HIERARCHY;
            self.ensure(Role::Before);
            self.ensure(Role::After);
        }

        let (animator, mut stage) = self.split();
        animator.reset_overlay(&mut stage);
        log::debug!("Stack {:?} loaded with {} screens", self.id, self.buffer.len());
        Response::Handled
    }

    /// Feed one sample from the host's drag recognizer.
    pub fn handle_gesture(&mut self, sample: GestureSample) -> Response {
        if self.animator.is_settling() {
            log::warn!("Ignoring {:?} while settling", sample.phase);
            return Response::Ignored;
        }
        if !self.loaded || self.size.is_empty() || self.buffer.get(Role::Visible).is_none() {
            return Response::Ignored;
        }

        if sample.phase.is_release() {
            return self.release(&sample);
        }
        match (sample.phase, self.animator.is_idle()) {
            (GesturePhase::Began, true) => {
                self.begin_transition();
                Response::Handled
            }
            (GesturePhase::Changed, false) => {
                let drag = self.drag(sample.translation_x);
                let (animator, mut stage) = self.split();
                animator.drag(&mut stage, &drag);
                Response::Handled
            }
            // A repeated Began mid-drag, or a Changed with no drag in progress
            _ => Response::Ignored,
        }
    }

    fn release(&mut self, sample: &GestureSample) -> Response {
        if self.animator.is_idle() {
            return Response::Ignored;
        }
        let drag = self.drag(sample.translation_x);
        let outcome = gesture::decide(
            &drag,
            sample.velocity_x,
            self.size.width,
            self.buffer.contains(Role::After),
            self.buffer.contains(Role::Before),
            &self.config,
        );
        log::debug!(
            "Released at diff {} velocity {}: {:?}",
            drag.diff,
            sample.velocity_x,
            outcome
        );
        // Duration scales with distance, not the eased layout progress
        self.start_settle(outcome, drag.raw.abs());
        Response::Handled
    }

    /// Animate (or jump) to the after screen without a gesture.
    pub fn move_after(&mut self, animated: bool) -> Response {
        self.move_to(SettleOutcome::CommitAfter, animated)
    }

    /// Animate (or jump) to the before screen without a gesture.
    pub fn move_before(&mut self, animated: bool) -> Response {
        self.move_to(SettleOutcome::CommitBefore, animated)
    }

    fn move_to(&mut self, outcome: SettleOutcome, animated: bool) -> Response {
        if !self.animator.is_idle() {
            log::warn!("Ignoring {:?} move while {:?}", outcome, self.state());
            return Response::Ignored;
        }
        let (target, direction) = match outcome {
            SettleOutcome::CommitAfter => (Role::After, DragDirection::Forward),
            SettleOutcome::CommitBefore => (Role::Before, DragDirection::Backward),
            SettleOutcome::SnapBack => return Response::Ignored,
        };
        if !self.loaded || self.size.is_empty() {
            return Response::Ignored;
        }

        self.ensure(target);
        if !self.buffer.contains(target) {
            return Response::Ignored;
        }

        self.begin_transition();
        {
            let (animator, mut stage) = self.split();
            animator.approach(&mut stage, direction);
        }
        self.start_settle(outcome, 0.0);

        if !animated {
            let (animator, mut stage) = self.split();
            animator.finish_now(&mut stage);
            self.drain_completions();
        }
        Response::Handled
    }

    /// Replace the visible screen outside of any transition.
    pub fn set_visible(&mut self, screen: H::Screen) -> Response {
        if !self.animator.is_idle() {
            log::warn!("Ignoring set_visible while {:?}", self.state());
            return Response::Ignored;
        }
        self.buffer.set_visible(screen, self.size, &mut self.host);
        self.changes |= StackChanges::VISIBLE | StackChanges::HIERARCHY;
        Response::Handled
    }

    /// Drop the after screen and ask the data source for it again.
    pub fn refresh_after(&mut self) -> Response {
        self.refresh(Role::After)
    }

    /// Drop the before screen and ask the data source for it again.
    pub fn refresh_before(&mut self) -> Response {
        self.refresh(Role::Before)
    }

    fn refresh(&mut self, role: Role) -> Response {
        if !self.animator.is_idle() {
            log::warn!("Ignoring refresh of {:?} while {:?}", role, self.state());
            return Response::Ignored;
        }
        self.buffer
            .refresh(role, &mut self.host, self.data_source.as_deref_mut(), self.id);
        self.changes |= StackChanges::HIERARCHY | StackChanges::role(role);
        Response::Handled
    }

    /// The container changed size. Only applied while idle.
    pub fn resize(&mut self, size: Size) -> Response {
        if !self.animator.is_idle() {
            return Response::Ignored;
        }
        self.size = size;
        self.buffer.apply(
            Role::Visible,
            &LayerUpdate::frame(Rect::from_size(size)),
            &mut self.host,
        );
        self.changes |= StackChanges::VISIBLE;
        if self.loaded {
            let (animator, mut stage) = self.split();
            animator.reset_overlay(&mut stage);
        }
        Response::Handled
    }

    /// Advance the running settle to `now`, then process any settle that
    /// finished. Returns everything that changed since changes were last
    /// collected.
    pub fn tick(&mut self, now: Instant) -> StackChanges {
        {
            let (animator, mut stage) = self.split();
            animator.advance(&mut stage, now);
        }
        self.drain_completions();
        self.take_changes()
    }

    /// Complete the settle `id` immediately, for hosts that ran the
    /// animation natively.
    pub fn finish_settle(&mut self, id: AnimationId) -> Response {
        if self.animator.animation().map(|animation| animation.id) != Some(id) {
            return Response::Ignored;
        }
        {
            let (animator, mut stage) = self.split();
            animator.finish_now(&mut stage);
        }
        self.drain_completions();
        Response::Handled
    }

    fn drag(&self, translation_x: f32) -> Drag {
        Drag::from_translation(translation_x, self.size.width, &self.config)
    }

    fn split(&mut self) -> (&mut Animator, Stage<'_, H>) {
        (
            &mut self.animator,
            Stage {
                buffer: &mut self.buffer,
                host: &mut self.host,
                config: &self.config,
                size: self.size,
                changes: &mut self.changes,
            },
        )
    }

    fn ensure(&mut self, role: Role) {
        let attached = self.buffer.ensure(
            role,
            &mut self.host,
            self.data_source.as_deref_mut(),
            self.id,
        );
        if attached {
            self.changes |= StackChanges::HIERARCHY;
        }
    }

    fn begin_transition(&mut self) {
        if let (Some(delegate), Some(visible)) =
            (self.delegate.as_deref_mut(), self.buffer.get(Role::Visible))
        {
            delegate.will_transition(self.id, visible);
        }
        self.ensure(Role::After);
        self.ensure(Role::Before);

        let (animator, mut stage) = self.split();
        animator.prepare(&mut stage);
    }

    fn start_settle(&mut self, outcome: SettleOutcome, progress: f32) {
        let (animator, mut stage) = self.split();
        animator.start_settle(&mut stage, outcome, progress);
    }

    fn drain_completions(&mut self) {
        while let Some(completion) = self.animator.take_completion() {
            self.complete(completion);
        }
    }

    fn complete(&mut self, completion: Completion) {
        {
            let (animator, mut stage) = self.split();
            if !animator.end_settle(&mut stage, completion) {
                return;
            }
        }

        let previous = self.buffer.get(Role::Visible).cloned();
        let toward = match completion.outcome {
            SettleOutcome::CommitAfter => Some(Role::After),
            SettleOutcome::CommitBefore => Some(Role::Before),
            SettleOutcome::SnapBack => None,
        };
        let promoted = toward.is_some_and(|role| {
            self.buffer
                .promote(role, &mut self.host, self.data_source.as_deref_mut(), self.id)
        });
        if promoted {
            self.changes |= StackChanges::all();
        }

        {
            let (animator, mut stage) = self.split();
            animator.resume(&mut stage);
        }

        let direction = if promoted {
            completion.outcome.direction()
        } else {
            Direction::Visible
        };
        let from = if promoted { previous.as_ref() } else { None };
        log::debug!("Finished {:?} settle", direction);

        if let (Some(delegate), Some(to)) =
            (self.delegate.as_deref_mut(), self.buffer.get(Role::Visible))
        {
            delegate.did_finish_animating(self.id, to, from, direction);
        }
    }
}
