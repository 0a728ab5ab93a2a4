#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use stacked::prelude::*;

pub const SIZE: Size = Size {
    width: 300.0,
    height: 600.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Screen(u32),
    Overlay,
}

impl Target {
    fn from_layer(layer: Layer<'_, u32>) -> Self {
        match layer {
            Layer::Screen(screen) => Target::Screen(*screen),
            Layer::Overlay => Target::Overlay,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddChild(u32),
    RemoveChild(u32),
    InsertView(u32, Placement),
    RemoveView(u32),
    OverlayToFront,
    Frame(Target, Rect),
    Opacity(Target, f32),
    Begin(u32, bool),
    End(u32),
    Interaction(bool),
    AnimationStarted(f32),
}

/// Records every command and keeps a minimal model of the host's state.
#[derive(Default)]
pub struct MockHost {
    pub commands: Vec<Command>,
    pub children: Vec<u32>,
    pub frames: HashMap<u32, Rect>,
    pub opacities: HashMap<u32, f32>,
    pub overlay_frame: Option<Rect>,
    pub overlay_opacity: Option<f32>,
    /// Screens with an appearance transition begun but not ended
    pub open_appearances: HashMap<u32, bool>,
    pub appearance_errors: Vec<String>,
    pub last_animation: Option<AnimationId>,
    pub last_timing: Option<TimingFunction>,
    pub interaction_enabled: Option<bool>,
}

impl MockHost {
    pub fn is_balanced(&self) -> bool {
        self.open_appearances.is_empty() && self.appearance_errors.is_empty()
    }

    pub fn count(&self, command: &Command) -> usize {
        self.commands.iter().filter(|c| *c == command).count()
    }

    pub fn durations(&self) -> Vec<f32> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::AnimationStarted(duration) => Some(*duration),
                _ => None,
            })
            .collect()
    }
}

impl Host for MockHost {
    type Screen = u32;

    fn add_child(&mut self, screen: &u32) {
        assert!(!self.children.contains(screen), "{} attached twice", screen);
        self.children.push(*screen);
        self.commands.push(Command::AddChild(*screen));
    }

    fn remove_child(&mut self, screen: &u32) {
        self.children.retain(|child| child != screen);
        self.commands.push(Command::RemoveChild(*screen));
    }

    fn insert_view(&mut self, screen: &u32, placement: Placement) {
        self.commands.push(Command::InsertView(*screen, placement));
    }

    fn remove_view(&mut self, screen: &u32) {
        self.commands.push(Command::RemoveView(*screen));
    }

    fn bring_overlay_to_front(&mut self) {
        self.commands.push(Command::OverlayToFront);
    }

    fn set_frame(&mut self, layer: Layer<'_, u32>, frame: Rect) {
        let target = Target::from_layer(layer);
        match target {
            Target::Screen(screen) => {
                self.frames.insert(screen, frame);
            }
            Target::Overlay => self.overlay_frame = Some(frame),
        }
        self.commands.push(Command::Frame(target, frame));
    }

    fn set_opacity(&mut self, layer: Layer<'_, u32>, opacity: f32) {
        let target = Target::from_layer(layer);
        match target {
            Target::Screen(screen) => {
                self.opacities.insert(screen, opacity);
            }
            Target::Overlay => self.overlay_opacity = Some(opacity),
        }
        self.commands.push(Command::Opacity(target, opacity));
    }

    fn begin_appearance(&mut self, screen: &u32, appearing: bool) {
        // A second begin before the end reverses the transition
        self.open_appearances.insert(*screen, appearing);
        self.commands.push(Command::Begin(*screen, appearing));
    }

    fn end_appearance(&mut self, screen: &u32) {
        if self.open_appearances.remove(screen).is_none() {
            self.appearance_errors
                .push(format!("end without begin for {}", screen));
        }
        self.commands.push(Command::End(*screen));
    }

    fn set_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = Some(enabled);
        self.commands.push(Command::Interaction(enabled));
    }

    fn animation_started(&mut self, animation: &SettleAnimation) {
        self.last_animation = Some(animation.id);
        self.last_timing = Some(animation.transition.timing);
        self.commands
            .push(Command::AnimationStarted(animation.transition.duration_ms));
    }
}

/// Screens are page numbers; neighbors are +/- 1 within `min..=max`.
pub struct Deck {
    pub min: u32,
    pub max: u32,
}

impl StackDataSource<u32> for Deck {
    fn screen_before(&mut self, _stack: StackId, reference: &u32) -> Option<u32> {
        (*reference > self.min).then(|| reference - 1)
    }

    fn screen_after(&mut self, _stack: StackId, reference: &u32) -> Option<u32> {
        (*reference < self.max).then(|| reference + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Will(u32),
    Finished {
        to: u32,
        from: Option<u32>,
        direction: Direction,
    },
}

pub type Events = Rc<RefCell<Vec<Event>>>;

pub struct Recorder {
    pub events: Events,
}

impl StackDelegate<u32> for Recorder {
    fn will_transition(&mut self, _stack: StackId, from: &u32) {
        self.events.borrow_mut().push(Event::Will(*from));
    }

    fn did_finish_animating(
        &mut self,
        _stack: StackId,
        to: &u32,
        from: Option<&u32>,
        direction: Direction,
    ) {
        self.events.borrow_mut().push(Event::Finished {
            to: *to,
            from: from.copied(),
            direction,
        });
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A loaded stack over pages `min..=max` showing `start`.
pub fn stack(min: u32, max: u32, start: u32) -> (StackedController<MockHost>, Events) {
    stack_with_config(min, max, start, StackConfig::default())
}

pub fn stack_with_config(
    min: u32,
    max: u32,
    start: u32,
    config: StackConfig,
) -> (StackedController<MockHost>, Events) {
    init_logging();
    let events = Events::default();
    let mut stack = StackedController::new(MockHost::default(), SIZE)
        .config(config)
        .data_source(Deck { min, max })
        .delegate(Recorder {
            events: events.clone(),
        })
        .initial_screen(start);
    stack.load();
    (stack, events)
}

/// Drive the running settle to completion.
pub fn run_to_idle(stack: &mut StackedController<MockHost>) -> StackChanges {
    let start = Instant::now();
    let mut changes = stack.tick(start);
    changes |= stack.tick(start + Duration::from_secs(2));
    changes
}

/// Began, one change sample, then release.
pub fn swipe(
    stack: &mut StackedController<MockHost>,
    translation_x: f32,
    velocity_x: f32,
) -> Response {
    stack.handle_gesture(GestureSample::began());
    stack.handle_gesture(GestureSample::changed(translation_x));
    stack.handle_gesture(GestureSample::ended(translation_x, velocity_x))
}

pub fn roles(stack: &StackedController<MockHost>) -> (Option<u32>, Option<u32>, Option<u32>) {
    (
        stack.before().copied(),
        stack.visible().copied(),
        stack.after().copied(),
    )
}
