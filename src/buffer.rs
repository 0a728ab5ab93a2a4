//! The three-screen buffer: which screen holds which role, and the
//! parent/child attachment lifecycle of each.

use std::fmt;

use crate::geometry::Size;
use crate::host::{Host, Layer, Placement, StackDataSource, StackId};
use crate::layout::{LayerState, LayerUpdate};
use crate::role::{Role, Roles};

#[derive(Debug)]
struct Slot<S> {
    screen: S,
    /// View inserted into the container hierarchy
    mounted: bool,
    /// Last frame and opacity pushed to the host
    state: LayerState,
}

impl<S> Slot<S> {
    fn new(screen: S) -> Self {
        Self {
            screen,
            mounted: false,
            state: LayerState::default(),
        }
    }
}

/// Owns up to three screens, one per [`Role`]. A screen never holds two
/// roles at once.
#[derive(Debug)]
pub struct ScreenBuffer<S> {
    slots: Roles<Slot<S>>,
}

impl<S: Clone + PartialEq + fmt::Debug> ScreenBuffer<S> {
    pub fn new() -> Self {
        Self {
            slots: Roles::new(),
        }
    }

    pub fn get(&self, role: Role) -> Option<&S> {
        self.slots.get(role).map(|slot| &slot.screen)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.slots.contains(role)
    }

    pub fn is_mounted(&self, role: Role) -> bool {
        self.slots.get(role).is_some_and(|slot| slot.mounted)
    }

    pub fn state(&self, role: Role) -> Option<LayerState> {
        self.slots.get(role).map(|slot| slot.state)
    }

    pub fn role_of(&self, screen: &S) -> Option<Role> {
        self.slots.find(|slot| slot.screen == *screen)
    }

    /// Number of occupied roles.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fill an empty neighbor role from the data source.
    ///
    /// No-op when the role is occupied, there is no visible screen to ask
    /// about, or the data source has nothing in that direction. Returns true
    /// when a screen was attached.
    pub fn ensure<H, D>(
        &mut self,
        role: Role,
        host: &mut H,
        source: Option<&mut D>,
        stack: StackId,
    ) -> bool
    where
        H: Host<Screen = S>,
        D: StackDataSource<S> + ?Sized,
    {
        if self.slots.contains(role) {
            return false;
        }
        let (Some(visible), Some(source)) = (self.get(Role::Visible), source) else {
            return false;
        };

        let screen = match role {
            Role::Before => source.screen_before(stack, visible),
            Role::After => source.screen_after(stack, visible),
            Role::Visible => return false,
        };
        let Some(screen) = screen else {
            log::debug!("No {:?} screen for {:?}", role, visible);
            return false;
        };

        if let Some(existing) = self.role_of(&screen) {
            log::warn!(
                "Data source returned {:?} for {:?}, but it already holds {:?}",
                screen,
                role,
                existing
            );
            return false;
        }

        host.add_child(&screen);
        log::debug!("Attached {:?} as {:?}", screen, role);
        self.slots.insert(role, Slot::new(screen));
        true
    }

    /// Replace the visible screen outside of any transition.
    ///
    /// A screen currently held as a neighbor is moved rather than attached
    /// twice.
    pub fn set_visible<H: Host<Screen = S>>(&mut self, screen: S, size: Size, host: &mut H) {
        if self.get(Role::Visible) == Some(&screen) {
            return;
        }

        let reused = match self.role_of(&screen) {
            Some(role) => self.slots.take(role),
            None => None,
        };
        self.detach(Role::Visible, host);

        let mut slot = match reused {
            Some(slot) => slot,
            None => {
                host.add_child(&screen);
                Slot::new(screen)
            }
        };

        let state = LayerState::full(size);
        host.set_frame(Layer::Screen(&slot.screen), state.frame);
        host.set_opacity(Layer::Screen(&slot.screen), state.opacity);
        slot.state = state;
        if !slot.mounted {
            host.insert_view(&slot.screen, Placement::Front);
            slot.mounted = true;
        }

        log::debug!("Visible screen is now {:?}", slot.screen);
        self.slots.insert(Role::Visible, slot);
    }

    /// Insert the view of `role` into the hierarchy if it is not there yet.
    pub fn mount<H: Host<Screen = S>>(&mut self, role: Role, placement: Placement, host: &mut H) {
        if let Some(slot) = self.slots.get_mut(role) {
            if !slot.mounted {
                host.insert_view(&slot.screen, placement);
                slot.mounted = true;
            }
        }
    }

    /// Push a layer update for `role` to the host. Returns false if the role
    /// is empty.
    pub fn apply<H: Host<Screen = S>>(
        &mut self,
        role: Role,
        update: &LayerUpdate,
        host: &mut H,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(role) else {
            return false;
        };
        if let Some(frame) = update.frame {
            host.set_frame(Layer::Screen(&slot.screen), frame);
        }
        if let Some(opacity) = update.opacity {
            host.set_opacity(Layer::Screen(&slot.screen), opacity);
        }
        slot.state = update.applied_to(slot.state);
        true
    }

    /// Rotate roles after a commit toward `toward`.
    ///
    /// The far-side neighbor is detached, the visible screen moves to the far
    /// side, the `toward` neighbor becomes visible and the emptied role is
    /// refilled from the data source.
    pub fn promote<H, D>(
        &mut self,
        toward: Role,
        host: &mut H,
        source: Option<&mut D>,
        stack: StackId,
    ) -> bool
    where
        H: Host<Screen = S>,
        D: StackDataSource<S> + ?Sized,
    {
        if toward == Role::Visible || !self.slots.contains(toward) {
            return false;
        }
        let far = toward.opposite();

        self.detach(far, host);
        if let Some(mut previous) = self.slots.take(Role::Visible) {
            if previous.mounted {
                host.remove_view(&previous.screen);
                previous.mounted = false;
            }
            self.slots.insert(far, previous);
        }
        if let Some(next) = self.slots.take(toward) {
            self.slots.insert(Role::Visible, next);
        }

        self.ensure(toward, host, source, stack);
        true
    }

    /// Drop the screen in `role` and ask the data source again.
    pub fn refresh<H, D>(&mut self, role: Role, host: &mut H, source: Option<&mut D>, stack: StackId)
    where
        H: Host<Screen = S>,
        D: StackDataSource<S> + ?Sized,
    {
        self.detach(role, host);
        self.ensure(role, host, source, stack);
    }

    /// Detach and release the screen in `role`.
    pub fn detach<H: Host<Screen = S>>(&mut self, role: Role, host: &mut H) -> Option<S> {
        let slot = self.slots.take(role)?;
        host.remove_child(&slot.screen);
        log::debug!("Detached {:?} from {:?}", slot.screen, role);
        Some(slot.screen)
    }
}

impl<S: Clone + PartialEq + fmt::Debug> Default for ScreenBuffer<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Add(u32),
        Remove(u32),
        Insert(u32, Placement),
        RemoveView(u32),
        Frame(Option<u32>, Rect),
        Opacity(Option<u32>, f32),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    fn layer_id(layer: Layer<'_, u32>) -> Option<u32> {
        match layer {
            Layer::Screen(screen) => Some(*screen),
            Layer::Overlay => None,
        }
    }

    impl Host for Recorder {
        type Screen = u32;

        fn add_child(&mut self, screen: &u32) {
            self.calls.push(Call::Add(*screen));
        }
        fn remove_child(&mut self, screen: &u32) {
            self.calls.push(Call::Remove(*screen));
        }
        fn insert_view(&mut self, screen: &u32, placement: Placement) {
            self.calls.push(Call::Insert(*screen, placement));
        }
        fn remove_view(&mut self, screen: &u32) {
            self.calls.push(Call::RemoveView(*screen));
        }
        fn bring_overlay_to_front(&mut self) {}
        fn set_frame(&mut self, layer: Layer<'_, u32>, frame: Rect) {
            self.calls.push(Call::Frame(layer_id(layer), frame));
        }
        fn set_opacity(&mut self, layer: Layer<'_, u32>, opacity: f32) {
            self.calls.push(Call::Opacity(layer_id(layer), opacity));
        }
        fn begin_appearance(&mut self, _screen: &u32, _appearing: bool) {}
        fn end_appearance(&mut self, _screen: &u32) {}
        fn set_interaction_enabled(&mut self, _enabled: bool) {}
    }

    /// Screens are integers; neighbors are +/- 1 within `min..=max`.
    struct Deck {
        min: u32,
        max: u32,
        requests: usize,
    }

    impl StackDataSource<u32> for Deck {
        fn screen_before(&mut self, _stack: StackId, reference: &u32) -> Option<u32> {
            self.requests += 1;
            (*reference > self.min).then(|| reference - 1)
        }
        fn screen_after(&mut self, _stack: StackId, reference: &u32) -> Option<u32> {
            self.requests += 1;
            (*reference < self.max).then(|| reference + 1)
        }
    }

    const SIZE: Size = Size {
        width: 100.0,
        height: 200.0,
    };

    fn loaded(visible: u32, deck: &mut Deck, host: &mut Recorder) -> ScreenBuffer<u32> {
        let stack = StackId::next();
        let mut buffer = ScreenBuffer::new();
        buffer.set_visible(visible, SIZE, host);
        buffer.ensure(Role::Before, host, Some(&mut *deck), stack);
        buffer.ensure(Role::After, host, Some(&mut *deck), stack);
        host.calls.clear();
        buffer
    }

    #[test]
    fn test_set_visible_attaches_full_bounds() {
        let mut host = Recorder::default();
        let mut buffer = ScreenBuffer::new();
        buffer.set_visible(7, SIZE, &mut host);

        assert_eq!(buffer.get(Role::Visible), Some(&7));
        assert!(buffer.is_mounted(Role::Visible));
        assert_eq!(
            host.calls,
            vec![
                Call::Add(7),
                Call::Frame(Some(7), Rect::from_size(SIZE)),
                Call::Opacity(Some(7), 1.0),
                Call::Insert(7, Placement::Front),
            ]
        );
    }

    #[test]
    fn test_set_visible_replaces_previous() {
        let mut host = Recorder::default();
        let mut buffer = ScreenBuffer::new();
        buffer.set_visible(1, SIZE, &mut host);
        host.calls.clear();

        buffer.set_visible(2, SIZE, &mut host);
        assert_eq!(host.calls[0], Call::Remove(1));
        assert_eq!(host.calls[1], Call::Add(2));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_set_visible_moves_neighbor_instead_of_duplicating() {
        let mut host = Recorder::default();
        let mut deck = Deck { min: 0, max: 10, requests: 0 };
        let mut buffer = loaded(5, &mut deck, &mut host);

        buffer.set_visible(6, SIZE, &mut host);
        assert_eq!(buffer.get(Role::Visible), Some(&6));
        assert_eq!(buffer.get(Role::After), None);
        assert_eq!(buffer.get(Role::Before), Some(&4));
        assert!(!host.calls.contains(&Call::Add(6)));
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut host = Recorder::default();
        let mut deck = Deck { min: 0, max: 10, requests: 0 };
        let mut buffer = loaded(5, &mut deck, &mut host);
        let requests = deck.requests;

        assert!(!buffer.ensure(Role::After, &mut host, Some(&mut deck), StackId::next()));
        assert_eq!(deck.requests, requests);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_ensure_at_edge_leaves_role_empty() {
        let mut host = Recorder::default();
        let mut deck = Deck { min: 5, max: 5, requests: 0 };
        let buffer = loaded(5, &mut deck, &mut host);

        assert_eq!(buffer.len(), 1);
        assert!(!buffer.contains(Role::Before));
        assert!(!buffer.contains(Role::After));
    }

    #[test]
    fn test_ensure_without_visible_does_nothing() {
        let mut host = Recorder::default();
        let mut deck = Deck { min: 0, max: 10, requests: 0 };
        let mut buffer: ScreenBuffer<u32> = ScreenBuffer::new();

        assert!(!buffer.ensure(Role::After, &mut host, Some(&mut deck), StackId::next()));
        assert_eq!(deck.requests, 0);
    }

    #[test]
    fn test_promote_after_rotates_roles() {
        let mut host = Recorder::default();
        let mut deck = Deck { min: 0, max: 10, requests: 0 };
        let mut buffer = loaded(5, &mut deck, &mut host);

        assert!(buffer.promote(Role::After, &mut host, Some(&mut deck), StackId::next()));
        assert_eq!(buffer.get(Role::Before), Some(&5));
        assert_eq!(buffer.get(Role::Visible), Some(&6));
        assert_eq!(buffer.get(Role::After), Some(&7));
        assert_eq!(
            host.calls,
            vec![Call::Remove(4), Call::RemoveView(5), Call::Add(7)]
        );
    }

    #[test]
    fn test_promote_before_at_edge() {
        let mut host = Recorder::default();
        let mut deck = Deck { min: 4, max: 10, requests: 0 };
        let mut buffer = loaded(5, &mut deck, &mut host);

        assert!(buffer.promote(Role::Before, &mut host, Some(&mut deck), StackId::next()));
        assert_eq!(buffer.get(Role::Visible), Some(&4));
        assert_eq!(buffer.get(Role::After), Some(&5));
        assert_eq!(buffer.get(Role::Before), None);
        assert!(buffer.len() <= 3);
    }

    #[test]
    fn test_promote_toward_empty_role_is_rejected() {
        let mut host = Recorder::default();
        let mut deck = Deck { min: 5, max: 5, requests: 0 };
        let mut buffer = loaded(5, &mut deck, &mut host);

        assert!(!buffer.promote(Role::After, &mut host, Some(&mut deck), StackId::next()));
        assert_eq!(buffer.get(Role::Visible), Some(&5));
    }

    #[test]
    fn test_refresh_requests_again() {
        let mut host = Recorder::default();
        let mut deck = Deck { min: 0, max: 10, requests: 0 };
        let mut buffer = loaded(5, &mut deck, &mut host);

        buffer.refresh(Role::After, &mut host, Some(&mut deck), StackId::next());
        assert_eq!(host.calls, vec![Call::Remove(6), Call::Add(6)]);
        assert_eq!(buffer.get(Role::After), Some(&6));
    }

    #[test]
    fn test_apply_tracks_state() {
        let mut host = Recorder::default();
        let mut deck = Deck { min: 0, max: 10, requests: 0 };
        let mut buffer = loaded(5, &mut deck, &mut host);

        assert!(buffer.apply(Role::After, &LayerUpdate::opacity(0.5), &mut host));
        assert_eq!(buffer.state(Role::After).unwrap().opacity, 0.5);

        buffer.detach(Role::After, &mut host);
        assert!(!buffer.apply(Role::After, &LayerUpdate::opacity(0.5), &mut host));
    }

    #[test]
    fn test_mount_once() {
        let mut host = Recorder::default();
        let mut deck = Deck { min: 0, max: 10, requests: 0 };
        let mut buffer = loaded(5, &mut deck, &mut host);

        buffer.mount(Role::After, Placement::Back, &mut host);
        buffer.mount(Role::After, Placement::Back, &mut host);
        assert_eq!(host.calls, vec![Call::Insert(6, Placement::Back)]);
    }
}
