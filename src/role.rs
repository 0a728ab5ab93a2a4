//! The three slots a screen can occupy, and per-slot appearance bookkeeping.

/// One of the three slots in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Before,
    Visible,
    After,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Before, Role::Visible, Role::After];

    fn index(self) -> usize {
        match self {
            Role::Before => 0,
            Role::Visible => 1,
            Role::After => 2,
        }
    }

    /// The neighbor on the other side of the visible screen.
    pub fn opposite(self) -> Role {
        match self {
            Role::Before => Role::After,
            Role::Visible => Role::Visible,
            Role::After => Role::Before,
        }
    }
}

/// Fixed-size `{Before, Visible, After} -> Option<T>` mapping.
#[derive(Debug, Clone)]
pub struct Roles<T> {
    slots: [Option<T>; 3],
}

impl<T> Roles<T> {
    pub fn new() -> Self {
        Self {
            slots: [None, None, None],
        }
    }

    pub fn get(&self, role: Role) -> Option<&T> {
        self.slots[role.index()].as_ref()
    }

    pub fn get_mut(&mut self, role: Role) -> Option<&mut T> {
        self.slots[role.index()].as_mut()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.slots[role.index()].is_some()
    }

    /// Store `value` in `role`, returning whatever was there.
    pub fn insert(&mut self, role: Role, value: T) -> Option<T> {
        self.slots[role.index()].replace(value)
    }

    pub fn take(&mut self, role: Role) -> Option<T> {
        self.slots[role.index()].take()
    }

    /// First role whose value matches `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<Role> {
        Role::ALL
            .into_iter()
            .find(|role| self.get(*role).is_some_and(&mut predicate))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        Role::ALL
            .into_iter()
            .filter_map(move |role| self.get(role).map(|value| (role, value)))
    }
}

impl<T> Default for Roles<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a screen stands in its begin/end appearance pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppearancePhase {
    #[default]
    NotTransitioning,
    /// `begin_appearance(appearing = true)` issued, end pending
    Entering,
    /// `begin_appearance(appearing = false)` issued, end pending
    Leaving,
}

impl AppearancePhase {
    pub fn is_transitioning(self) -> bool {
        self != AppearancePhase::NotTransitioning
    }
}

/// Appearance phase per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Appearances {
    phases: [AppearancePhase; 3],
}

impl Appearances {
    pub fn get(&self, role: Role) -> AppearancePhase {
        self.phases[role.index()]
    }

    pub fn set(&mut self, role: Role, phase: AppearancePhase) {
        self.phases[role.index()] = phase;
    }

    /// Reset `role` and return the phase it was in.
    pub fn clear(&mut self, role: Role) -> AppearancePhase {
        std::mem::take(&mut self.phases[role.index()])
    }

    pub fn is_balanced(&self) -> bool {
        self.phases.iter().all(|phase| !phase.is_transitioning())
    }
}
