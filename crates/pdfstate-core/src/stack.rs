//! Save/restore stack for the `q`/`Q` operators.
//!
//! [`StateStack`] is never empty: the bottom entry is the page (or form)
//! state and can not be popped. `save` pushes a value copy of the top, so
//! mutating the current state after a save never reaches the saved copy.

use std::ops::{Deref, DerefMut};

/// LIFO stack of state records with a permanent bottom entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStack<T> {
    /// Invariant: never empty. The current state is the last element.
    entries: Vec<T>,
    /// Lowest depth `restore` may pop to; raised while a scope is open.
    floor: usize,
}

impl<T: Clone + Default> Default for StateStack<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> StateStack<T> {
    /// Create a stack of depth 1 holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial],
            floor: 1,
        }
    }

    /// Number of entries, always at least 1.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// The current (top) state.
    pub fn current(&self) -> &T {
        &self.entries[self.entries.len() - 1]
    }

    /// Mutable access to the current (top) state.
    pub fn current_mut(&mut self) -> &mut T {
        let top = self.entries.len() - 1;
        &mut self.entries[top]
    }

    // --- q/Q operators ---

    /// `q` operator: push a copy of the current state.
    pub fn save(&mut self) {
        let copy = self.current().clone();
        self.entries.push(copy);
    }

    /// `Q` operator: discard the current state and return to the saved one.
    ///
    /// Returns `false` (and changes nothing) for an unmatched `Q`: at depth 1,
    /// or at the entry of the innermost open scope.
    pub fn restore(&mut self) -> bool {
        if self.entries.len() > self.floor {
            self.entries.pop();
            true
        } else {
            false
        }
    }

    /// Pop entries until the stack is no deeper than `depth` (minimum 1).
    ///
    /// Unlike [`restore`](Self::restore) this ignores scope floors. Returns
    /// the number of entries discarded.
    pub fn restore_to_depth(&mut self, depth: usize) -> usize {
        let target = depth.max(1);
        let excess = self.entries.len().saturating_sub(target);
        self.entries.truncate(self.entries.len() - excess);
        excess
    }

    /// Run `body` between a save and a restore.
    ///
    /// The stack is brought back to its depth before the call when `body`
    /// returns, whatever `body` did to the stack, and also when it unwinds.
    /// Inside `body`, `restore` can not pop the scope's own save.
    pub fn with_scoped_state<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        let mut scope = ScopedState::enter(self);
        body(&mut *scope)
    }
}

/// Guard that restores a [`StateStack`] to its entry depth on drop.
///
/// Dereferences to the stack, so a scope can keep issuing operators.
#[derive(Debug)]
pub struct ScopedState<'a, T: Clone> {
    stack: &'a mut StateStack<T>,
    depth: usize,
    outer_floor: usize,
}

impl<'a, T: Clone> ScopedState<'a, T> {
    /// Save the current state and remember the depth to restore to.
    pub fn enter(stack: &'a mut StateStack<T>) -> Self {
        let depth = stack.depth();
        let outer_floor = stack.floor;
        stack.save();
        stack.floor = depth + 1;
        Self {
            stack,
            depth,
            outer_floor,
        }
    }

    /// Depth the stack returns to when this guard is dropped.
    pub fn entry_depth(&self) -> usize {
        self.depth
    }
}

impl<T: Clone> Deref for ScopedState<'_, T> {
    type Target = StateStack<T>;

    fn deref(&self) -> &Self::Target {
        self.stack
    }
}

impl<T: Clone> DerefMut for ScopedState<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stack
    }
}

impl<T: Clone> Drop for ScopedState<'_, T> {
    fn drop(&mut self) {
        self.stack.restore_to_depth(self.depth);
        self.stack.floor = self.outer_floor;
    }
}
