//! Value-compared dependency tracking.
//!
//! A derivation is recomputed only when its input snapshot differs by value
//! from the last one seen.

/// Remembers the last input snapshot.
#[derive(Debug, Clone)]
pub struct Tracked<K> {
    last: Option<K>,
}

impl<K: PartialEq> Tracked<K> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Record `next`; returns whether it differs from the previous snapshot.
    pub fn observe(&mut self, next: K) -> bool {
        if self.last.as_ref() == Some(&next) {
            return false;
        }
        self.last = Some(next);
        true
    }
}

impl<K: PartialEq> Default for Tracked<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// A derived value paired with the inputs it was computed from.
#[derive(Debug, Clone)]
pub struct Derived<K, V> {
    slot: Option<(K, V)>,
}

impl<K: PartialEq, V> Derived<K, V> {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Recompute with `f` if `inputs` changed. Returns the value and whether it
    /// was recomputed.
    pub fn update(&mut self, inputs: K, f: impl FnOnce(&K) -> V) -> (&V, bool) {
        let (slot, changed) = match self.slot.take() {
            Some((last, value)) if last == inputs => ((last, value), false),
            _ => {
                let value = f(&inputs);
                ((inputs, value), true)
            }
        };
        let (_, value) = self.slot.insert(slot);
        (&*value, changed)
    }

    pub fn get(&self) -> Option<&V> {
        self.slot.as_ref().map(|(_, value)| value)
    }
}

impl<K: PartialEq, V> Default for Derived<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
