use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Items with a stable identity used for deferred removal.
pub trait Keyed {
    type Key: Copy + Eq + Hash + Debug;

    fn key(&self) -> Self::Key;
}

/// A list that can be changed while it is being walked.
///
/// Additions are queued and join the live sequence at the start of the next
/// [`DeferredList::for_each`]. Removals are recorded by key: a removed item is
/// skipped from that moment on and physically dropped at the next pass
/// boundary.
#[derive(Debug)]
pub struct DeferredList<T: Keyed> {
    live: Vec<T>,
    queued: Vec<T>,
    doomed: HashSet<T::Key>,
}

impl<T: Keyed> Default for DeferredList<T> {
    fn default() -> Self {
        Self {
            live: Vec::new(),
            queued: Vec::new(),
            doomed: HashSet::new(),
        }
    }
}

impl<T: Keyed> DeferredList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `item`; it is first visited by the next pass.
    pub fn add(&mut self, item: T) -> &mut T {
        push_queued(&mut self.queued, item)
    }

    /// Mark `key` for removal. Unknown or already removed keys are ignored.
    pub fn remove(&mut self, key: T::Key) {
        self.doomed.insert(key);
    }

    /// Visit every live item not marked for removal, in insertion order.
    ///
    /// `f` receives a [`Pending`] handle to add or remove items of this same
    /// list, and to reach the other live items; those changes follow the
    /// rules above.
    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T, &mut Pending<'_, T>),
    {
        self.materialize();
        self.purge();
        let Self {
            live,
            queued,
            doomed,
        } = &mut *self;
        for index in 0..live.len() {
            let (before, rest) = live.split_at_mut(index);
            let Some((item, after)) = rest.split_first_mut() else {
                break;
            };
            if doomed.contains(&item.key()) {
                continue;
            }
            let mut pending = Pending {
                queued: &mut *queued,
                doomed: &mut *doomed,
                before,
                after,
            };
            f(item, &mut pending);
        }
        self.purge();
    }

    /// Apply queued additions and removals without visiting anything.
    pub fn flush(&mut self) {
        self.materialize();
        self.purge();
    }

    pub fn contains(&self, key: T::Key) -> bool {
        self.get(key).is_some()
    }

    /// Look up a live or queued item that is not marked for removal.
    pub fn get(&self, key: T::Key) -> Option<&T> {
        if self.doomed.contains(&key) {
            return None;
        }
        self.live
            .iter()
            .chain(self.queued.iter())
            .find(|item| item.key() == key)
    }

    pub fn get_mut(&mut self, key: T::Key) -> Option<&mut T> {
        if self.doomed.contains(&key) {
            return None;
        }
        self.live
            .iter_mut()
            .chain(self.queued.iter_mut())
            .find(|item| item.key() == key)
    }

    /// Live then queued items, skipping those marked for removal.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.live
            .iter()
            .chain(self.queued.iter())
            .filter(|item| !self.doomed.contains(&item.key()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        let doomed = &self.doomed;
        self.live
            .iter_mut()
            .chain(self.queued.iter_mut())
            .filter(move |item| !doomed.contains(&item.key()))
    }

    /// Items that will be visited by the next pass.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn materialize(&mut self) {
        if !self.queued.is_empty() {
            self.live.append(&mut self.queued);
        }
    }

    fn purge(&mut self) {
        if self.doomed.is_empty() {
            return;
        }
        let doomed = &self.doomed;
        self.live.retain(|item| !doomed.contains(&item.key()));
        self.queued.retain(|item| !doomed.contains(&item.key()));
        self.doomed.clear();
    }
}

/// Add/remove access to a [`DeferredList`] while it is being walked.
///
/// Also lends the live items on either side of the one being visited.
#[derive(Debug)]
pub struct Pending<'a, T: Keyed> {
    queued: &'a mut Vec<T>,
    doomed: &'a mut HashSet<T::Key>,
    before: &'a mut [T],
    after: &'a mut [T],
}

impl<'a, T: Keyed> Pending<'a, T> {
    pub fn add(&mut self, item: T) -> &mut T {
        push_queued(&mut *self.queued, item)
    }

    pub fn remove(&mut self, key: T::Key) {
        self.doomed.insert(key);
    }

    pub fn is_removed(&self, key: T::Key) -> bool {
        self.doomed.contains(&key)
    }

    /// An item added during the current pass.
    pub fn get_queued_mut(&mut self, key: T::Key) -> Option<&mut T> {
        if self.doomed.contains(&key) {
            return None;
        }
        self.queued.iter_mut().find(|item| item.key() == key)
    }

    /// Live items of this pass other than the one being visited, in order,
    /// skipping removed ones.
    pub fn others(&self) -> impl Iterator<Item = &T> {
        let doomed = &*self.doomed;
        self.before
            .iter()
            .chain(self.after.iter())
            .filter(move |item| !doomed.contains(&item.key()))
    }

    pub fn others_mut(&mut self) -> impl Iterator<Item = &mut T> {
        let doomed = &*self.doomed;
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .filter(move |item| !doomed.contains(&item.key()))
    }

    /// A shorter-lived handle to the same list.
    pub fn reborrow(&mut self) -> Pending<'_, T> {
        Pending {
            queued: &mut *self.queued,
            doomed: &mut *self.doomed,
            before: &mut *self.before,
            after: &mut *self.after,
        }
    }
}

fn push_queued<T>(queued: &mut Vec<T>, item: T) -> &mut T {
    let index = queued.len();
    queued.push(item);
    &mut queued[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(u32);

    impl Keyed for Item {
        type Key = u32;

        fn key(&self) -> u32 {
            self.0
        }
    }

    fn visited(list: &mut DeferredList<Item>) -> Vec<u32> {
        let mut seen = Vec::new();
        list.for_each(|item, _| seen.push(item.0));
        seen
    }

    #[test]
    fn added_items_visible_at_next_pass() {
        let mut list = DeferredList::new();
        list.add(Item(1));
        list.add(Item(2));
        assert_eq!(visited(&mut list), vec![1, 2]);
    }

    #[test]
    fn add_during_pass_waits_for_next_pass() {
        let mut list = DeferredList::new();
        list.add(Item(1));
        let mut seen = Vec::new();
        list.for_each(|item, pending| {
            seen.push(item.0);
            pending.add(Item(item.0 + 10));
        });
        assert_eq!(seen, vec![1]);
        assert_eq!(visited(&mut list), vec![1, 11]);
    }

    #[test]
    fn remove_during_pass_skips_rest_of_pass() {
        let mut list = DeferredList::new();
        for i in 1..=3 {
            list.add(Item(i));
        }
        list.flush();
        let mut seen = Vec::new();
        list.for_each(|item, pending| {
            seen.push(item.0);
            if item.0 == 1 {
                pending.remove(3);
            }
        });
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(visited(&mut list), vec![1, 2]);
    }

    #[test]
    fn removing_current_item_finishes_its_visit() {
        let mut list = DeferredList::new();
        list.add(Item(1));
        list.add(Item(2));
        let mut seen = Vec::new();
        list.for_each(|item, pending| {
            pending.remove(item.0);
            seen.push(item.0);
        });
        assert_eq!(seen, vec![1, 2]);
        assert!(list.is_empty());
    }

    #[test]
    fn add_then_remove_before_pass_is_never_visited() {
        let mut list = DeferredList::new();
        list.add(Item(7));
        list.remove(7);
        assert!(visited(&mut list).is_empty());
        assert!(visited(&mut list).is_empty());
    }

    #[test]
    fn add_and_remove_in_same_pass_is_never_visited() {
        let mut list = DeferredList::new();
        list.add(Item(1));
        list.for_each(|_, pending| {
            pending.add(Item(2));
            pending.remove(2);
        });
        assert_eq!(visited(&mut list), vec![1]);
    }

    #[test]
    fn removing_absent_or_twice_is_noop() {
        let mut list = DeferredList::new();
        list.add(Item(1));
        list.remove(99);
        list.remove(1);
        list.remove(1);
        assert!(visited(&mut list).is_empty());
        list.remove(1);
        list.add(Item(2));
        assert_eq!(visited(&mut list), vec![2]);
    }

    #[test]
    fn lookups_skip_doomed_and_see_queued() {
        let mut list = DeferredList::new();
        list.add(Item(1));
        assert!(list.contains(1));
        assert_eq!(list.len(), 1);
        list.remove(1);
        assert!(list.get(1).is_none());
        assert!(list.get_mut(1).is_none());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn insertion_order_is_kept_across_passes() {
        let mut list = DeferredList::new();
        for i in 0..5 {
            list.add(Item(i));
        }
        list.flush();
        list.remove(2);
        list.add(Item(5));
        assert_eq!(visited(&mut list), vec![0, 1, 3, 4, 5]);
        let keys: Vec<u32> = list.iter().map(|i| i.0).collect();
        assert_eq!(keys, vec![0, 1, 3, 4, 5]);
    }

    #[test]
    fn others_exclude_current_and_removed_items() {
        let mut list = DeferredList::new();
        for i in 1..=4 {
            list.add(Item(i));
        }
        let mut seen = Vec::new();
        list.for_each(|item, pending| {
            if item.0 == 2 {
                pending.remove(4);
                pending.add(Item(9));
            }
            seen.push((item.0, pending.others().map(|i| i.0).collect::<Vec<_>>()));
        });
        assert_eq!(seen, vec![(1, vec![2, 3, 4]), (2, vec![1, 3]), (3, vec![1, 2])]);
        assert_eq!(visited(&mut list), vec![1, 2, 3, 9]);
    }

    #[test]
    fn pending_sees_items_queued_this_pass() {
        let mut list = DeferredList::new();
        list.add(Item(1));
        list.for_each(|_, pending| {
            pending.add(Item(40));
            assert!(pending.get_queued_mut(40).is_some());
            pending.remove(40);
            assert!(pending.is_removed(40));
            assert!(pending.get_queued_mut(40).is_none());
        });
    }
}
