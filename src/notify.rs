use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle returned by `subscribe`, used to unsubscribe.
    pub struct Subscription;
}

/// Listener registry. `L` is the listener's trait-object type, e.g.
/// `dyn FnMut(&Change)`.
///
/// Keys come from a slot map, so a stale handle never matches a listener
/// that later reuses its slot. Listeners themselves sit in a list kept in
/// subscription order.
pub struct Observers<L: ?Sized> {
    keys: SlotMap<Subscription, ()>,
    listeners: Vec<(Subscription, Box<L>)>,
}

impl<L: ?Sized> Default for Observers<L> {
    fn default() -> Self {
        Self {
            keys: SlotMap::with_key(),
            listeners: Vec::new(),
        }
    }
}

impl<L: ?Sized> Observers<L> {
    pub fn subscribe(&mut self, listener: Box<L>) -> Subscription {
        let key = self.keys.insert(());
        self.listeners.push((key, listener));
        key
    }

    /// Returns whether the subscription was still live.
    pub fn unsubscribe(&mut self, key: Subscription) -> bool {
        if self.keys.remove(key).is_none() {
            return false;
        }
        self.listeners.retain(|(k, _)| *k != key);
        true
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Listeners in subscription order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut L> {
        self.listeners.iter_mut().map(|(_, l)| &mut **l)
    }
}

impl<L: ?Sized> std::fmt::Debug for Observers<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn subscribe_notify_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers: Observers<dyn FnMut(&u32)> = Observers::default();

        let sink = Rc::clone(&seen);
        let key = observers.subscribe(Box::new(move |n: &u32| sink.borrow_mut().push(*n)));
        for listener in observers.iter_mut() {
            listener(&1);
        }
        assert!(observers.unsubscribe(key));
        assert!(!observers.unsubscribe(key));
        for listener in observers.iter_mut() {
            listener(&2);
        }

        assert_eq!(*seen.borrow(), vec![1]);
        assert!(observers.is_empty());
    }

    #[test]
    fn delivery_follows_subscription_order_after_reuse() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers: Observers<dyn FnMut()> = Observers::default();
        let tagged = |tag: &'static str| {
            let sink = Rc::clone(&seen);
            Box::new(move || sink.borrow_mut().push(tag)) as Box<dyn FnMut()>
        };

        let a = observers.subscribe(tagged("a"));
        observers.subscribe(tagged("b"));
        assert!(observers.unsubscribe(a));
        observers.subscribe(tagged("c"));
        observers.subscribe(tagged("d"));
        assert!(!observers.unsubscribe(a));

        for listener in observers.iter_mut() {
            listener();
        }
        assert_eq!(*seen.borrow(), vec!["b", "c", "d"]);
        assert_eq!(observers.len(), 3);
    }
}
