use std::time::{Duration, SystemTime};

use crate::{
    models::store::Store,
    storage::{Storage, StorageError, json::JsonFileStorage},
};

/// Cancellation handle returned by [`SnapshotFeed::subscribe`]. Dropping it
/// does nothing on its own; hand it back to [`SnapshotFeed::cancel`] to stop
/// receiving snapshots.
pub struct Subscription {
    id: u64,
}

type SnapshotCallback = Box<dyn FnMut(&Store)>;

/// Explicit subscribe/callback registry for store snapshots. Every publish
/// pushes the full current store to each live subscriber; there is no
/// diffing, so whatever snapshot arrives last is the one a subscriber holds.
pub struct SnapshotFeed {
    next_id: u64,
    subscribers: Vec<(u64, SnapshotCallback)>,
}

impl Default for SnapshotFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotFeed {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: SnapshotCallback) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, callback));
        Subscription { id }
    }

    pub fn cancel(&mut self, subscription: Subscription) {
        self.subscribers.retain(|(id, _)| *id != subscription.id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn publish(&mut self, store: &Store) {
        for (_, callback) in &mut self.subscribers {
            callback(store);
        }
    }
}

/// Poll the store file and republish whenever it changes on disk.
///
/// Publishes the initial snapshot immediately, then sleeps `interval`
/// between modification-time checks. `max_rounds` bounds the number of
/// polls (`None` runs until the process is killed); load errors end the
/// loop and surface to the caller, there is no automatic retry.
pub fn watch_store(
    storage: &JsonFileStorage,
    feed: &mut SnapshotFeed,
    interval: Duration,
    max_rounds: Option<u64>,
) -> Result<(), StorageError> {
    let store = storage.load()?;
    feed.publish(&store);
    let mut last_seen = modified_at(storage);

    let mut rounds = 0u64;
    loop {
        if let Some(max) = max_rounds {
            if rounds >= max {
                return Ok(());
            }
            rounds += 1;
        }

        std::thread::sleep(interval);

        let current = modified_at(storage);
        if current != last_seen {
            last_seen = current;
            let store = storage.load()?;
            feed.publish(&store);
        }
    }
}

fn modified_at(storage: &JsonFileStorage) -> Option<SystemTime> {
    std::fs::metadata(storage.path())
        .and_then(|m| m.modified())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::models::contact::Contact;
    use uuid::Uuid;

    fn store_with_contacts(count: usize) -> Store {
        let mut store = Store::default();
        for i in 0..count {
            store.contacts.push(Contact {
                id: Uuid::new_v4(),
                last_name: format!("c{}", i),
                ..Contact::default()
            });
        }
        store
    }

    #[test]
    fn subscribers_receive_every_snapshot() {
        let mut feed = SnapshotFeed::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        feed.subscribe(Box::new(move |store: &Store| {
            sink.borrow_mut().push(store.contacts.len());
        }));

        feed.publish(&store_with_contacts(1));
        feed.publish(&store_with_contacts(3));

        assert_eq!(*seen.borrow(), vec![1, 3]);
    }

    #[test]
    fn last_snapshot_wins() {
        let mut feed = SnapshotFeed::new();
        let latest = Rc::new(RefCell::new(0usize));

        let sink = Rc::clone(&latest);
        feed.subscribe(Box::new(move |store: &Store| {
            // Full replacement, not accumulation
            *sink.borrow_mut() = store.contacts.len();
        }));

        feed.publish(&store_with_contacts(5));
        feed.publish(&store_with_contacts(2));

        assert_eq!(*latest.borrow(), 2);
    }

    #[test]
    fn cancelled_subscription_receives_nothing_further() {
        let mut feed = SnapshotFeed::new();
        let seen = Rc::new(RefCell::new(0usize));

        let sink = Rc::clone(&seen);
        let subscription = feed.subscribe(Box::new(move |_: &Store| {
            *sink.borrow_mut() += 1;
        }));

        feed.publish(&Store::default());
        feed.cancel(subscription);
        feed.publish(&Store::default());
        feed.publish(&Store::default());

        assert_eq!(*seen.borrow(), 1);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn cancel_only_removes_the_given_handle() {
        let mut feed = SnapshotFeed::new();
        let first = feed.subscribe(Box::new(|_: &Store| {}));
        let _second = feed.subscribe(Box::new(|_: &Store| {}));

        feed.cancel(first);
        assert_eq!(feed.subscriber_count(), 1);
    }

    #[test]
    fn watch_republishes_on_file_change() {
        let dir = std::env::temp_dir().join(format!("ergon-watch-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let store_path = dir.join("store.json");
        let storage = JsonFileStorage::new(store_path.clone());
        storage.save(&store_with_contacts(1)).unwrap();

        let mut feed = SnapshotFeed::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        feed.subscribe(Box::new(move |store: &Store| {
            sink.borrow_mut().push(store.contacts.len());
        }));

        // A second writer replaces the file while the watch loop polls
        let writer = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            let storage = JsonFileStorage::new(store_path);
            storage.save(&store_with_contacts(4)).unwrap();
        });

        watch_store(&storage, &mut feed, Duration::from_millis(5), Some(60)).unwrap();
        writer.join().unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.first(), Some(&1), "initial snapshot published");
        assert_eq!(seen.last(), Some(&4), "changed snapshot published");
    }
}
