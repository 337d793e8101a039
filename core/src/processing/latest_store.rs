use tokio::sync::watch;

/// Single-slot cache holding the most recent record; older records are dropped.
#[derive(Debug)]
pub struct LatestStore<T> {
    slot: watch::Sender<Option<T>>,
}

impl<T: Clone> LatestStore<T> {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    /// Overwrites the held record, returning the one it replaced.
    pub fn store(&self, record: T) -> Option<T> {
        self.slot.send_replace(Some(record))
    }

    pub fn fetch(&self) -> Option<T> {
        self.slot.borrow().clone()
    }
}

impl<T: Clone> Default for LatestStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_fetches_none() {
        let store: LatestStore<u32> = LatestStore::new();
        assert_eq!(store.fetch(), None);
    }

    #[test]
    fn store_overwrites_without_history() {
        let store = LatestStore::new();
        assert_eq!(store.store("first"), None);
        assert_eq!(store.store("second"), Some("first"));
        assert_eq!(store.fetch(), Some("second"));
    }
}
