use tally_types::ObjectKey;

/// Observer notified before each store request the pipeline issues.
pub trait ProgressHook: Send + Sync {
    /// Called immediately before the object is requested from the store.
    fn on_retrieve(&self, key: &ObjectKey);

    /// Called immediately before the artifact is uploaded to the store.
    fn on_publish(&self, key: &ObjectKey);
}

/// Hook that ignores every notification.
pub struct NoOpProgress;

impl ProgressHook for NoOpProgress {
    fn on_retrieve(&self, _key: &ObjectKey) {}

    fn on_publish(&self, _key: &ObjectKey) {}
}
