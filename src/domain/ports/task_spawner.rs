use futures::future::BoxFuture;

/// Fire-and-forget execution of background work such as the chat list's
/// missing-contact fetch. Tests substitute a spawner that holds futures
/// until released.
pub trait TaskSpawner: Send + Sync {
    fn spawn(&self, future: BoxFuture<'static, ()>);
}
