use crate::domain::ports::task_spawner::TaskSpawner;
use futures::future::BoxFuture;

/// Runs background work on the ambient tokio runtime
#[derive(Clone, Default)]
pub struct TokioTaskSpawner;

impl TokioTaskSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl TaskSpawner for TokioTaskSpawner {
    fn spawn(&self, future: BoxFuture<'static, ()>) {
        tokio::spawn(future);
    }
}
