use std::{collections::HashMap, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval, sleep},
};

/// Registry of named background tasks. Spawning under a name that is already
/// taken aborts the previous task, and everything is aborted on drop.
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    pub fn spawn(&mut self, key: &str, task: JoinHandle<()>) {
        if let Some(handle) = self.tasks.insert(key.to_string(), task) {
            handle.abort();
        }
    }

    /// Runs `tick` immediately and then every `period` until it returns `false`.
    pub fn every<F>(&mut self, key: &str, period: Duration, mut tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.spawn(
            key,
            tokio::spawn(async move {
                let mut ticker = interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    ticker.tick().await;
                    if !tick() {
                        break;
                    }
                }
            }),
        );
    }

    /// Runs `f` once after `delay`. Calling again with the same key restarts the wait.
    pub fn after<F>(&mut self, key: &str, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.spawn(
            key,
            tokio::spawn(async move {
                sleep(delay).await;
                f();
            }),
        );
    }

    pub fn is_running(&self, key: &str) -> bool {
        self.tasks.get(key).is_some_and(|handle| !handle.is_finished())
    }

    pub fn abort(&mut self, key: &str) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    pub fn abort_all(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
        self.tasks.clear();
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.abort_all();
    }
}
