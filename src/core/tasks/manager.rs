use std::{
    sync::{
        mpsc,
        Arc,
    },
    time::Duration,
};

use tokio::runtime::Runtime;

use super::TaskResult;
use crate::{
    core::queue::FetchPlan,
    source::CardSource,
};

/// Called whenever a task result is sent, so an idle UI can wake up.
pub type RepaintHook = Arc<dyn Fn() + Send + Sync>;

/// Runs card fetches on a tokio runtime and hands the results back to the
/// single owner of the queue state through a channel.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
    repaint: Option<RepaintHook>,
}

impl TaskManager {
    pub fn new() -> Self {
        let runtime = Arc::new(Runtime::new().expect("Failed to create TaskManager runtime"));

        let (sender, receiver) = mpsc::channel();

        Self { runtime, receiver, sender, repaint: None }
    }

    pub fn set_repaint_hook(&mut self, hook: RepaintHook) {
        self.repaint = Some(hook);
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    /// Blocks until the next result arrives or `timeout` elapses.
    pub fn wait_result(&self, timeout: Duration) -> Option<TaskResult> {
        self.receiver.recv_timeout(timeout).ok()
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Option<RepaintHook>) {
        (self.sender.clone(), self.repaint.clone())
    }

    pub fn fetch_cards(&self, source: Arc<dyn CardSource>, plan: FetchPlan) {
        let (sender, repaint) = self.task_context();

        log::debug!(
            "Spawning {:?} fetch #{} from {}: {:?}",
            plan.ticket.kind,
            plan.ticket.generation,
            source.name(),
            plan.request
        );

        self.runtime.spawn(async move {
            let result = source.fetch(plan.request).await;

            let _ = sender.send(TaskResult::CardsFetched { ticket: plan.ticket, result });

            if let Some(repaint) = repaint {
                repaint();
            }
        });
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}
