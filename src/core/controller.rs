use std::{
    sync::Arc,
    time::Duration,
};

use super::{
    queue::{
        Completion,
        FetchPlan,
        QueueState,
    },
    tasks::{
        manager::RepaintHook,
        TaskManager,
        TaskResult,
    },
};
use crate::{
    cards::Category,
    source::CardSource,
};

/// Drives a [`QueueState`] against a [`CardSource`].
///
/// Every operation updates the state synchronously and spawns the fetch it
/// asks for; results come back through [`QueueController::poll`], which the
/// owner calls once per frame. All state mutation therefore happens on the
/// owner's thread.
pub struct QueueController {
    state: QueueState,
    source: Arc<dyn CardSource>,
    task_manager: TaskManager,
}

impl QueueController {
    pub fn new(source: Arc<dyn CardSource>) -> Self {
        Self { state: QueueState::new(), source, task_manager: TaskManager::new() }
    }

    pub fn with_repaint_hook(mut self, hook: RepaintHook) -> Self {
        self.task_manager.set_repaint_hook(hook);
        self
    }

    pub fn state(&self) -> &QueueState {
        &self.state
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn initial_load(&mut self) {
        let plan = self.state.initial_load();
        self.dispatch(plan);
    }

    pub fn advance(&mut self) {
        let plan = self.state.advance();
        self.dispatch(plan);
    }

    pub fn select_category(&mut self, category: Category) {
        let plan = self.state.select_category(category);
        self.dispatch(plan);
    }

    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.state.set_search_input(text);
    }

    pub fn submit_search(&mut self) {
        let plan = self.state.submit_search();
        self.dispatch(plan);
    }

    pub fn clear_search(&mut self) {
        let plan = self.state.clear_search();
        self.dispatch(Some(plan));
    }

    pub fn retry(&mut self) {
        let plan = self.state.retry();
        self.dispatch(Some(plan));
    }

    /// Merges every finished fetch. Returns how many results were handled.
    pub fn poll(&mut self) -> usize {
        let results = self.task_manager.poll_results();
        let count = results.len();

        for result in results {
            self.handle_task_result(result);
        }

        count
    }

    /// Blocks until one fetch result is merged or `timeout` elapses.
    pub fn wait_for_result(&mut self, timeout: Duration) -> bool {
        match self.task_manager.wait_result(timeout) {
            Some(result) => {
                self.handle_task_result(result);
                true
            }
            None => false,
        }
    }

    fn dispatch(&self, plan: Option<FetchPlan>) {
        if let Some(plan) = plan {
            self.task_manager.fetch_cards(Arc::clone(&self.source), plan);
        }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        let task_type = result.task_type();

        match result {
            TaskResult::CardsFetched { ticket, result } => {
                let outcome = self.state.complete(ticket, result);
                if outcome == Completion::Applied && ticket.kind.is_foreground() {
                    log::info!(
                        "Showing {} (queue {}, learned {})",
                        self.state.current_card().map(|card| card.name.as_str()).unwrap_or("-"),
                        self.state.queue().len(),
                        self.state.history().len()
                    );
                }
                log::debug!("{} #{} -> {:?}", task_type, ticket.generation, outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::Mutex,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{
        cards::Card,
        core::{
            queue::QueueError,
            TorchLearnError,
        },
        source::{
            testing::card,
            DatasetSource,
            FetchRequest,
        },
    };

    const TIMEOUT: Duration = Duration::from_secs(5);

    /// Replays canned responses and records every request it receives.
    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Vec<Card>, String>>>,
        requests: Mutex<Vec<FetchRequest>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<Card>, String>>) -> Arc<Self> {
            Arc::new(Self { responses: Mutex::new(responses.into()), ..Default::default() })
        }

        fn requests(&self) -> Vec<FetchRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CardSource for ScriptedSource {
        fn name(&self) -> &str {
            "Scripted"
        }

        async fn fetch(&self, request: FetchRequest) -> Result<Vec<Card>, TorchLearnError> {
            self.requests.lock().unwrap().push(request);
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(cards)) => Ok(cards),
                Some(Err(message)) => Err(TorchLearnError::Custom(message)),
                None => Ok(Vec::new()),
            }
        }
    }

    fn batch(names: &[&str]) -> Vec<Card> {
        names.iter().map(|name| card(name, Category::Math)).collect()
    }

    fn current(controller: &QueueController) -> String {
        controller.state().current_card().map(|card| card.name.clone()).unwrap_or_default()
    }

    #[test]
    fn test_end_to_end_browsing() {
        let source = ScriptedSource::new(vec![Ok(batch(&["r0", "r1", "r2"]))]);
        let mut controller = QueueController::new(source.clone());

        controller.initial_load();
        assert!(controller.state().is_loading());
        assert!(controller.wait_for_result(TIMEOUT));

        assert_eq!(current(&controller), "r0");
        let queued: Vec<_> = controller.state().queue().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(queued, ["r1", "r2"]);

        controller.advance();
        controller.advance();
        assert_eq!(current(&controller), "r2");
        assert_eq!(controller.state().history(), ["r0", "r1"]);

        // The first advance left one card queued, below the low-water mark:
        // a single background prefetch, no foreground fetch.
        assert!(!controller.state().is_loading());
        assert!(controller.wait_for_result(TIMEOUT));
        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], FetchRequest::browse(Vec::new(), 3, Category::All));
        assert_eq!(requests[1], FetchRequest::browse(vec!["r0".into()], 3, Category::All));
        assert_eq!(current(&controller), "r2");
    }

    #[test]
    fn test_prefetch_failure_is_not_surfaced() {
        let source = ScriptedSource::new(vec![Ok(batch(&["a", "b"])), Err("offline".into())]);
        let mut controller = QueueController::new(source);

        controller.initial_load();
        assert!(controller.wait_for_result(TIMEOUT));

        controller.advance();
        assert_eq!(current(&controller), "b");
        assert!(controller.wait_for_result(TIMEOUT));

        assert!(controller.state().error().is_none());
        assert_eq!(current(&controller), "b");
    }

    #[test]
    fn test_transport_error_then_retry() {
        let source = ScriptedSource::new(vec![Err("unreachable".into()), Ok(batch(&["a"]))]);
        let mut controller = QueueController::new(source);

        controller.initial_load();
        assert!(controller.wait_for_result(TIMEOUT));
        assert!(matches!(controller.state().error(), Some(QueueError::Transport(_))));

        controller.retry();
        assert!(controller.wait_for_result(TIMEOUT));
        assert!(controller.state().error().is_none());
        assert_eq!(current(&controller), "a");
    }

    #[test]
    fn test_search_against_dataset_ignores_history() {
        let source = Arc::new(DatasetSource::bundled().unwrap().with_seed(3));
        let mut controller = QueueController::new(source);

        controller.initial_load();
        assert!(controller.wait_for_result(TIMEOUT));

        let first = current(&controller);
        controller.set_search_input(first.clone());
        controller.advance();
        controller.poll();
        assert!(controller.state().history().contains(&first));

        controller.set_search_input(format!("  {first}  "));
        controller.submit_search();
        while controller.state().is_loading() {
            assert!(controller.wait_for_result(TIMEOUT));
        }

        assert_eq!(current(&controller), first);
        assert!(controller.state().queue().is_empty());
    }

    #[test]
    fn test_missing_search_result_surfaces_query() {
        let source = Arc::new(DatasetSource::bundled().unwrap());
        let mut controller = QueueController::new(source);

        controller.set_search_input("doesnotexist___");
        controller.submit_search();
        assert!(controller.wait_for_result(TIMEOUT));

        let error = controller.state().error().unwrap();
        assert!(error.is_empty_result());
        assert!(error.to_string().contains("doesnotexist___"));
    }

    #[test]
    fn test_category_fallbacks_against_dataset() {
        let source = Arc::new(DatasetSource::bundled().unwrap().with_seed(11));
        let mut controller = QueueController::new(source);

        controller.select_category(Category::Optimization);
        assert!(controller.wait_for_result(TIMEOUT));
        assert_eq!(current(&controller), "torch.optim.Adam");

        // Adam is now learned, but the category falls back to its full pool.
        controller.advance();
        assert!(controller.wait_for_result(TIMEOUT));
        assert!(controller.state().error().is_none());
        assert_eq!(current(&controller), "torch.optim.Adam");
        assert_eq!(controller.state().history(), ["torch.optim.Adam"]);

        controller.select_category(Category::DataProcessing);
        assert!(controller.wait_for_result(TIMEOUT));
        assert_eq!(
            controller.state().error(),
            Some(&QueueError::NoCards { category: Category::DataProcessing })
        );
    }
}
