//! Generation orchestration
//!
//! Drives exactly one generation attempt at a time from user intent to a
//! terminal state. Each accepted request runs on a background thread that
//! emits progress events over a channel; the app polls on every tick and
//! folds the events into the state store. The busy flag in state is the
//! whole mutual-exclusion mechanism: a second request while busy is dropped,
//! not queued.
//!
//! The intermediate percentages are a scripted simulation for perceived
//! responsiveness; the upstream call is a single request/response.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::model::{GeneratedImage, GenerationProgress, GenerationRequest, GenerationResponse};
use crate::store::{Store, StoreAction};

use super::client::ImageService;

/// Scripted progress observations emitted between acceptance and the
/// terminal outcome
const PROGRESS_SCRIPT: [(u8, &str); 3] = [
    (25, "Processing prompt..."),
    (50, "Generating image..."),
    (75, "Finalizing results..."),
];

/// Events sent from a generation worker thread
enum GenerationEvent {
    Progress { progress: u8, status: String },
    Done(GenerationResponse),
}

/// Outcome of one request within a batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// Id of the stored image
    Generated(String),
    Failed(String),
}

/// Timing constants for the progress script and cleanup delays
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    /// Delay between scripted progress steps
    pub step_delay: Duration,
    /// How long the 100% observation stays visible
    pub complete_grace: Duration,
    /// How long an error observation stays visible
    pub error_grace: Duration,
    /// Pause between batch requests
    pub batch_gap: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(1000),
            complete_grace: Duration::from_millis(2000),
            error_grace: Duration::from_millis(5000),
            batch_gap: Duration::from_millis(2000),
        }
    }
}

impl Timings {
    /// All-zero timings for tests
    pub fn instant() -> Self {
        Self {
            step_delay: Duration::ZERO,
            complete_grace: Duration::ZERO,
            error_grace: Duration::ZERO,
            batch_gap: Duration::ZERO,
        }
    }
}

struct ActiveJob {
    receiver: Receiver<GenerationEvent>,
    request: GenerationRequest,
}

/// Single-flight generation driver
pub struct Orchestrator {
    client: Arc<dyn ImageService>,
    timings: Timings,
    job: Option<ActiveJob>,
    /// Remaining batch requests, run sequentially
    queue: VecDeque<GenerationRequest>,
    next_start: Option<Instant>,
    clear_progress_at: Option<Instant>,
    last_error: Option<String>,
    batch_outcomes: Vec<BatchOutcome>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn ImageService>, timings: Timings) -> Self {
        Self {
            client,
            timings,
            job: None,
            queue: VecDeque::new(),
            next_start: None,
            clear_progress_at: None,
            last_error: None,
            batch_outcomes: Vec::new(),
        }
    }

    /// Error text from the most recent failed generation, until its grace
    /// window expires or a new request starts
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn batch_outcomes(&self) -> &[BatchOutcome] {
        &self.batch_outcomes
    }

    /// Accept one generation request.
    ///
    /// Returns false without any effect when a generation is already in
    /// flight (silent drop; there is no queueing for direct requests).
    pub fn start(&mut self, request: GenerationRequest, store: &mut Store) -> bool {
        if store.state().is_generating {
            return false;
        }

        self.last_error = None;
        self.clear_progress_at = None;

        store.dispatch(StoreAction::SetGenerating(true));
        store.dispatch(StoreAction::SetGenerationProgress(GenerationProgress {
            prompt: request.prompt.clone(),
            progress: 10,
            status: "Initializing generation...".to_string(),
        }));

        let (tx, rx) = mpsc::channel();
        let client = Arc::clone(&self.client);
        let worker_request = request.clone();
        let step_delay = self.timings.step_delay;
        thread::spawn(move || run_generation(client, worker_request, step_delay, tx));

        self.job = Some(ActiveJob {
            receiver: rx,
            request,
        });
        true
    }

    /// Run several requests sequentially with a fixed gap, continuing past
    /// individual failures. Outcomes accumulate in [`Self::batch_outcomes`].
    pub fn start_batch(
        &mut self,
        requests: impl IntoIterator<Item = GenerationRequest>,
        store: &mut Store,
    ) {
        self.batch_outcomes.clear();
        let mut requests = requests.into_iter();
        if let Some(first) = requests.next() {
            if self.start(first, store) {
                self.queue.extend(requests);
            }
        }
    }

    /// Reset local generation state: busy flag, progress, pending error,
    /// and any queued batch requests. A network call already in flight is
    /// not aborted; its eventual result lands on a closed channel and is
    /// discarded.
    pub fn cancel(&mut self, store: &mut Store) {
        self.job = None;
        self.queue.clear();
        self.next_start = None;
        self.clear_progress_at = None;
        self.last_error = None;

        store.dispatch(StoreAction::SetGenerating(false));
        store.dispatch(StoreAction::ClearGenerationProgress);
    }

    /// Fold pending worker events and timer expirations into the store.
    /// Called from the app's tick handler.
    pub fn poll(&mut self, store: &mut Store) {
        let mut events = Vec::new();
        let mut disconnected = false;

        if let Some(ref job) = self.job {
            loop {
                match job.receiver.try_recv() {
                    Ok(event) => {
                        let done = matches!(event, GenerationEvent::Done(_));
                        events.push(event);
                        if done {
                            break;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        let prompt = self
            .job
            .as_ref()
            .map(|j| j.request.prompt.clone())
            .unwrap_or_default();

        for event in events {
            match event {
                GenerationEvent::Progress { progress, status } => {
                    store.dispatch(StoreAction::SetGenerationProgress(GenerationProgress {
                        prompt: prompt.clone(),
                        progress,
                        status,
                    }));
                }
                GenerationEvent::Done(response) => self.finish(response, store),
            }
        }

        // A worker that died without a terminal event counts as a failure
        if disconnected && self.job.is_some() {
            self.finish(
                GenerationResponse::failure("generation worker exited unexpectedly", 0),
                store,
            );
        }

        if let Some(at) = self.clear_progress_at {
            if Instant::now() >= at {
                store.dispatch(StoreAction::ClearGenerationProgress);
                self.clear_progress_at = None;
                self.last_error = None;
            }
        }

        // Start the next queued batch request once the gap has elapsed
        if self.job.is_none() {
            if let Some(at) = self.next_start {
                if Instant::now() >= at {
                    self.next_start = None;
                    if let Some(request) = self.queue.pop_front() {
                        self.start(request, store);
                    }
                }
            }
        }
    }

    /// Fold a terminal outcome into the store and schedule cleanup
    fn finish(&mut self, response: GenerationResponse, store: &mut Store) {
        let Some(job) = self.job.take() else { return };

        let image_url = response.image_url.filter(|u| !u.is_empty());
        match (response.success, image_url) {
            (true, Some(url)) => {
                let image = GeneratedImage::new(
                    job.request.prompt.clone(),
                    url,
                    job.request.settings.clone(),
                );
                self.batch_outcomes
                    .push(BatchOutcome::Generated(image.id.clone()));

                store.dispatch(StoreAction::AddImage(image));
                store.dispatch(StoreAction::SetGenerationProgress(GenerationProgress {
                    prompt: job.request.prompt,
                    progress: 100,
                    status: "Generation complete!".to_string(),
                }));
                store.dispatch(StoreAction::SetGenerating(false));
                self.clear_progress_at = Some(Instant::now() + self.timings.complete_grace);
            }
            (_, url) => {
                let message = match response.error {
                    Some(msg) => msg,
                    None if url.is_none() => "No image URL received".to_string(),
                    None => "Generation failed".to_string(),
                };
                self.batch_outcomes
                    .push(BatchOutcome::Failed(message.clone()));

                store.dispatch(StoreAction::SetGenerationProgress(GenerationProgress {
                    prompt: job.request.prompt,
                    progress: 0,
                    status: format!("Error: {}", message),
                }));
                store.dispatch(StoreAction::SetGenerating(false));
                self.last_error = Some(message);
                self.clear_progress_at = Some(Instant::now() + self.timings.error_grace);
            }
        }

        if !self.queue.is_empty() {
            self.next_start = Some(Instant::now() + self.timings.batch_gap);
        }
    }
}

/// Worker body: emit the scripted progress steps, then perform the blocking
/// API call and send the terminal outcome. A send failure means the job was
/// cancelled; the worker just stops.
fn run_generation(
    client: Arc<dyn ImageService>,
    request: GenerationRequest,
    step_delay: Duration,
    tx: Sender<GenerationEvent>,
) {
    for (progress, status) in PROGRESS_SCRIPT {
        if tx
            .send(GenerationEvent::Progress {
                progress,
                status: status.to_string(),
            })
            .is_err()
        {
            return;
        }
        thread::sleep(step_delay);
    }

    let response = client.generate(&request);
    let _ = tx.send(GenerationEvent::Done(response));
}
