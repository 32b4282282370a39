//! Recording mocks for the core ports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use pixel_qa_core::domain::{ImageAnalysis, ImageInfo};
use pixel_qa_core::ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};

/// Append-only log shared between a mock and the test that inspects it.
///
/// A panic on another thread never hides what was recorded.
struct Log<T>(Arc<Mutex<Vec<T>>>);

impl<T: Clone> Log<T> {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    fn push(&self, item: T) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(item);
    }

    fn snapshot(&self) -> Vec<T> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

enum Entry {
    Image(ImageInfo),
    Failure(String),
}

/// In-memory `ImageSource` yielding prepared images and load failures.
pub struct MockImageSource {
    entries: Vec<Entry>,
    iterations: AtomicUsize,
}

impl MockImageSource {
    /// Creates a source yielding `images` in order.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            entries: images.into_iter().map(Entry::Image).collect(),
            iterations: AtomicUsize::new(0),
        }
    }

    /// Creates a source with nothing to yield.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Appends an item that fails to load with `message`.
    #[must_use]
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.entries.push(Entry::Failure(message.into()));
        self
    }

    /// How many times `images()` was called.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        self.iterations.load(Ordering::SeqCst)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = anyhow::Result<ImageInfo>> + Send + '_> {
        self.iterations.fetch_add(1, Ordering::SeqCst);
        Box::new(self.entries.iter().map(|entry| match entry {
            Entry::Image(info) => Ok(info.clone()),
            Entry::Failure(message) => Err(anyhow::anyhow!("{message}")),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// `ResultOutput` that records every analysis it is handed.
pub struct MockResultOutput {
    analyses: Log<ImageAnalysis>,
    flushes: AtomicUsize,
}

impl MockResultOutput {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            analyses: Log::new(),
            flushes: AtomicUsize::new(0),
        }
    }

    /// Analyses written so far, in order.
    #[must_use]
    pub fn analyses(&self) -> Vec<ImageAnalysis> {
        self.analyses.snapshot()
    }

    /// How many times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, analysis: &ImageAnalysis) -> anyhow::Result<()> {
        self.analyses.push(analysis.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Final counts carried by a `Finished` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedCounts {
    /// Images analyzed.
    pub processed: usize,
    /// Analyzed images flagged as problematic.
    pub problematic: usize,
    /// Images skipped.
    pub skipped: usize,
}

/// `ProgressSink` that records every event.
pub struct MockProgressSink {
    events: Log<ProgressEvent>,
}

impl MockProgressSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self { events: Log::new() }
    }

    /// Events received so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.snapshot()
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    /// Number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// Whether a `Finished` event arrived.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.finished_counts().is_some()
    }

    /// Counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<FinishedCounts> {
        self.events().into_iter().find_map(|e| match e {
            ProgressEvent::Finished {
                processed,
                problematic,
                skipped,
            } => Some(FinishedCounts {
                processed,
                problematic,
                skipped,
            }),
            _ => None,
        })
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events.push(event);
    }
}
