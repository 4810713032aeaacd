//! Test doubles shared by unit tests.

use std::sync::{Arc, Mutex};

use crate::error::StudioError;
use crate::ports::generative_model::{
    ContentFuture, ContentRequest, ContentResponse, GenerativeModel, InlineImage, Part,
};
use crate::ports::ProjectStorage;
use crate::project::ProjectSnapshot;

type Responder = dyn Fn() -> Result<ContentResponse, StudioError> + Send + Sync;

/// Generative model stub that answers every call the same way and keeps
/// the requests it saw.
#[derive(Clone)]
pub struct StubModel {
    respond: Arc<Responder>,
    seen: Arc<Mutex<Vec<ContentRequest>>>,
}

impl StubModel {
    /// Answer every call with `make()`.
    pub fn new(make: impl Fn() -> Result<ContentResponse, StudioError> + Send + Sync + 'static) -> Self {
        Self { respond: Arc::new(make), seen: Arc::default() }
    }

    /// Answer with a single text part.
    pub fn text(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move || {
            Ok(ContentResponse { parts: vec![Part::Text(text.clone())], finish_reason: None })
        })
    }

    /// Answer with a single inline image part.
    pub fn image(mime_type: &str, data: &str) -> Self {
        let image = InlineImage { mime_type: mime_type.to_string(), data: data.to_string() };
        Self::new(move || {
            Ok(ContentResponse { parts: vec![Part::InlineImage(image.clone())], finish_reason: None })
        })
    }

    /// Answer with a one-shot result; later calls fail with a replay error.
    pub fn respond(result: Result<ContentResponse, StudioError>) -> Self {
        let slot = Mutex::new(Some(result));
        Self::new(move || {
            slot.lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(StudioError::Replayed("stub already used".into())))
        })
    }

    /// Fail every call with an error built by `make`.
    pub fn fail(make: impl Fn() -> StudioError + Send + Sync + 'static) -> Self {
        Self::new(move || Err(make()))
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// The most recent request.
    pub fn last_request(&self) -> ContentRequest {
        self.seen.lock().unwrap().last().cloned().expect("no request was made")
    }
}

impl GenerativeModel for StubModel {
    fn generate_content(&self, request: &ContentRequest) -> ContentFuture<'_> {
        self.seen.lock().unwrap().push(request.clone());
        let result = (self.respond)();
        Box::pin(async move { result })
    }
}

/// In-memory project storage. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<ProjectSnapshot>>>,
    saves: Arc<Mutex<usize>>,
    corrupt: bool,
}

impl MemoryStorage {
    /// Storage whose `load` always fails, as if the snapshot were corrupt.
    pub fn failing_load() -> Self {
        Self { corrupt: true, ..Self::default() }
    }

    /// The stored snapshot, if any.
    pub fn current(&self) -> Option<ProjectSnapshot> {
        self.slot.lock().unwrap().clone()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl ProjectStorage for MemoryStorage {
    fn load(&self) -> Result<Option<ProjectSnapshot>, StudioError> {
        if self.corrupt {
            return Err(StudioError::Config("corrupt snapshot".into()));
        }
        Ok(self.current())
    }

    fn save(&self, snapshot: &ProjectSnapshot) -> Result<(), StudioError> {
        *self.slot.lock().unwrap() = Some(snapshot.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), StudioError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}
