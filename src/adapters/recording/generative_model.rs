//! Recording adapter for the `GenerativeModel` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::generative_model::{ContentFuture, ContentRequest, GenerativeModel};

/// Records generate-content interactions while delegating to an inner model.
pub struct RecordingGenerativeModel {
    inner: Box<dyn GenerativeModel>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingGenerativeModel {
    /// Creates a new recording model wrapping the given implementation.
    pub fn new(inner: Box<dyn GenerativeModel>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl GenerativeModel for RecordingGenerativeModel {
    fn generate_content(&self, request: &ContentRequest) -> ContentFuture<'_> {
        let request_clone = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.generate_content(&request_clone).await;
            record_result(&recorder, "generative_model", "generate_content", &request_clone, &result);
            result
        })
    }
}
