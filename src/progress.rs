//! Timed progress messages shown while a request is outstanding.
//!
//! The messages are decorative: they follow a fixed schedule and say
//! nothing about what the provider is actually doing.

use std::future::Future;
use std::time::Duration;

use tokio::time::{interval_at, Instant};

/// A fixed message schedule for one flow.
#[derive(Debug, Clone, Copy)]
pub struct ProgressScript {
    /// Emitted immediately, before the first tick.
    pub opening: Option<&'static str>,
    /// Emitted one per tick until the request finishes or the list runs out.
    pub messages: &'static [&'static str],
    /// Time between ticks. The first tick comes one interval after start.
    pub interval: Duration,
    /// Emitted when the request succeeds.
    pub completion: &'static str,
    /// Emitted when the request fails.
    pub failure: Option<&'static str>,
}

/// Treatment generation.
pub const BRIEF: ProgressScript = ProgressScript {
    opening: None,
    messages: &[
        "Initializing Art Director...",
        "Analyzing concept...",
        "Simulating lighting setups...",
        "Evaluating chiaroscuro approach...",
        "Testing diffused natural light...",
        "Calculating rim lighting angles...",
        "Selecting optimal setup for gritty realism...",
        "Generating Director's Treatment...",
    ],
    interval: Duration::from_millis(1500),
    completion: "Treatment generated successfully!",
    failure: None,
};

/// Image rendering.
pub const STUDIO: ProgressScript = ProgressScript {
    opening: None,
    messages: &[
        "Initializing neural canvas...",
        "Parsing prompt semantics...",
        "Building 3D scene geometry...",
        "Mapping texture references...",
        "Calculating lighting vectors...",
        "Rendering shadows and reflections...",
        "Applying film grain texture...",
        "Adding atmospheric effects...",
        "Final color grading...",
        "Compositing final render...",
    ],
    interval: Duration::from_millis(2000),
    completion: "Render complete!",
    failure: None,
};

/// Prompt rewriting.
pub const REWRITE: ProgressScript = ProgressScript {
    opening: Some("Initializing rewriter..."),
    messages: &[
        "Deconstructing prompt...",
        "Applying cinematic lens filter...",
        "Enhancing texture vocabulary...",
        "Injecting realism markers...",
        "Adding surface imperfection details...",
        "Finalizing gritty transformation...",
    ],
    interval: Duration::from_millis(1500),
    completion: "Rewrite complete!",
    failure: Some("Error: Rewrite failed"),
};

/// Drive `request` to completion, feeding `emit` from `script` meanwhile.
///
/// No message is emitted after the request resolves except the script's
/// completion or failure line.
pub async fn run_with_progress<T, E, F>(
    script: &ProgressScript,
    mut emit: impl FnMut(&str),
    request: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    if let Some(opening) = script.opening {
        emit(opening);
    }

    tokio::pin!(request);
    let mut ticks = interval_at(Instant::now() + script.interval, script.interval);
    let mut pending = script.messages.iter();

    let result = loop {
        tokio::select! {
            biased;
            result = &mut request => break result,
            _ = ticks.tick(), if !pending.as_slice().is_empty() => {
                if let Some(message) = pending.next() {
                    emit(message);
                }
            }
        }
    };

    match (&result, script.failure) {
        (Ok(_), _) => emit(script.completion),
        (Err(_), Some(failure)) => emit(failure),
        (Err(_), None) => {}
    }
    result
}
