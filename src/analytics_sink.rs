use serde::Serialize;
use sutori_core::{AnalyticsEvent, EventSink, SinkRejection};

use crate::host;

#[derive(Serialize)]
struct EventBody<'a> {
    story_id: &'a str,
    kind: &'a str,
    elapsed_ms: f64,
    emitted_at: f64,
}

fn event_body(event: &AnalyticsEvent) -> Result<String, SinkRejection> {
    serde_json::to_string(&EventBody {
        story_id: event.story_id.as_str(),
        kind: event.kind.as_str(),
        elapsed_ms: event.elapsed_ms,
        emitted_at: event.emitted_at,
    })
    .map_err(|err| SinkRejection::new(err.to_string()))
}

/// Development sink: events land in the browser console.
pub(crate) struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn submit(&self, event: AnalyticsEvent) -> Result<(), SinkRejection> {
        let body = event_body(&event)?;
        gloo::console::log!("analytics:", body);
        Ok(())
    }
}

/// Production sink: fire-and-forget POST to the host-configured endpoint.
/// Submission succeeds once the request is dispatched; delivery failures are
/// logged by the host layer and never surface to playback.
pub(crate) struct HttpSink {
    endpoint: String,
}

impl HttpSink {
    pub(crate) fn new(endpoint: String) -> Self {
        Self { endpoint }
    }
}

impl EventSink for HttpSink {
    fn submit(&self, event: AnalyticsEvent) -> Result<(), SinkRejection> {
        let body = event_body(&event)?;
        host::post_analytics(&self.endpoint, body);
        Ok(())
    }
}

pub(crate) fn sink_from_host() -> Box<dyn EventSink> {
    match host::analytics_endpoint() {
        Some(endpoint) => Box::new(HttpSink::new(endpoint)),
        None => Box::new(ConsoleSink),
    }
}
