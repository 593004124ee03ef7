use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("persona_chat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("persona_chat.client.request_errors");
pub(crate) static CLIENT_MALFORMED_RESPONSES: Counter =
    Counter::new("persona_chat.client.malformed_responses");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("persona_chat.client.request_duration_seconds");

pub(crate) static HISTORY_TRUNCATIONS: Counter = Counter::new("persona_chat.history.truncations");
pub(crate) static HISTORY_EVICTED: Moments = Moments::new("persona_chat.history.evicted_messages");

pub(crate) static SESSION_TURNS: Counter = Counter::new("persona_chat.session.turns");
pub(crate) static SESSION_FAILED_TURNS: Counter = Counter::new("persona_chat.session.failed_turns");

pub(crate) static TRANSCRIPT_WRITES: Counter = Counter::new("persona_chat.transcript.writes");
pub(crate) static TRANSCRIPT_WRITE_ERRORS: Counter =
    Counter::new("persona_chat.transcript.write_errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_MALFORMED_RESPONSES);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&HISTORY_TRUNCATIONS);
    collector.register_moments(&HISTORY_EVICTED);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_FAILED_TURNS);

    collector.register_counter(&TRANSCRIPT_WRITES);
    collector.register_counter(&TRANSCRIPT_WRITE_ERRORS);
}
