//! Triage worker: consumes normalized webhook records off an in-process
//! job queue and runs each through the sequential
//! parse/analyze/assign/draft/notify/record pipeline, grounded on
//! `original_source/backend/webhook_handler.py`'s `TriageJobQueue`.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod engine;
mod queue;

pub use engine::TriageWorker;
pub use queue::{channel, run, StopFlag, DEFAULT_QUEUE_CAPACITY};
