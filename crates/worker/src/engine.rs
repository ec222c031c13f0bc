use std::sync::Arc;

use ai::Analyzer;
use assignment::AssignmentEngine;
use chrono::Utc;
use db::AssignmentRepo;
use draftfix::DraftFixGenerator;
use notify::{Dispatcher, NotifyEvent};
use scm::RepoRef;
use stacktrace::{parse_stack_trace, StackTrace};
use tracing::warn;
use webhook::NormalizedRecord;

use audit::{correlation_id, AuditLog};

const DRAFT_FIX_CONFIDENCE_GATE: f64 = 85.0;

/// Triage worker: the strictly-sequential parse/analyze/assign/draft/
/// notify/record pipeline, rebuilt against this crate's component traits
/// and structs rather than
/// `original_source/backend/webhook_handler.py`'s
/// `TriageJobQueue._process_job` module-level function calls.
pub struct TriageWorker {
    analyzer: Arc<dyn Analyzer>,
    assignment_engine: Arc<AssignmentEngine>,
    draft_generator: Arc<DraftFixGenerator>,
    dispatcher: Arc<Dispatcher>,
    assignments: AssignmentRepo,
    audit: Arc<AuditLog>,
}

impl TriageWorker {
    #[must_use]
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        assignment_engine: Arc<AssignmentEngine>,
        draft_generator: Arc<DraftFixGenerator>,
        dispatcher: Arc<Dispatcher>,
        assignments: AssignmentRepo,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self { analyzer, assignment_engine, draft_generator, dispatcher, assignments, audit }
    }

    /// Process one job end to end. Any step may fail independently;
    /// failures are logged and the pipeline continues with sentinel
    /// values rather than aborting. A `TriageDecision` row is always
    /// written, reflecting whatever was achieved.
    pub async fn process(&self, record: NormalizedRecord) {
        let job_start = Utc::now();
        let correlation_id = correlation_id(&record.issue_id);

        let trace = parse_stack_trace(&record.body);

        let analysis = self.analyzer.analyze(&record.body, trace.as_ref(), None).await;

        let affected_files = analysis
            .as_ref()
            .map(|a| a.affected_files.clone())
            .filter(|files| !files.is_empty())
            .or_else(|| trace.as_ref().map(StackTrace::file_paths))
            .unwrap_or_default();

        let assignment = self.assignment_engine.decide(&record.issue_id, &record.url, analysis.as_ref(), &affected_files).await;

        let mut draft_url: Option<String> = None;
        if assignment.confidence > DRAFT_FIX_CONFIDENCE_GATE {
            if let Some(analysis) = analysis.as_ref() {
                match RepoRef::parse(&record.repository) {
                    Ok(repo) => {
                        if let Some(draft) =
                            self.draft_generator.generate(&repo, &record.issue_id, analysis, trace.as_ref(), assignment.confidence).await
                        {
                            draft_url = Some(draft.url);
                        }
                    }
                    Err(e) => warn!(correlation_id, error = %e, "could not parse repository for draft fix"),
                }
            }
        }

        let event = build_notify_event(&record, &assignment, &affected_files, draft_url.clone(), &trace);
        self.dispatcher.dispatch(event).await;

        let processing_time_ms = (Utc::now() - job_start).num_milliseconds().max(0);
        self.audit
            .log_triage_decision(
                &record.issue_id,
                &correlation_id,
                trace.as_ref().map(|t| t.error_message.as_str()),
                &affected_files,
                analysis.as_ref().map(|a| a.root_cause_hypothesis.as_str()),
                assignment.confidence,
                draft_url.as_deref(),
                processing_time_ms,
            )
            .await;

        if !assignment.route_to_human {
            if let Some(assignee) = &assignment.assignee {
                if let Err(e) = self.assignments.create(&record.issue_id, &record.url, assignee, assignment.confidence, &assignment.reasoning).await
                {
                    warn!(correlation_id, error = %e, "failed to persist assignment row");
                }
            }
        }
    }
}

fn build_notify_event(
    record: &NormalizedRecord,
    assignment: &assignment::AssignmentDecision,
    affected_files: &[String],
    draft_url: Option<String>,
    trace: &Option<StackTrace>,
) -> NotifyEvent {
    let now = Utc::now();

    if assignment.route_to_human {
        return NotifyEvent::RouteToHuman {
            issue_id: record.issue_id.clone(),
            issue_url: record.url.clone(),
            confidence: assignment.confidence,
            suggested_assignee: assignment.fallbacks.first().map(|c| c.email.clone()),
            reasoning: assignment.reasoning.clone(),
            timestamp: now,
        };
    }

    let file_path = affected_files.first().cloned();
    let line_number = trace.as_ref().and_then(|t| t.most_relevant(1).first().map(|f| f.line_number));

    NotifyEvent::Assignment {
        issue_id: record.issue_id.clone(),
        issue_url: record.url.clone(),
        assignee_email: assignment.assignee.clone().unwrap_or_default(),
        file_path,
        line_number,
        confidence: assignment.confidence,
        priority: assignment.priority.as_str().to_string(),
        estimated_effort: assignment.estimated_effort.as_str().to_string(),
        reasoning: assignment.reasoning.clone(),
        draft_review_url: draft_url,
        timestamp: now,
    }
}
