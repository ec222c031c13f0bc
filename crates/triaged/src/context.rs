use std::sync::Arc;

use ai::GeminiAnalyzer;
use anyhow::{Context, Result};
use assignment::AssignmentEngine;
use audit::AuditLog;
use config::Settings;
use db::Db;
use draftfix::DraftFixGenerator;
use expertise::ExpertiseEngine;
use notify::{Dispatcher, SlackDmChannel};
use resilience::DegradationManager;
use scm::GitHubClient;
use tokio::sync::mpsc;
use tracing::info;
use webhook::NormalizedRecord;
use worker::TriageWorker;

/// Everything the HTTP layer and the worker loop need, wired once at
/// startup the way `healer::ci::server::ServerState` bundles its
/// collaborators behind a single `Arc`.
pub struct AppContext {
    pub settings: Settings,
    pub db: Db,
    pub degradation: Arc<DegradationManager>,
    pub worker: Arc<TriageWorker>,
    pub job_sender: mpsc::Sender<NormalizedRecord>,
    pub job_receiver: Option<mpsc::Receiver<NormalizedRecord>>,
}

impl AppContext {
    /// # Errors
    /// Returns an error if the database connection or migrations fail.
    pub async fn build(settings: Settings) -> Result<Self> {
        let db = Db::connect(&settings.database_url).await.context("connecting to database")?;
        let config_store: Arc<dyn config::ConfigStore> = Arc::new(db.system_config.clone());

        let mut degradation = DegradationManager::new(config_store.clone());
        let llm_breaker = degradation.register("llm", GeminiAnalyzer::breaker_config());
        let chat_breaker = degradation.register("chat", Dispatcher::breaker_config());
        degradation.register("source-hosting", resilience::BreakerConfig::default());
        let degradation = Arc::new(degradation);

        let gemini = Arc::new(GeminiAnalyzer::new(
            settings.gemini_api_key.clone().unwrap_or_default(),
            settings.ai_analysis_timeout,
            llm_breaker,
        ));
        let analyzer: Arc<dyn ai::Analyzer> = gemini.clone();
        let text_generator: Arc<dyn ai::TextGenerator> = gemini;

        let github_client = GitHubClient::new(settings.github_token.clone().unwrap_or_default());
        let source_host: Arc<dyn scm::SourceHost> = Arc::new(github_client);

        let expertise_engine = Arc::new(ExpertiseEngine::new(
            settings.repo_dir.clone(),
            settings.git_blame_timeout,
            db.expertise_cache.clone(),
            db.users.clone(),
        ));

        let assignment_engine =
            Arc::new(AssignmentEngine::new(expertise_engine, db.assignments.clone(), config_store.clone()));

        let draft_generator =
            Arc::new(DraftFixGenerator::new(source_host, text_generator, config_store.clone()));

        let slack_channel: Arc<dyn notify::NotifyChannel> = Arc::new(SlackDmChannel::from_env());
        let dispatcher = Arc::new(Dispatcher::new(slack_channel, db.users.clone(), chat_breaker, config_store));

        let audit = Arc::new(AuditLog::new(db.decisions.clone()));

        let triage_worker = Arc::new(TriageWorker::new(
            analyzer,
            assignment_engine,
            draft_generator,
            dispatcher,
            db.assignments.clone(),
            audit,
        ));

        let (job_sender, job_receiver) = worker::channel(worker::DEFAULT_QUEUE_CAPACITY);

        info!(fully_configured = settings.is_fully_configured(), "application context built");

        Ok(Self {
            settings,
            db,
            degradation,
            worker: triage_worker,
            job_sender,
            job_receiver: Some(job_receiver),
        })
    }
}
