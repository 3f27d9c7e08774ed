//! Use-case orchestration for resume analysis, outreach generation, and
//! interview coaching.

use crate::ai::{GeminiBackend, GenerationBackend};
use crate::chat::ChatSession;
use crate::compose;
use crate::document::{DocumentNormalizer, DocxTextExtractor, TextExtractor, UploadedDocument};
use crate::models::{
    AnalysisResult, BotRole, ChatParams, Config, HistoryItem, OutreachContent,
};
use crate::storage::{BotConfigStore, FileKvStore, HistoryStore, KvStore};
use crate::{prompts, schema, validate, Error, Result};
use std::sync::Arc;
use tracing::info;

/// Everything the interview-coach surface needs to go live: the generated
/// narrative plus the session handle for subsequent free-form turns.
pub struct InterviewBootstrap {
    pub session: ChatSession,
    pub tell_me_about_yourself: String,
}

impl std::fmt::Debug for InterviewBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterviewBootstrap")
            .field("tell_me_about_yourself", &self.tell_me_about_yourself)
            .finish_non_exhaustive()
    }
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub backend: Arc<dyn GenerationBackend>,
    pub extractor: Box<dyn TextExtractor>,
    pub kv: Arc<dyn KvStore>,
}

/// Coordinates document normalization, configuration resolution, prompt
/// composition, backend calls, and response validation.
///
/// Failures propagate to the caller; nothing here retries. One instance
/// corresponds to one dashboard session.
pub struct App {
    backend: Arc<dyn GenerationBackend>,
    normalizer: DocumentNormalizer,
    configs: BotConfigStore,
    history: HistoryStore,
    outreach_cache: tokio::sync::Mutex<Option<OutreachContent>>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses
    /// that need to inject mocks.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            backend: services.backend,
            normalizer: DocumentNormalizer::new(services.extractor),
            configs: BotConfigStore::new(services.kv.clone()),
            history: HistoryStore::new(services.kv),
            outreach_cache: tokio::sync::Mutex::new(None),
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;

        let backend: Arc<dyn GenerationBackend> = Arc::new(GeminiBackend::new(
            config.gemini_api_key.clone(),
            config.model.clone(),
        ));
        info!("Generation backend: Gemini (model: {})", config.model);

        let kv: Arc<dyn KvStore> = Arc::new(FileKvStore::new(&config.storage_dir)?);

        Ok(Self::with_services(AppServices {
            backend,
            extractor: Box::new(DocxTextExtractor::new()),
            kv,
        }))
    }

    pub fn configs(&self) -> &BotConfigStore {
        &self.configs
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    fn check_inputs(document: &UploadedDocument, job_description: &str) -> Result<()> {
        if job_description.trim().is_empty() {
            return Err(Error::MissingInput("job description"));
        }
        if document.is_empty() {
            return Err(Error::MissingInput("resume document"));
        }
        Ok(())
    }

    /// One-shot resume analysis against a job description.
    ///
    /// The analysis runs under a fixed instruction with default sampling;
    /// unlike outreach and interview it is not user-overridable.
    pub async fn run_analysis(
        &self,
        document: &UploadedDocument,
        job_description: &str,
    ) -> Result<AnalysisResult> {
        Self::check_inputs(document, job_description)?;

        let content = self.normalizer.normalize(document).await?;
        let request = compose::compose(
            prompts::ANALYSIS_SYSTEM,
            None,
            content,
            compose::analysis_context(job_description),
            Some(schema::analysis_schema()),
        );

        info!("Running resume analysis ({} bytes)", document.size_bytes());
        let raw = self.backend.generate(&request).await?;
        let result = validate::validate_analysis(raw.as_deref())?;
        info!(
            "Analysis complete: {} scored {}",
            result.job_title_detected, result.match_score
        );
        Ok(result)
    }

    /// Recruiter outreach copy, memoized per dashboard session: a second
    /// invocation returns the cached copy without re-calling the backend.
    pub async fn run_outreach(
        &self,
        document: &UploadedDocument,
        job_description: &str,
    ) -> Result<OutreachContent> {
        Self::check_inputs(document, job_description)?;

        let mut cache = self.outreach_cache.lock().await;
        if let Some(content) = cache.as_ref() {
            return Ok(content.clone());
        }

        let config = self.configs.resolve(BotRole::Outreach).await?;
        let content_unit = self.normalizer.normalize(document).await?;
        let request = compose::compose(
            config.system_prompt,
            Some(config.temperature),
            content_unit,
            compose::outreach_context(job_description),
            Some(schema::outreach_schema()),
        );

        info!("Generating outreach messages");
        let raw = self.backend.generate(&request).await?;
        let content = validate::validate_outreach(raw.as_deref())?;
        *cache = Some(content.clone());
        Ok(content)
    }

    /// Create the interview-coach session and perform the bootstrap
    /// exchange. A bootstrap failure discards the session; the surface may
    /// open a fresh one later.
    pub async fn bootstrap_interview(
        &self,
        document: &UploadedDocument,
        job_description: &str,
    ) -> Result<InterviewBootstrap> {
        Self::check_inputs(document, job_description)?;

        let content = self.normalizer.normalize(document).await?;
        let config = self.configs.resolve(BotRole::Interview).await?;
        let session = ChatSession::new(self.backend.clone(), ChatParams::from(&config));

        info!("Bootstrapping interview coach session");
        let tell_me_about_yourself = session
            .send_parts(vec![
                content,
                crate::models::ContentUnit::text(compose::bootstrap_context(job_description)),
            ])
            .await?;

        Ok(InterviewBootstrap {
            session,
            tell_me_about_yourself,
        })
    }

    /// Session for the global career-assistant surface. Fixed instruction,
    /// default sampling, no bootstrap exchange.
    pub fn global_chat(&self) -> ChatSession {
        ChatSession::new(
            self.backend.clone(),
            ChatParams {
                system_instruction: prompts::GLOBAL_CHAT_SYSTEM.to_string(),
                temperature: None,
            },
        )
    }

    /// Record a completed analysis for the history view.
    pub async fn record_analysis(
        &self,
        user_id: &str,
        job_description: &str,
        result: AnalysisResult,
    ) -> Result<HistoryItem> {
        self.history.save(user_id, job_description, result).await
    }
}
