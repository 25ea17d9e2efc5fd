use std::path::Path;

use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::{
    catalog::{fetch_models, validate_api_key},
    client::GenerativeApi,
    error::{ReelsightError, Result},
    pipeline::{AnalysisOutcome, AnalysisStage, VideoJob, analyze_video},
    prompt::GenerationSettings,
    provider::{Credential, ProviderConfig},
    types::ModelDescriptor,
};

/// Per-session state: the validated credential, its model catalog and the selected model.
///
/// Built once per credential; dropping it discards the credential.
pub struct Session<A> {
    id: Uuid,
    api: A,
    config: ProviderConfig,
    settings: GenerationSettings,
    credential: Credential,
    models: Vec<ModelDescriptor>,
    selected_model: Option<String>,
}

impl<A: GenerativeApi> Session<A> {
    /// Validate the credential, then fetch the catalog once.
    ///
    /// An invalid key fails with [`ReelsightError::InvalidApiKey`] without fetching the catalog.
    pub async fn connect(api: A, config: ProviderConfig, credential: Credential) -> Result<Self> {
        let id = Uuid::new_v4();
        let span = info_span!("session", session = %id);

        async move {
            if !validate_api_key(&api, &credential).await {
                return Err(ReelsightError::InvalidApiKey);
            }
            let models = fetch_models(&api, &credential, &config).await?;
            info!(models = models.len(), "session connected");

            Ok(Self {
                id,
                api,
                config,
                settings: GenerationSettings::default(),
                credential,
                models,
                selected_model: None,
            })
        }
        .instrument(span)
        .await
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn selected_model(&self) -> Option<&ModelDescriptor> {
        let name = self.selected_model.as_deref()?;
        self.models.iter().find(|m| m.name == name)
    }

    /// Select a catalog model by full (`models/x`) or short (`x`) name.
    pub fn select_model(&mut self, name: &str) -> Result<&ModelDescriptor> {
        let model = self
            .models
            .iter()
            .find(|m| m.name == name || m.short_name() == name)
            .ok_or_else(|| ReelsightError::UnknownModel {
                name: name.to_string(),
            })?;
        self.selected_model = Some(model.name.clone());
        Ok(model)
    }

    /// Run one analysis with the selected model.
    ///
    /// Takes `&mut self` so a session has at most one analysis in flight.
    pub async fn analyze<F>(
        &mut self,
        video_path: &Path,
        mime_type: &str,
        prompt: Option<&str>,
        on_stage: F,
    ) -> Result<AnalysisOutcome>
    where
        F: FnMut(AnalysisStage),
    {
        let model_name = self
            .selected_model
            .as_deref()
            .ok_or(ReelsightError::NoModelSelected)?;

        let job = VideoJob {
            model_name,
            video_path,
            mime_type,
            prompt,
        };
        let span = info_span!("analysis", session = %self.id, model = model_name);
        analyze_video(&self.api, &self.credential, job, &self.settings, on_stage)
            .instrument(span)
            .await
    }
}
