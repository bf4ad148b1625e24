//! UI state and the projector that drives it.
//!
//! [`Projector`] is the only writer of [`UiState`]. It turns validator and
//! client outcomes into state transitions; every failure lands back in an
//! idle state showing the placeholder.

use crate::ai::ImageGenerationService;
use crate::image::ImageSource;
use crate::models::ExtractedImage;
use crate::prompt::{self, Prompt};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Filename offered by the download affordance.
pub const DOWNLOAD_FILENAME: &str = "generated_image.png";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub current_image: ImageSource,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl UiState {
    pub fn current_image_source(&self) -> &str {
        self.current_image.as_str()
    }
}

/// Current generated image, offered under [`DOWNLOAD_FILENAME`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: &'static str,
    pub data_url: String,
}

impl Download {
    pub fn bytes(&self) -> Result<Vec<u8>> {
        crate::image::decode_data_url(&self.data_url)
    }

    /// Write the image into `dir` and return the full path.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.filename);
        tokio::fs::write(&path, self.bytes()?).await?;
        info!("Saved image to {}", path.display());
        Ok(path)
    }
}

pub struct Projector {
    service: Box<dyn ImageGenerationService>,
    state: UiState,
}

impl Projector {
    pub fn new(service: Box<dyn ImageGenerationService>) -> Self {
        Self {
            service,
            state: UiState::default(),
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Validate `raw` and enter the loading state.
    ///
    /// An empty prompt sets `last_error` and stays idle. A trigger while a
    /// call is outstanding is rejected with [`Error::Busy`] and changes
    /// nothing.
    pub fn begin(&mut self, raw: &str) -> Result<Prompt> {
        if self.state.is_loading {
            warn!("Ignoring generation trigger while a request is in flight");
            return Err(Error::Busy);
        }

        let prompt = match prompt::validate(raw) {
            Ok(prompt) => prompt,
            Err(e) => {
                error!("Prompt is empty. Please enter a description.");
                self.state.last_error = Some(e.user_message());
                return Err(e);
            }
        };

        self.state.is_loading = true;
        self.state.last_error = None;
        debug!("Generating image for prompt: {}", prompt);
        Ok(prompt)
    }

    /// Apply a generation outcome and leave the loading state.
    pub fn complete(&mut self, outcome: Result<ExtractedImage>) {
        match outcome {
            Ok(image) => {
                let data_url = image.to_data_url();
                info!(
                    "Generated {} image ({} data URL chars)",
                    image.mime_type,
                    data_url.len()
                );
                self.state.current_image = ImageSource::DataUrl(data_url);
            }
            Err(e) => {
                error!("Error generating image: {}", e);
                self.state.last_error = Some(e.user_message());
                self.state.current_image = ImageSource::Placeholder;
            }
        }
        self.state.is_loading = false;
    }

    /// Call the service once for a prompt accepted by [`Projector::begin`]
    /// and project the outcome.
    pub async fn dispatch(&mut self, prompt: Prompt) -> &UiState {
        if !self.state.is_loading {
            warn!("Dispatch without a prior begin, ignoring");
            return &self.state;
        }

        let outcome = self.service.generate(&prompt).await;
        self.complete(outcome);
        &self.state
    }

    /// Validate, call the service once, and project the outcome.
    pub async fn generate(&mut self, raw: &str) -> &UiState {
        match self.begin(raw) {
            Ok(prompt) => self.dispatch(prompt).await,
            Err(_) => &self.state,
        }
    }

    /// The rendering surface could not display the current image.
    pub fn image_load_failed(&mut self) {
        if !self.state.current_image.is_placeholder() {
            error!(
                "Image failed to load ({} chars)",
                self.state.current_image.as_str().len()
            );
            self.state.last_error = Some(Error::ImageLoad(String::new()).user_message());
        }
        self.state.current_image = ImageSource::Placeholder;
    }

    /// Present whenever a generated image is displayed.
    pub fn download(&self) -> Option<Download> {
        match &self.state.current_image {
            ImageSource::Placeholder => None,
            ImageSource::DataUrl(url) => Some(Download {
                filename: DOWNLOAD_FILENAME,
                data_url: url.clone(),
            }),
        }
    }
}
