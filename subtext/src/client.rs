//! External collaborator boundaries: the video platform and the speech
//! engine.
//!
//! The pipeline only ever talks to these two traits, so tests can script
//! catalogs and segments without touching the network or a model. The
//! production implementations wrap the pyo3 binding crates.

use eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};
use subtext_asr::asr::{Segment, TranscribeOptions, WhisperEngine};
use subtext_dl::dl::{self, DownloadOptions, DownloadReport, FlatEntry, ProbeReport};

/// Video platform operations the pipeline depends on. Every call blocks
/// until it completes.
pub trait PlatformClient {
    /// Flat, metadata-only listing of a collection's members.
    fn expand(&self, url: &str) -> Result<Vec<FlatEntry>>;

    /// Caption track listing for one video; no media download.
    fn probe(&self, url: &str, cookiefile: Option<&Path>) -> Result<ProbeReport>;

    /// Execute one download job.
    fn download(&self, url: &str, options: DownloadOptions) -> Result<DownloadReport>;
}

/// Speech recognition boundary.
///
/// The returned stream is finite and forward-only; implementations may
/// produce segments incrementally, callers consume the stream exactly once.
pub trait SpeechEngine {
    fn transcribe(
        &mut self,
        audio: &Path,
        request: &TranscribeOptions,
    ) -> Result<Box<dyn Iterator<Item = Result<Segment>> + '_>>;
}

/// Production client over the yt-dlp bindings.
#[derive(Clone, Copy, Debug, Default)]
pub struct YtDlp;

impl PlatformClient for YtDlp {
    fn expand(&self, url: &str) -> Result<Vec<FlatEntry>> {
        dl::expand(url).wrap_err_with(|| format!("failed to expand collection: {url}"))
    }

    fn probe(&self, url: &str, cookiefile: Option<&Path>) -> Result<ProbeReport> {
        dl::probe(url, cookiefile).wrap_err_with(|| format!("failed to probe captions: {url}"))
    }

    fn download(&self, url: &str, options: DownloadOptions) -> Result<DownloadReport> {
        dl::download(url, options).wrap_err_with(|| format!("download failed: {url}"))
    }
}

/// Production engine over the faster-whisper bindings.
///
/// The model is loaded on first use and shared, read-only, by every
/// transcription for the rest of the run.
pub struct FasterWhisper {
    model_path: PathBuf,
    engine: Option<WhisperEngine>,
}

impl FasterWhisper {
    pub fn new(model_path: &Path) -> Self {
        Self {
            model_path: model_path.to_path_buf(),
            engine: None,
        }
    }

    fn engine(&mut self) -> Result<&WhisperEngine> {
        if self.engine.is_none() {
            tracing::info!(model = %self.model_path.display(), "loading speech model");
            let engine = WhisperEngine::load(&self.model_path).wrap_err_with(|| {
                format!("failed to load speech model: {}", self.model_path.display())
            })?;
            self.engine = Some(engine);
        }

        Ok(self.engine.as_ref().expect("engine initialized above"))
    }
}

impl SpeechEngine for FasterWhisper {
    fn transcribe(
        &mut self,
        audio: &Path,
        request: &TranscribeOptions,
    ) -> Result<Box<dyn Iterator<Item = Result<Segment>> + '_>> {
        let display = audio.display().to_string();
        let stream = self
            .engine()?
            .transcribe(audio, request)
            .wrap_err_with(|| format!("transcription failed: {display}"))?;

        Ok(Box::new(stream.map(move |segment| {
            segment.wrap_err_with(|| format!("engine stopped mid-stream: {display}"))
        })))
    }
}
