//! faster-whisper Python API wrappers.
//!
//! Type-safe bindings to `WhisperModel.transcribe` parameters and its segment
//! output. The model is loaded once per [`WhisperEngine`] and reused for
//! every transcription it serves.

use pyo3::exceptions::PyStopIteration;
use pyo3::ffi::c_str;
use pyo3::prelude::*;
use std::path::Path;

/// Compute device the model is loaded on.
const DEVICE: &str = "cuda";
/// Numeric precision used for inference.
const COMPUTE_TYPE: &str = "float32";

/// Voice-activity-detection parameters passed to faster-whisper.
#[derive(Clone, Debug, Default, PartialEq, IntoPyObject)]
pub struct VadParameters {
    pub min_speech_duration_ms: u32,
    pub min_silence_duration_ms: u32,
    pub speech_pad_ms: u32,
    pub threshold: f64,
}

/// Keyword arguments for `WhisperModel.transcribe`.
#[derive(Clone, Debug, Default, PartialEq, IntoPyObject)]
pub struct TranscribeOptions {
    pub language: String,
    pub word_timestamps: bool,
    pub initial_prompt: String,
    pub vad_filter: bool,
    pub vad_parameters: VadParameters,
    pub beam_size: u32,
    pub temperature: f64,
}

/// Timed text segment produced by the engine.
#[derive(Clone, Debug, PartialEq, FromPyObject)]
#[pyo3(from_item_all)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Transcribed text
    pub text: String,
}

impl Segment {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

fn glue(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    PyModule::from_code(py, c_str!(include_str!("./asr.py")), c"asr.py", c"asr")
}

/// A loaded faster-whisper model.
pub struct WhisperEngine {
    model: Py<PyAny>,
}

impl WhisperEngine {
    /// Load the model from a local path onto the fixed device.
    pub fn load(model_path: &Path) -> Result<Self, PyErr> {
        Python::attach(|py| {
            let model = glue(py)?.getattr("load_model")?.call1((
                model_path.to_string_lossy().to_string(),
                DEVICE,
                COMPUTE_TYPE,
            ))?;

            Ok(Self {
                model: model.unbind(),
            })
        })
    }

    /// Start transcribing one audio file.
    ///
    /// Returns immediately with a [`SegmentStream`]; the engine produces
    /// segments as the stream is pulled.
    pub fn transcribe(
        &self,
        audio: &Path,
        opts: &TranscribeOptions,
    ) -> Result<SegmentStream, PyErr> {
        Python::attach(|py| {
            let py_params = opts.clone().into_pyobject(py)?;
            let segments = glue(py)?.getattr("transcribe")?.call1((
                self.model.bind(py),
                audio.to_string_lossy().to_string(),
                py_params,
            ))?;

            Ok(SegmentStream {
                segments: segments.unbind(),
            })
        })
    }
}

/// Finite, forward-only stream of segments from one transcription.
///
/// Wraps the Python generator; each `next` pulls exactly one segment, so the
/// sequence is consumed once, in order, with no random access.
pub struct SegmentStream {
    segments: Py<PyAny>,
}

impl Iterator for SegmentStream {
    type Item = Result<Segment, PyErr>;

    fn next(&mut self) -> Option<Self::Item> {
        Python::attach(|py| {
            match self.segments.bind(py).call_method0("__next__") {
                Ok(item) => Some(item.extract()),
                Err(err) if err.is_instance_of::<PyStopIteration>(py) => None,
                Err(err) => Some(Err(err)),
            }
        })
    }
}
