//! Typed Rust bindings to the
//! [faster-whisper](https://github.com/SYSTRAN/faster-whisper) Python library.
//!
//! [`asr::WhisperEngine`] holds a loaded model and turns one audio file into
//! a finite, forward-only stream of timed [`asr::Segment`]s. The stream is
//! produced incrementally by the engine and must be consumed exactly once.
//!
//! ```no_run
//! use subtext_asr::asr::{TranscribeOptions, WhisperEngine};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = WhisperEngine::load(Path::new("./models/small"))?;
//! let opts = TranscribeOptions { language: "zh".to_string(), ..Default::default() };
//!
//! for segment in engine.transcribe(Path::new("episode.wav"), &opts)? {
//!     let segment = segment?;
//!     println!("[{:.2} -> {:.2}] {}", segment.start, segment.end, segment.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod asr;
