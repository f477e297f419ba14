//! Batch pipeline: expansion, probing, strategy execution, transcription,
//! and transcript cleaning.
//!
//! Videos are processed strictly one at a time in list order. Per-item
//! failures are logged with the offending reference and the run continues;
//! only configuration problems and transcription failures stop it.

use crate::asr;
use crate::client::{PlatformClient, SpeechEngine};
use crate::collection;
use crate::config::Config;
use crate::probe::{self, ProbeOutcome};
use crate::srt::SubtitleDocument;
use crate::strategy::{self, JobMode};
use eyre::{OptionExt, Result, WrapErr};
use std::fs;
use std::path::Path;
use subtext_asr::asr::Segment;

/// Language hint pinned by the transcription policy.
const TARGET_LANGUAGE: &str = "zh";

/// Process every reference in order: expand collections, pick and execute a
/// strategy per video, then clean all subtitle files into plain transcripts.
pub fn run(
    client: &impl PlatformClient,
    engine: &mut impl SpeechEngine,
    config: &Config,
    refs: &[String],
) -> Result<()> {
    ensure_directories(config)?;

    let videos = collection::flatten(client, refs);
    tracing::info!(videos = videos.len(), "flattened references");

    for (position, video) in videos.iter().enumerate() {
        tracing::info!(
            n = position + 1,
            total = videos.len(),
            url = video.locator(),
            "processing video"
        );
        process_video(client, engine, config, video.locator())?;
    }

    clean_transcripts(config)
}

/// Create the output directories; already existing is not an error.
fn ensure_directories(config: &Config) -> Result<()> {
    for dir in [&config.srt_path, &config.audio_path, &config.out_path] {
        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Run the decision pipeline for one video.
///
/// Returns `Err` only for failures that end the run (transcription and its
/// follow-up writes); probe and download failures are logged and skipped.
fn process_video(
    client: &impl PlatformClient,
    engine: &mut impl SpeechEngine,
    config: &Config,
    url: &str,
) -> Result<()> {
    let catalog = match probe::probe(client, url, config.cookiefile.as_deref()) {
        ProbeOutcome::Available(catalog) => catalog,
        ProbeOutcome::Unavailable => {
            tracing::warn!(url, "caption availability unknown, skipping video");
            return Ok(());
        }
    };

    let resolved = probe::resolve(&catalog, &config.subtitle_langs);
    let job = strategy::select(resolved, config);

    match &job.mode {
        JobMode::Caption { language } => {
            tracing::info!(url, language, "fetching caption track");
        }
        JobMode::Audio => {
            tracing::info!(url, "no preferred caption track, falling back to audio");
        }
    }

    let report = match client.download(url, job.to_options(config)) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(url, error = %err, "download failed, continuing with next video");
            return Ok(());
        }
    };

    if job.mode == JobMode::Audio {
        match report.filepath.as_deref() {
            Some(audio) => transcribe_to_srt(engine, config, Path::new(audio))?,
            None => {
                tracing::error!(url, "platform client did not report the downloaded audio path");
            }
        }
    }

    Ok(())
}

/// Transcribe one audio file and write the subtitle document next to the
/// fetched caption files.
fn transcribe_to_srt(
    engine: &mut impl SpeechEngine,
    config: &Config,
    audio: &Path,
) -> Result<()> {
    let stem = audio
        .file_stem()
        .ok_or_eyre("audio path has no file name")?;
    let srt_path = config
        .srt_path
        .join(format!("{}.srt", stem.to_string_lossy()));

    tracing::info!(audio = %audio.display(), "transcribing");

    let request = asr::transcription_request(TARGET_LANGUAGE);
    let stream = engine.transcribe(audio, &request)?;
    let document = collect_document(stream)?;

    fs::write(&srt_path, document.serialize())
        .wrap_err_with(|| format!("failed to write srt: {}", srt_path.display()))?;

    tracing::info!(path = %srt_path.display(), cues = document.len(), "wrote subtitles");
    Ok(())
}

/// Drain the segment stream into a document in a single pass, surfacing a
/// mid-stream failure after whatever was already consumed.
fn collect_document(stream: impl Iterator<Item = Result<Segment>>) -> Result<SubtitleDocument> {
    let mut failure = None;

    let document = asr::to_document(stream.map_while(|segment| match segment {
        Ok(segment) => {
            tracing::debug!(
                start = segment.start,
                end = segment.end,
                text = %segment.text,
                "segment"
            );
            Some(segment)
        }
        Err(err) => {
            failure = Some(err);
            None
        }
    }));

    match failure {
        Some(err) => Err(err),
        None => Ok(document),
    }
}

/// Parse every subtitle file in the subtitle directory and write its
/// plain-text projection into the output directory, `.srt` becoming `.txt`.
/// Per-file failures are logged and skipped.
fn clean_transcripts(config: &Config) -> Result<()> {
    let mut paths: Vec<_> = fs::read_dir(&config.srt_path)
        .wrap_err_with(|| {
            format!(
                "failed to list subtitle directory: {}",
                config.srt_path.display()
            )
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "srt"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        tracing::warn!(dir = %config.srt_path.display(), "no subtitle files to clean");
        return Ok(());
    }

    for path in &paths {
        if let Err(err) = clean_one(path, &config.out_path) {
            tracing::error!(file = %path.display(), error = %err, "failed to clean transcript");
        }
    }

    Ok(())
}

fn clean_one(path: &Path, out_dir: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read subtitle file: {}", path.display()))?;

    let document = SubtitleDocument::parse(&raw);
    let stem = path
        .file_stem()
        .ok_or_eyre("subtitle path has no file name")?;
    // keep dotted stems intact: "title.ai-zh.srt" cleans to "title.ai-zh.txt"
    let out_path = out_dir.join(format!("{}.txt", stem.to_string_lossy()));

    fs::write(&out_path, document.clean())
        .wrap_err_with(|| format!("failed to write transcript: {}", out_path.display()))?;

    tracing::info!(path = %out_path.display(), "wrote transcript");
    Ok(())
}
