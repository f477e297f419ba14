//! Download strategy selection.
//!
//! Turns a resolver result into a concrete job description, then lowers the
//! job into yt-dlp parameters. Selection is a pure function of its inputs so
//! the whole decision is unit-testable without I/O.

use crate::config::Config;
use std::path::PathBuf;
use subtext_dl::dl::{DownloadOptions, OutputPaths, OutputTemplates};

/// What a download job fetches. Exactly one mode per job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobMode {
    /// Fetch the caption track for exactly this language
    Caption { language: String },
    /// Fetch the worst-quality audio-only format as transcription input
    Audio,
}

/// A concrete, single-use job description for the platform client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadJob {
    pub mode: JobMode,
    pub output_dir: PathBuf,
    pub output_template: String,
    pub include_credential: bool,
}

/// Choose the acquisition strategy for one video.
///
/// A resolved language selects the caption path; otherwise the video falls
/// back to audio download for transcription. Caption retrieval is the only
/// path that uses the credential.
pub fn select(resolved: Option<&str>, config: &Config) -> DownloadJob {
    match resolved {
        Some(language) => DownloadJob {
            mode: JobMode::Caption {
                language: language.to_string(),
            },
            output_dir: config.srt_path.clone(),
            output_template: config.output_template.clone(),
            include_credential: true,
        },
        None => DownloadJob {
            mode: JobMode::Audio,
            output_dir: config.audio_path.clone(),
            output_template: config.output_template.clone(),
            include_credential: false,
        },
    }
}

impl DownloadJob {
    /// Lower the job into yt-dlp parameters.
    ///
    /// Caption mode writes both manually authored and automatically generated
    /// subtitles restricted to the resolved language, with media download
    /// suppressed. Audio mode requests the worst audio-only format with
    /// subtitle writing disabled. The configured proxy, retry count, and
    /// socket timeout are forwarded on every job; no retries happen in this
    /// layer.
    pub fn to_options(&self, config: &Config) -> DownloadOptions {
        let mut opts = DownloadOptions {
            paths: Some(OutputPaths::in_dir(&self.output_dir)),
            outtmpl: Some(OutputTemplates::simple(self.output_template.clone())),
            proxy: config.proxy.clone(),
            retries: Some(config.max_retries),
            socket_timeout: config.timeout,
            quiet: Some(true),
            no_warnings: Some(true),
            ..Default::default()
        };

        match &self.mode {
            JobMode::Caption { language } => {
                opts.skip_download = Some(true);
                opts.writesubtitles = Some(true);
                opts.writeautomaticsub = Some(true);
                opts.subtitleslangs = Some(vec![language.clone()]);
            }
            JobMode::Audio => {
                opts.format = Some("worstaudio".to_string());
                opts.writesubtitles = Some(false);
            }
        }

        if self.include_credential
            && let Some(cookiefile) = config.cookiefile.as_deref()
        {
            opts.cookiefile = Some(cookiefile.to_string_lossy().to_string());
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{self, CaptionCatalog};
    use subtext_dl::dl::ProbeReport;

    fn test_config() -> Config {
        serde_json::from_value(serde_json::json!({
            "srt_path": "./subtitles",
            "audio_path": "./audio",
            "out_path": "./out",
            "model_path": "./models/small",
            "cookiefile": "/tmp/cookies.txt",
            "subtitle_langs": ["zh", "en"],
            "timeout": 30.0
        }))
        .expect("test config must deserialize")
    }

    #[test]
    fn caption_job_restricts_to_resolved_language() {
        let config = test_config();
        let job = select(Some("en"), &config);

        assert_eq!(
            job.mode,
            JobMode::Caption {
                language: "en".to_string()
            }
        );
        assert_eq!(job.output_dir, PathBuf::from("./subtitles"));
        assert!(job.include_credential);

        let opts = job.to_options(&config);
        assert_eq!(opts.skip_download, Some(true));
        assert_eq!(opts.writesubtitles, Some(true));
        assert_eq!(opts.writeautomaticsub, Some(true));
        assert_eq!(opts.subtitleslangs, Some(vec!["en".to_string()]));
        assert_eq!(opts.cookiefile, Some("/tmp/cookies.txt".to_string()));
        assert_eq!(opts.format, None);
    }

    #[test]
    fn audio_job_requests_worst_audio_without_credential() {
        let config = test_config();
        let job = select(None, &config);

        assert_eq!(job.mode, JobMode::Audio);
        assert_eq!(job.output_dir, PathBuf::from("./audio"));
        assert!(!job.include_credential);

        let opts = job.to_options(&config);
        assert_eq!(opts.format, Some("worstaudio".to_string()));
        assert_eq!(opts.writesubtitles, Some(false));
        assert_eq!(opts.writeautomaticsub, None);
        assert_eq!(opts.subtitleslangs, None);
        assert_eq!(opts.skip_download, None);
        assert_eq!(opts.cookiefile, None);
    }

    #[test]
    fn retry_and_timeout_are_forwarded_on_every_job() {
        let config = test_config();

        for resolved in [Some("zh"), None] {
            let opts = select(resolved, &config).to_options(&config);
            assert_eq!(opts.retries, Some(3));
            assert_eq!(opts.socket_timeout, Some(30.0));
        }
    }

    #[test]
    fn proxy_is_forwarded_when_configured() {
        let mut config = test_config();

        let opts = select(None, &config).to_options(&config);
        assert_eq!(opts.proxy, None);

        config.proxy = Some("http://127.0.0.1:7890".to_string());
        let opts = select(None, &config).to_options(&config);
        assert_eq!(opts.proxy, Some("http://127.0.0.1:7890".to_string()));
    }

    #[test]
    fn missing_cookiefile_leaves_credential_unset() {
        let mut config = test_config();
        config.cookiefile = None;

        let opts = select(Some("zh"), &config).to_options(&config);
        assert_eq!(opts.cookiefile, None);
    }

    #[test]
    fn resolver_and_selector_compose_for_a_matching_catalog() {
        let config = test_config();
        let catalog = CaptionCatalog::from_report(ProbeReport {
            subtitles: [("en".to_string(), Vec::new())].into(),
            automatic_captions: Default::default(),
        });

        let resolved = probe::resolve(&catalog, &config.subtitle_langs);
        let job = select(resolved, &config);

        assert_eq!(
            job.mode,
            JobMode::Caption {
                language: "en".to_string()
            }
        );
    }

    #[test]
    fn resolver_and_selector_compose_for_an_empty_catalog() {
        let config = test_config();
        let catalog = CaptionCatalog::default();

        let resolved = probe::resolve(&catalog, &config.subtitle_langs);
        let job = select(resolved, &config);

        assert_eq!(job.mode, JobMode::Audio);
    }
}
