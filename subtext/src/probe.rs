//! Caption availability probing and language preference resolution.

use crate::client::PlatformClient;
use std::collections::BTreeMap;
use std::path::Path;
use subtext_dl::dl::{CaptionFormat, ProbeReport};

/// Where a caption track came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackOrigin {
    /// Authored by a person and uploaded with the video
    Manual,
    /// Generated automatically by the platform
    Generated,
}

/// One caption track: its origin plus the platform's opaque format list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionTrack {
    pub origin: TrackOrigin,
    pub formats: Vec<CaptionFormat>,
}

/// Caption tracks available for one video, keyed by language code.
///
/// Built by inserting manual tracks first and automatically generated tracks
/// second, so a generated track wins when both exist for a language.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptionCatalog {
    tracks: BTreeMap<String, CaptionTrack>,
}

impl CaptionCatalog {
    /// Merge the platform's manual and generated listings into one catalog.
    pub fn from_report(report: ProbeReport) -> Self {
        let mut tracks = BTreeMap::new();

        for (language, formats) in report.subtitles {
            tracks.insert(
                language,
                CaptionTrack {
                    origin: TrackOrigin::Manual,
                    formats,
                },
            );
        }
        for (language, formats) in report.automatic_captions {
            tracks.insert(
                language,
                CaptionTrack {
                    origin: TrackOrigin::Generated,
                    formats,
                },
            );
        }

        Self { tracks }
    }

    pub fn contains(&self, language: &str) -> bool {
        self.tracks.contains_key(language)
    }

    pub fn get(&self, language: &str) -> Option<&CaptionTrack> {
        self.tracks.get(language)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Probe result: the merged catalog, or an explicit unavailable marker when
/// the platform could not report availability at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    Available(CaptionCatalog),
    /// Network failure, unsupported locator, or removed video. The caller
    /// warns and skips the video; unavailable never falls through to the
    /// audio path.
    Unavailable,
}

/// Ask the platform which caption tracks exist for `url`. Metadata only; the
/// optional credential is attached when supplied.
pub fn probe(client: &impl PlatformClient, url: &str, cookiefile: Option<&Path>) -> ProbeOutcome {
    match client.probe(url, cookiefile) {
        Ok(report) => ProbeOutcome::Available(CaptionCatalog::from_report(report)),
        Err(err) => {
            tracing::warn!(url, error = %err, "caption probe failed");
            ProbeOutcome::Unavailable
        }
    }
}

/// First preferred language present in the catalog, scanning `prefs` from
/// most to least preferred. `None` when nothing matches or `prefs` is empty.
pub fn resolve<'a>(catalog: &CaptionCatalog, prefs: &'a [String]) -> Option<&'a str> {
    prefs
        .iter()
        .map(String::as_str)
        .find(|&language| catalog.contains(language))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(ext: &str) -> CaptionFormat {
        CaptionFormat {
            ext: Some(ext.to_string()),
            name: None,
            url: None,
        }
    }

    fn report(manual: &[&str], generated: &[&str]) -> ProbeReport {
        ProbeReport {
            subtitles: manual
                .iter()
                .map(|lang| (lang.to_string(), vec![format("srt")]))
                .collect(),
            automatic_captions: generated
                .iter()
                .map(|lang| (lang.to_string(), vec![format("json")]))
                .collect(),
        }
    }

    fn prefs(langs: &[&str]) -> Vec<String> {
        langs.iter().map(|lang| lang.to_string()).collect()
    }

    #[test]
    fn merges_manual_and_generated_tracks() {
        let catalog = CaptionCatalog::from_report(report(&["zh"], &["ai-zh"]));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("zh").unwrap().origin, TrackOrigin::Manual);
        assert_eq!(catalog.get("ai-zh").unwrap().origin, TrackOrigin::Generated);
    }

    /// Pinned policy: on a language-code collision the automatically
    /// generated track overrides the manual one. Changing this precedence
    /// must be a deliberate decision, not a refactoring accident.
    #[test]
    fn generated_track_wins_on_collision() {
        let catalog = CaptionCatalog::from_report(report(&["zh"], &["zh"]));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("zh").unwrap().origin, TrackOrigin::Generated);
    }

    #[test]
    fn resolves_first_preference_present() {
        let catalog = CaptionCatalog::from_report(report(&["en"], &[]));

        assert_eq!(resolve(&catalog, &prefs(&["zh", "en"])), Some("en"));
    }

    #[test]
    fn resolve_order_is_preference_order_not_catalog_order() {
        let catalog = CaptionCatalog::from_report(report(&["aa", "zz"], &[]));

        assert_eq!(resolve(&catalog, &prefs(&["zz", "aa"])), Some("zz"));
    }

    #[test]
    fn resolves_none_without_intersection() {
        let catalog = CaptionCatalog::from_report(report(&["fr"], &[]));

        assert_eq!(resolve(&catalog, &prefs(&["zh", "en"])), None);
    }

    #[test]
    fn resolves_none_for_empty_preferences() {
        let catalog = CaptionCatalog::from_report(report(&["zh"], &[]));

        assert_eq!(resolve(&catalog, &prefs(&[])), None);
    }

    #[test]
    fn resolves_none_for_empty_catalog() {
        let catalog = CaptionCatalog::default();

        assert_eq!(resolve(&catalog, &prefs(&["zh", "en"])), None);
    }
}
