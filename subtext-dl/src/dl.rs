//! yt-dlp Python API wrappers.
//!
//! Type-safe bindings to [yt-dlp](https://github.com/yt-dlp/yt-dlp) `YoutubeDL`
//! parameters and info dicts. All entry points attach to the embedded Python
//! interpreter and block until yt-dlp returns.

use pyo3::ffi::c_str;
use pyo3::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Filename templates using `%(field)s` syntax. Key `default` required.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct OutputTemplates(pub Option<BTreeMap<String, String>>);

impl OutputTemplates {
    /// Create with a single default template.
    pub fn simple(default: String) -> Self {
        Self(Some(BTreeMap::from([("default".to_string(), default)])))
    }
}

/// Download directories passed as yt-dlp `paths`.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct OutputPaths(pub Option<BTreeMap<String, String>>);

impl OutputPaths {
    /// Write everything under one directory.
    pub fn in_dir(home: &Path) -> Self {
        Self(Some(BTreeMap::from([(
            "home".to_string(),
            home.to_string_lossy().to_string(),
        )])))
    }
}

/// yt-dlp download configuration passed to `YoutubeDL(params)`.
///
/// `None` fields are stripped before the params dict reaches yt-dlp, so
/// unset options fall back to yt-dlp's own defaults.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct DownloadOptions {
    pub format: Option<String>,
    pub paths: Option<OutputPaths>,
    pub outtmpl: Option<OutputTemplates>,
    pub writesubtitles: Option<bool>,
    pub writeautomaticsub: Option<bool>,
    pub subtitleslangs: Option<Vec<String>>,
    pub skip_download: Option<bool>,
    pub cookiefile: Option<String>,
    pub proxy: Option<String>,
    pub retries: Option<u32>,
    pub socket_timeout: Option<f64>,
    pub quiet: Option<bool>,
    pub no_warnings: Option<bool>,
}

/// One member of an expanded collection, from flat extraction.
///
/// The glue module normalizes every entry so all keys are present even when
/// the platform omits them.
#[derive(Clone, Debug, PartialEq, Eq, FromPyObject)]
#[pyo3(from_item_all)]
pub struct FlatEntry {
    /// Canonical locator for re-requesting the member
    pub url: Option<String>,
    /// Full page locator, fallback when `url` is absent
    pub webpage_url: Option<String>,
    /// Member title, informational only
    pub title: Option<String>,
}

/// One caption format as reported by the platform for a language.
#[derive(Clone, Debug, PartialEq, Eq, FromPyObject)]
#[pyo3(from_item_all)]
pub struct CaptionFormat {
    pub ext: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Caption track listing for one video: manually authored tracks and
/// automatically generated tracks, each keyed by language code.
#[derive(Clone, Debug, Default, PartialEq, Eq, FromPyObject)]
#[pyo3(from_item_all)]
pub struct ProbeReport {
    pub subtitles: BTreeMap<String, Vec<CaptionFormat>>,
    pub automatic_captions: BTreeMap<String, Vec<CaptionFormat>>,
}

/// Essential metadata from the info dict of an executed download job.
#[derive(Clone, Debug, FromPyObject)]
#[pyo3(from_item_all)]
pub struct DownloadReport {
    /// Video identifier (required by yt-dlp)
    pub id: String,
    /// Video title (required by yt-dlp)
    pub title: String,
    /// Extension of the downloaded artifact
    pub ext: Option<String>,
    /// Path of the downloaded media file; absent for caption-only jobs
    pub filepath: Option<String>,
    /// URL to the video webpage
    pub webpage_url: Option<String>,
    /// Length of the video in seconds
    pub duration: Option<f64>,
}

fn glue(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    PyModule::from_code(py, c_str!(include_str!("./dl.py")), c"dl.py", c"dl")
}

/// List a collection's members without downloading any media.
///
/// Uses `extract_info` in flat mode; the returned entries preserve the
/// platform's reported order.
pub fn expand(url: &str) -> Result<Vec<FlatEntry>, PyErr> {
    Python::attach(|py| glue(py)?.getattr("expand")?.call1((url,))?.extract())
}

/// List the caption tracks available for one video.
///
/// Metadata-only request; the optional cookie file is attached when given.
pub fn probe(url: &str, cookiefile: Option<&Path>) -> Result<ProbeReport, PyErr> {
    Python::attach(|py| {
        let cookie = cookiefile.map(|path| path.to_string_lossy().to_string());
        glue(py)?.getattr("probe")?.call1((url, cookie))?.extract()
    })
}

/// Execute one download job and return the info dict.
///
/// Uses `extract_info(url, download=True)` to run the job and get metadata
/// in one request.
pub fn download(url: &str, opts: DownloadOptions) -> Result<DownloadReport, PyErr> {
    Python::attach(|py| {
        let py_params = opts.into_pyobject(py)?;
        glue(py)?
            .getattr("download")?
            .call1((url, py_params))?
            .extract()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::types::PyAnyMethods;
    use std::ffi::CStr;

    /// Compare Python object with dict/list literal using recursive equality.
    #[track_caller]
    fn assert_py_eq(py: Python, py_obj: &Bound<PyAny>, expected: &'static CStr) {
        let py_expected = py.eval(expected, None, None).unwrap();
        assert!(py_obj.eq(&py_expected).unwrap());
    }

    #[test]
    fn output_templates_default() {
        Python::attach(|py| {
            let templates = OutputTemplates::default();
            let py_obj = templates.into_pyobject(py).unwrap();
            assert!(py_obj.is_none());
        });
    }

    #[test]
    fn output_templates_simple() {
        Python::attach(|py| {
            let templates = OutputTemplates::simple("%(title)s.%(ext)s".to_string());
            let py_obj = templates.into_pyobject(py).unwrap();
            assert_py_eq(py, py_obj.as_any(), c"{'default': '%(title)s.%(ext)s'}");
        });
    }

    #[test]
    fn paths_in_dir() {
        Python::attach(|py| {
            let paths = OutputPaths::in_dir(Path::new("/data/subtitles"));
            let py_obj = paths.into_pyobject(py).unwrap();
            assert_py_eq(py, py_obj.as_any(), c"{'home': '/data/subtitles'}");
        });
    }

    #[test]
    fn caption_options() {
        Python::attach(|py| {
            let opts = DownloadOptions {
                writesubtitles: Some(true),
                writeautomaticsub: Some(true),
                subtitleslangs: Some(vec!["ai-zh".to_string()]),
                skip_download: Some(true),
                cookiefile: Some("/tmp/cookies.txt".to_string()),
                quiet: Some(true),
                ..Default::default()
            };
            let py_obj = opts.into_pyobject(py).unwrap();
            assert_py_eq(
                py,
                py_obj.as_any(),
                c"{'format': None, 'paths': None, 'outtmpl': None, 'writesubtitles': True, 'writeautomaticsub': True, 'subtitleslangs': ['ai-zh'], 'skip_download': True, 'cookiefile': '/tmp/cookies.txt', 'proxy': None, 'retries': None, 'socket_timeout': None, 'quiet': True, 'no_warnings': None}",
            );
        });
    }

    #[test]
    fn audio_options() {
        Python::attach(|py| {
            let opts = DownloadOptions {
                format: Some("worstaudio".to_string()),
                writesubtitles: Some(false),
                proxy: Some("http://127.0.0.1:7890".to_string()),
                retries: Some(3),
                socket_timeout: Some(30.0),
                ..Default::default()
            };
            let py_obj = opts.into_pyobject(py).unwrap();
            assert_py_eq(
                py,
                py_obj.as_any(),
                c"{'format': 'worstaudio', 'paths': None, 'outtmpl': None, 'writesubtitles': False, 'writeautomaticsub': None, 'subtitleslangs': None, 'skip_download': None, 'cookiefile': None, 'proxy': 'http://127.0.0.1:7890', 'retries': 3, 'socket_timeout': 30.0, 'quiet': None, 'no_warnings': None}",
            );
        });
    }

    #[test]
    fn flat_entry_from_dict() {
        Python::attach(|py| {
            let obj = py
                .eval(
                    c"{'url': 'https://x/video/av1', 'webpage_url': None, 'title': 'ep1'}",
                    None,
                    None,
                )
                .unwrap();
            let entry: FlatEntry = obj.extract().unwrap();
            assert_eq!(entry.url.as_deref(), Some("https://x/video/av1"));
            assert_eq!(entry.webpage_url, None);
            assert_eq!(entry.title.as_deref(), Some("ep1"));
        });
    }

    #[test]
    fn probe_report_from_dict() {
        Python::attach(|py| {
            let obj = py
                .eval(
                    c"{'subtitles': {'zh': [{'ext': 'srt', 'name': 'Chinese', 'url': None}]}, 'automatic_captions': {}}",
                    None,
                    None,
                )
                .unwrap();
            let report: ProbeReport = obj.extract().unwrap();
            assert_eq!(report.subtitles.len(), 1);
            assert!(report.automatic_captions.is_empty());
            assert_eq!(report.subtitles["zh"][0].ext.as_deref(), Some("srt"));
        });
    }

    #[test]
    #[ignore = "network I/O"]
    fn expands_a_real_collection() {
        let entries =
            expand("https://space.bilibili.com/1/favlist?fid=1").expect("expansion failed");
        assert!(entries.iter().all(|e| e.url.is_some() || e.webpage_url.is_some()));
    }
}
