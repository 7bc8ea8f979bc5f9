//! Batched frame loading and progress tracking.
//!
//! Frames are requested in fixed-size batches: batches run one after another,
//! requests within a batch run concurrently. A frame that fails to load is
//! stored as an empty string; only a load where every frame fails is an error.

use std::future::Future;

use futures_util::future::join_all;

use crate::error::{FetchError, PlayerError, PlayerResult};
use crate::{FrameFile, FrameSet};

/// Number of concurrent requests per batch.
pub const BATCH_SIZE: usize = 30;

/// Progress information for frame loading.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LoadingProgress {
    /// Number of frames attempted (fetched or failed)
    pub attempted: usize,
    /// Total number of frames to load
    pub total: usize,
}

impl LoadingProgress {
    pub fn new(total: usize) -> Self {
        Self {
            attempted: 0,
            total,
        }
    }

    /// Fraction of frames attempted (0.0 - 1.0).
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.attempted.min(self.total) as f32 / self.total as f32).clamp(0.0, 1.0)
        }
    }

    /// Rounded loading percentage (0-100).
    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.attempted >= self.total
    }

    /// Format the loading message, e.g. "50% - 81/161".
    ///
    /// The frame count is derived from the rounded percentage.
    pub fn message(&self) -> String {
        let percent = self.percent() as f32;
        let shown = (percent * self.total as f32 / 100.0).round() as usize;
        format!("{}% - {}/{}", self.percent(), shown, self.total)
    }
}

/// Trait for async frame data providers.
///
/// Implement this for your I/O mechanism (filesystem, HTTP, fetch API, ...).
///
/// No `Send` bounds, so it works in single-threaded (WASM) contexts too.
pub trait FrameSource {
    /// Read the text of the frame at `path` (e.g. "colored/frame_0001.txt").
    fn fetch_frame(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Load `count` frames from `location`.
///
/// `on_batch` is called with the progress after each batch completes.
/// Returns a [`FrameSet`] with exactly `count` slots, or
/// [`PlayerError::Load`] when no frame could be fetched at all.
#[tracing::instrument(skip(source, on_batch))]
pub async fn load_frame_set<S, F>(
    source: &S,
    location: &str,
    count: usize,
    mut on_batch: F,
) -> PlayerResult<FrameSet>
where
    S: FrameSource,
    F: FnMut(LoadingProgress),
{
    if count == 0 {
        return Err(PlayerError::config("frame_count must be at least 1"));
    }

    let mut frames = FrameSet::with_len(count);
    let mut progress = LoadingProgress::new(count);
    let mut fetched = 0usize;
    let mut last_error: Option<FetchError> = None;

    for batch_start in (0..count).step_by(BATCH_SIZE) {
        let batch_end = (batch_start + BATCH_SIZE).min(count);
        let files: Vec<FrameFile> = (batch_start..batch_end)
            .map(|i| FrameFile::for_index(location, i))
            .collect();

        let results = join_all(files.iter().map(|f| source.fetch_frame(&f.path))).await;

        for (file, result) in files.iter().zip(results) {
            match result {
                Ok(content) => {
                    frames.set(file.index, content);
                    fetched += 1;
                }
                Err(err) => {
                    tracing::debug!(path = %file.path, error = %err, "frame unavailable, using blank");
                    last_error = Some(err);
                }
            }
        }

        progress.attempted = batch_end;
        on_batch(progress);
    }

    if fetched == 0 {
        let cause = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no frames found".to_string());
        tracing::warn!(location, count, %cause, "frame load failed");
        return Err(PlayerError::load(cause));
    }

    if fetched < count {
        tracing::info!(location, fetched, count, "loaded frames with gaps");
    } else {
        tracing::debug!(location, count, "loaded all frames");
    }
    Ok(frames)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// In-memory source that fails a chosen set of frame indices.
    #[derive(Default)]
    pub(crate) struct StubSource {
        pub failing: HashSet<usize>,
        pub fail_all: bool,
        pub requested: RefCell<Vec<String>>,
    }

    impl StubSource {
        pub fn failing(indices: impl IntoIterator<Item = usize>) -> Self {
            Self {
                failing: indices.into_iter().collect(),
                ..Self::default()
            }
        }

        pub fn unreachable() -> Self {
            Self {
                fail_all: true,
                ..Self::default()
            }
        }
    }

    impl FrameSource for StubSource {
        async fn fetch_frame(&self, path: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(path.to_string());
            if self.fail_all {
                return Err(FetchError::Unavailable("connection refused".into()));
            }
            let name = path.rsplit('/').next().unwrap_or(path);
            let index = FrameFile::parse_index(name).unwrap();
            if self.failing.contains(&index) {
                Err(FetchError::NotFound(path.to_string()))
            } else {
                Ok(format!("frame {index}"))
            }
        }
    }

    #[test]
    fn test_loading_progress() {
        let mut progress = LoadingProgress::new(161);
        assert_eq!(progress.percent(), 0);
        assert!(!progress.is_complete());

        progress.attempted = 30;
        assert_eq!(progress.percent(), 19);
        assert_eq!(progress.message(), "19% - 31/161");

        progress.attempted = 161;
        assert!(progress.is_complete());
        assert_eq!(progress.fraction(), 1.0);
        assert_eq!(progress.message(), "100% - 161/161");
    }

    #[tokio::test]
    async fn test_batches_cover_every_frame_in_order() {
        let source = StubSource::default();
        let mut seen = Vec::new();
        let frames = load_frame_set(&source, "colored", 161, |p| seen.push(p.attempted))
            .await
            .unwrap();

        assert_eq!(frames.len(), 161);
        assert_eq!(frames.get(0), "frame 0");
        assert_eq!(frames.get(160), "frame 160");
        assert_eq!(seen, vec![30, 60, 90, 120, 150, 161]);

        let requested = source.requested.borrow();
        assert_eq!(requested.len(), 161);
        assert_eq!(requested[0], "colored/frame_0001.txt");
        assert_eq!(requested[160], "colored/frame_0161.txt");
    }

    #[tokio::test]
    async fn test_failed_frames_become_blank_slots() {
        for failing in [vec![0], vec![5, 6, 7], (0..40).collect::<Vec<_>>(), vec![44]] {
            let source = StubSource::failing(failing.clone());
            let frames = load_frame_set(&source, "m", 45, |_| {}).await.unwrap();
            assert_eq!(frames.len(), 45);
            for i in 0..45 {
                if failing.contains(&i) {
                    assert_eq!(frames.get(i), "");
                } else {
                    assert_eq!(frames.get(i), format!("frame {i}"));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_reaches_one() {
        let source = StubSource::failing([3, 31, 64]);
        let mut fractions = Vec::new();
        load_frame_set(&source, "m", 100, |p| fractions.push(p.fraction()))
            .await
            .unwrap();

        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(fractions.last().copied(), Some(1.0));
    }

    #[tokio::test]
    async fn test_all_frames_failing_is_load_error() {
        let source = StubSource::unreachable();
        let err = load_frame_set(&source, "m", 10, |_| {}).await.unwrap_err();
        assert_eq!(
            err,
            PlayerError::load("source unavailable: connection refused")
        );
    }

    #[tokio::test]
    async fn test_single_frame() {
        let source = StubSource::default();
        let frames = load_frame_set(&source, "m", 1, |_| {}).await.unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames.get(0), "frame 0");
    }
}
