//! Concrete frame sources.

#[cfg(feature = "fs")]
pub use self::fs::DirectorySource;
#[cfg(feature = "http")]
pub use self::http::HttpSource;

#[cfg(feature = "fs")]
mod fs {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use crate::error::FetchError;
    use crate::loader::FrameSource;
    use crate::FrameFile;

    /// Frames stored as files under a root directory.
    ///
    /// `colored/frame_0001.txt` resolves to `<root>/colored/frame_0001.txt`.
    #[derive(Clone, Debug)]
    pub struct DirectorySource {
        root: PathBuf,
    }

    impl DirectorySource {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        pub fn root(&self) -> &Path {
            &self.root
        }

        /// Count the frames present under `location`.
        ///
        /// Returns the highest frame number found, so gaps in the numbering
        /// still count toward the set length.
        pub async fn count_frames(&self, location: &str) -> Result<usize, FetchError> {
            let dir = self.root.join(location);
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| FetchError::Unavailable(format!("{}: {e}", dir.display())))?;

            let mut count = 0;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?
            {
                let name = entry.file_name();
                if let Some(index) = name.to_str().and_then(FrameFile::parse_index) {
                    count = count.max(index + 1);
                }
            }
            Ok(count)
        }
    }

    impl FrameSource for DirectorySource {
        async fn fetch_frame(&self, path: &str) -> Result<String, FetchError> {
            let full = self.root.join(path);
            tokio::fs::read_to_string(&full).await.map_err(|e| match e.kind() {
                ErrorKind::NotFound => FetchError::NotFound(full.display().to_string()),
                _ => FetchError::Transport(format!("{}: {e}", full.display())),
            })
        }
    }
}

#[cfg(feature = "http")]
mod http {
    use crate::error::FetchError;
    use crate::loader::FrameSource;

    /// Frames served over HTTP under a base URL.
    ///
    /// Non-2xx responses count as failed frames.
    #[derive(Clone, Debug)]
    pub struct HttpSource {
        client: reqwest::Client,
        base_url: String,
    }

    impl HttpSource {
        /// Create a source rooted at `base_url` (e.g. "https://example.org/frames").
        pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
            let client = reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::limited(10))
                .user_agent(concat!("ascii-frame-player/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| FetchError::Transport(e.to_string()))?;
            Ok(Self::with_client(client, base_url))
        }

        pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
            Self {
                client,
                base_url: base_url.into(),
            }
        }

        /// Full URL of the frame at `path`.
        pub fn frame_url(&self, path: &str) -> String {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }

    impl FrameSource for HttpSource {
        async fn fetch_frame(&self, path: &str) -> Result<String, FetchError> {
            let url = self.frame_url(path);
            let response = self.client.get(&url).send().await.map_err(|e| {
                if e.is_connect() {
                    FetchError::Unavailable(e.to_string())
                } else {
                    FetchError::Transport(e.to_string())
                }
            })?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(url));
            }
            if !status.is_success() {
                return Err(FetchError::Transport(format!("HTTP status: {status}")));
            }

            response
                .text()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))
        }
    }

}
