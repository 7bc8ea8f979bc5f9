//! Frame storage and the on-disk naming convention.

/// Address of one frame within a source.
///
/// Frames are 0-indexed in memory but 1-indexed in file names:
/// index 0 lives at `<source>/frame_0001.txt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameFile {
    /// Path relative to the source root (e.g., "colored/frame_0001.txt")
    pub path: String,
    /// Filename (e.g., "frame_0001.txt")
    pub name: String,
    /// 0-based frame index
    pub index: usize,
}

impl FrameFile {
    /// Build the address of frame `index` under `source`.
    pub fn for_index(source: &str, index: usize) -> Self {
        let name = format!("frame_{:04}.txt", index + 1);
        let source = source.trim_end_matches('/');
        let path = if source.is_empty() {
            name.clone()
        } else {
            format!("{source}/{name}")
        };
        Self { path, name, index }
    }

    /// Recover the 0-based index from a filename such as "frame_0042.txt".
    ///
    /// Returns `None` for anything that does not follow the convention.
    pub fn parse_index(name: &str) -> Option<usize> {
        let stem = name.strip_prefix("frame_")?.strip_suffix(".txt")?;
        if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        stem.parse::<usize>().ok()?.checked_sub(1)
    }
}

/// Fixed-length sequence of frame texts.
///
/// Pre-sized to N slots; a slot that failed to load holds an empty string
/// but is never missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSet {
    frames: Vec<String>,
}

impl FrameSet {
    /// Create a set of `len` empty slots.
    pub fn with_len(len: usize) -> Self {
        Self {
            frames: vec![String::new(); len],
        }
    }

    /// Store content at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, content: String) {
        if let Some(slot) = self.frames.get_mut(index) {
            *slot = content;
        }
    }

    /// Frame text at `index`, or "" when out of range.
    #[inline]
    pub fn get(&self, index: usize) -> &str {
        self.frames.get(index).map(String::as_str).unwrap_or("")
    }

    /// Number of slots (always N).
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of slots holding non-empty content.
    pub fn filled(&self) -> usize {
        self.frames.iter().filter(|f| !f.is_empty()).count()
    }

    /// Iterate over slot contents in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(String::as_str)
    }
}
