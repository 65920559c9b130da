use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Video container types recognised by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VideoContainer {
    Mkv,
    Mp4,
    Avi,
    M4v,
    Mov,
    Ts,
    Wmv,
    Webm,
}

impl VideoContainer {
    pub const ALL: [VideoContainer; 8] = [
        VideoContainer::Mkv,
        VideoContainer::Mp4,
        VideoContainer::Avi,
        VideoContainer::M4v,
        VideoContainer::Mov,
        VideoContainer::Ts,
        VideoContainer::Wmv,
        VideoContainer::Webm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoContainer::Mkv => "mkv",
            VideoContainer::Mp4 => "mp4",
            VideoContainer::Avi => "avi",
            VideoContainer::M4v => "m4v",
            VideoContainer::Mov => "mov",
            VideoContainer::Ts => "ts",
            VideoContainer::Wmv => "wmv",
            VideoContainer::Webm => "webm",
        }
    }

    /// Container for a path, judged by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<VideoContainer> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for VideoContainer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('.').to_ascii_lowercase();
        VideoContainer::ALL
            .iter()
            .copied()
            .find(|container| container.as_str() == normalized)
            .ok_or_else(|| format!("unknown video container extension '{}'", s))
    }
}

impl TryFrom<String> for VideoContainer {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VideoContainer> for String {
    fn from(value: VideoContainer) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for VideoContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media file discovered by a scan. Only the path outlives the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub link_count: u64,
    pub extension: VideoContainer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive_and_accepts_dot() {
        assert_eq!("MKV".parse::<VideoContainer>(), Ok(VideoContainer::Mkv));
        assert_eq!(".mp4".parse::<VideoContainer>(), Ok(VideoContainer::Mp4));
        assert_eq!(" webm ".parse::<VideoContainer>(), Ok(VideoContainer::Webm));
        assert!("txt".parse::<VideoContainer>().is_err());
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            VideoContainer::from_path(Path::new("/movies/Film (2001)/film.MKV")),
            Some(VideoContainer::Mkv)
        );
        assert_eq!(VideoContainer::from_path(Path::new("/movies/notes.txt")), None);
        assert_eq!(VideoContainer::from_path(Path::new("/movies/README")), None);
    }
}
