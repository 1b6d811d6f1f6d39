use crate::types::FormatTag;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PvrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid file: {0}")]
    InvalidFile(String),
    #[error("More than one surface: found {0}")]
    MoreThanOneSurface(u32),
    #[error("Unknown PVR2 pixel type: {0:#04x}")]
    UnknownPixelType(u32),
    #[error("Unsupported PVR3 format: {0}")]
    UnknownFormat(FormatTag),
    #[error("PVRTC decompression failed: {0}")]
    Decompress(String),
}

pub type Result<T> = std::result::Result<T, PvrError>;

/// Outcome codes reported at the load boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    Okay,
    FileNotFound,
    InvalidFile,
    MoreThanOneSurface,
    UnknownType,
}

impl LoadStatus {
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => LoadStatus::Okay,
            Err(e) => e.status(),
        }
    }
}

impl PvrError {
    pub fn status(&self) -> LoadStatus {
        match self {
            PvrError::Io(_) => LoadStatus::FileNotFound,
            PvrError::InvalidFile(_) | PvrError::Decompress(_) => LoadStatus::InvalidFile,
            PvrError::MoreThanOneSurface(_) => LoadStatus::MoreThanOneSurface,
            PvrError::UnknownPixelType(_) | PvrError::UnknownFormat(_) => LoadStatus::UnknownType,
        }
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoadStatus::Okay => "OKAY",
            LoadStatus::FileNotFound => "FILE_NOT_FOUND",
            LoadStatus::InvalidFile => "INVALID_FILE",
            LoadStatus::MoreThanOneSurface => "MORE_THAN_ONE_SURFACE",
            LoadStatus::UnknownType => "UNKNOWN_TYPE",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = PvrError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(not_found.status(), LoadStatus::FileNotFound);
        assert_eq!(
            PvrError::InvalidFile("short".into()).status(),
            LoadStatus::InvalidFile
        );
        assert_eq!(
            PvrError::Decompress("bad blocks".into()).status(),
            LoadStatus::InvalidFile
        );
        assert_eq!(
            PvrError::MoreThanOneSurface(6).status(),
            LoadStatus::MoreThanOneSurface
        );
        assert_eq!(
            PvrError::UnknownPixelType(0xff).status(),
            LoadStatus::UnknownType
        );
        assert_eq!(
            PvrError::UnknownFormat(FormatTag(0xdead)).status(),
            LoadStatus::UnknownType
        );
    }

    #[test]
    fn test_status_of_result() {
        let ok: Result<u32> = Ok(1);
        assert_eq!(LoadStatus::of(&ok), LoadStatus::Okay);

        let err: Result<u32> = Err(PvrError::MoreThanOneSurface(2));
        assert_eq!(LoadStatus::of(&err), LoadStatus::MoreThanOneSurface);
        assert_eq!(LoadStatus::MoreThanOneSurface.to_string(), "MORE_THAN_ONE_SURFACE");
    }
}
