use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::backend::MediaFile;
use crate::error::{Result, ValidationIssue};

/// Largest accepted upload: 5 MiB.
pub const MAX_REPORT_BYTES: u64 = 5 * 1024 * 1024;

/// File extensions the picker accepts, with the media type each maps to.
pub const ACCEPTED_EXTENSIONS: [(&str, ReportMediaType); 4] = [
    ("pdf", ReportMediaType::Pdf),
    ("jpg", ReportMediaType::Jpeg),
    ("jpeg", ReportMediaType::Jpeg),
    ("png", ReportMediaType::Png),
];

/// Media types a report may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportMediaType {
    Pdf,
    Jpeg,
    Png,
}

impl ReportMediaType {
    /// Parse a declared MIME type. `image/jpg` is accepted as a JPEG alias.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "application/pdf" => Some(ReportMediaType::Pdf),
            "image/jpeg" | "image/jpg" => Some(ReportMediaType::Jpeg),
            "image/png" => Some(ReportMediaType::Png),
            _ => None,
        }
    }

    /// Infer the media type from a file extension, as the file picker filter does.
    pub fn from_extension(extension: &str) -> Option<Self> {
        ACCEPTED_EXTENSIONS
            .iter()
            .find(|(accepted, _)| accepted.eq_ignore_ascii_case(extension))
            .map(|(_, media_type)| *media_type)
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportMediaType::Pdf => "application/pdf",
            ReportMediaType::Jpeg => "image/jpeg",
            ReportMediaType::Png => "image/png",
        }
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, ReportMediaType::Pdf)
    }
}

impl fmt::Display for ReportMediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// A validated medical report upload.
///
/// Construction is the acceptance check: a `ReportFile` always has an
/// allowed media type and fits the size limit.
#[derive(Clone, PartialEq, Eq)]
pub struct ReportFile {
    name: String,
    media_type: ReportMediaType,
    bytes: Vec<u8>,
}

impl fmt::Debug for ReportFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ReportFile {
    /// Accept an upload with a declared MIME type.
    ///
    /// # Errors
    ///
    /// `UnsupportedFileType` unless the type is PDF, JPEG or PNG;
    /// `FileTooLarge` above [`MAX_REPORT_BYTES`].
    pub fn new(name: impl Into<String>, mime_type: &str, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let media_type = ReportMediaType::from_mime(mime_type).ok_or_else(|| {
            warn!(file = %name, mime_type, "Rejected report with unsupported type");
            ValidationIssue::UnsupportedFileType {
                mime_type: mime_type.to_string(),
            }
        })?;
        check_size(&name, bytes.len() as u64)?;

        debug!(file = %name, %media_type, size = bytes.len(), "Accepted report file");
        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }

    /// Load a report from disk, inferring its type from the extension.
    ///
    /// The size is checked from metadata before the file is read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = ReportMediaType::from_extension(&extension).ok_or_else(|| {
            warn!(file = %name, extension = %extension, "Rejected report with unsupported extension");
            ValidationIssue::UnsupportedFileType {
                mime_type: format!(".{}", extension),
            }
        })?;

        check_size(&name, std::fs::metadata(path)?.len())?;
        let bytes = std::fs::read(path)?;
        Self::new(name, media_type.mime_type(), bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> ReportMediaType {
        self.media_type
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Base64-encode the contents for inline attachment.
    pub fn encode(&self) -> MediaFile {
        MediaFile::from_bytes(&self.bytes, self.media_type.mime_type())
    }
}

fn check_size(name: &str, size: u64) -> Result<()> {
    if size > MAX_REPORT_BYTES {
        warn!(file = %name, size, limit = MAX_REPORT_BYTES, "Rejected oversized report");
        return Err(ValidationIssue::FileTooLarge {
            size,
            limit: MAX_REPORT_BYTES,
        }
        .into());
    }
    Ok(())
}

/// A selected report, encoded once, with an optional image preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedReport {
    pub file: ReportFile,
    pub payload: MediaFile,
    /// `data:` URL for images; PDFs have none
    pub preview: Option<String>,
}

impl From<ReportFile> for EncodedReport {
    fn from(file: ReportFile) -> Self {
        let payload = file.encode();
        let preview = file.media_type().is_image().then(|| payload.data_url());
        Self {
            file,
            payload,
            preview,
        }
    }
}
