use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

/// Identifier of an attachment, unique within one composer session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(pub u64);

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f-{}", self.0)
    }
}

impl Serialize for AttachmentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What a background read learned about a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preview {
    Image {
        format: String,
        width: u32,
        height: u32,
    },
    Text {
        first_line: String,
    },
}

impl Preview {
    /// One-line description shown next to the file name
    pub fn summary(&self) -> String {
        match self {
            Preview::Image {
                format,
                width,
                height,
            } => format!("{} {}\u{00D7}{}", format, width, height),
            Preview::Text { first_line } => format!("\u{201C}{}\u{201D}", first_line),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub name: String,
    pub size: u64,
    pub mime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
}

impl Attachment {
    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(&self.mime)
    }

    pub fn size_label(&self) -> String {
        format_file_size(self.size)
    }

    /// Whether a background preview is worth generating for this file
    pub fn wants_preview(&self) -> bool {
        self.mime.starts_with("image/") || self.mime.starts_with("text/")
    }
}

/// Coarse file category, used to pick an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Document,
    Spreadsheet,
    Presentation,
    Archive,
    Other,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> FileKind {
        if mime.starts_with("image/") {
            FileKind::Image
        } else if mime == "application/pdf" {
            FileKind::Pdf
        } else if mime.contains("sheet") || mime.contains("excel") {
            FileKind::Spreadsheet
        } else if mime.contains("presentation") || mime.contains("powerpoint") {
            FileKind::Presentation
        } else if mime.contains("word") || mime.contains("document") {
            FileKind::Document
        } else if mime.contains("zip") || mime.contains("compressed") || mime.contains("archive")
        {
            FileKind::Archive
        } else {
            FileKind::Other
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FileKind::Image => "\u{1F5BC}",
            FileKind::Pdf => "PDF",
            FileKind::Document => "DOC",
            FileKind::Spreadsheet => "XLS",
            FileKind::Presentation => "PPT",
            FileKind::Archive => "ZIP",
            FileKind::Other => "FILE",
        }
    }
}

/// Human readable size: bytes, then KB and MB with one decimal.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// Mime type guessed from the file extension.
pub fn guess_mime(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "7z" => "application/x-7z-compressed",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(format_file_size(500), "500 B");
        assert_eq!(format_file_size(845_000), "825.2 KB");
        assert_eq!(format_file_size(2_450_000), "2.3 MB");
    }

    #[test]
    fn kinds_from_mime() {
        assert_eq!(FileKind::from_mime("image/png"), FileKind::Image);
        assert_eq!(FileKind::from_mime("application/pdf"), FileKind::Pdf);
        assert_eq!(FileKind::from_mime(guess_mime("notes.docx")), FileKind::Document);
        assert_eq!(FileKind::from_mime(guess_mime("q3.xlsx")), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_mime(guess_mime("deck.pptx")), FileKind::Presentation);
        assert_eq!(FileKind::from_mime(guess_mime("src.7z")), FileKind::Archive);
        assert_eq!(FileKind::from_mime(guess_mime("blob")), FileKind::Other);
    }

    #[test]
    fn mime_guess_ignores_case() {
        assert_eq!(guess_mime("Mockup.PNG"), "image/png");
    }

    #[test]
    fn id_prints_with_prefix() {
        assert_eq!(AttachmentId(7).to_string(), "f-7");
        assert_eq!(serde_json::to_string(&AttachmentId(7)).unwrap(), "\"f-7\"");
    }

    #[test]
    fn preview_summaries() {
        let image = Preview::Image {
            format: "PNG".into(),
            width: 640,
            height: 480,
        };
        assert_eq!(image.summary(), "PNG 640\u{00D7}480");
    }
}
