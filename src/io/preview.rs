use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use crate::model::attachment::{AttachmentId, Preview};
use crate::util::unicode::ellipsize_chars;

/// Bytes read from a file when building its preview
const PREVIEW_READ_LIMIT: u64 = 64 * 1024;
/// Longest first line kept for a text preview
const TEXT_PREVIEW_CHARS: usize = 60;

/// A preview finished on a background thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewReady {
    pub id: AttachmentId,
    pub preview: Preview,
}

/// Builds attachment previews off the UI thread.
/// Call `poll()` each tick to collect finished previews.
pub struct PreviewLoader {
    tx: mpsc::Sender<PreviewReady>,
    rx: mpsc::Receiver<PreviewReady>,
}

impl Default for PreviewLoader {
    fn default() -> Self {
        PreviewLoader::new()
    }
}

impl PreviewLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        PreviewLoader { tx, rx }
    }

    /// Read `path` in the background. Files that yield no preview send nothing.
    pub fn request(&self, id: AttachmentId, path: PathBuf, mime: String) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            if let Some(preview) = load_preview(&path, &mime) {
                // The loader may be gone by now; nothing to do then
                let _ = tx.send(PreviewReady { id, preview });
            }
        });
    }

    /// Non-blocking poll for finished previews (may be empty).
    pub fn poll(&self) -> Vec<PreviewReady> {
        let mut ready = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            ready.push(item);
        }
        ready
    }
}

/// Build a preview for an image or text file. Unreadable or unrecognized
/// files give `None`.
pub fn load_preview(path: &Path, mime: &str) -> Option<Preview> {
    let file = File::open(path).ok()?;
    let mut bytes = Vec::new();
    file.take(PREVIEW_READ_LIMIT).read_to_end(&mut bytes).ok()?;
    if mime.starts_with("image/") {
        image_preview(&bytes)
    } else if mime.starts_with("text/") {
        text_preview(&bytes)
    } else {
        None
    }
}

/// Format and pixel size from a PNG, GIF or JPEG header.
pub fn image_preview(bytes: &[u8]) -> Option<Preview> {
    let (format, width, height) = png_size(bytes)
        .map(|(w, h)| ("PNG", w, h))
        .or_else(|| gif_size(bytes).map(|(w, h)| ("GIF", w, h)))
        .or_else(|| jpeg_size(bytes).map(|(w, h)| ("JPEG", w, h)))?;
    Some(Preview::Image {
        format: format.to_string(),
        width,
        height,
    })
}

/// First non-blank line of a text file.
pub fn text_preview(bytes: &[u8]) -> Option<Preview> {
    let text = String::from_utf8_lossy(bytes);
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    Some(Preview::Text {
        first_line: ellipsize_chars(line, TEXT_PREVIEW_CHARS),
    })
}

fn png_size(b: &[u8]) -> Option<(u32, u32)> {
    const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
    if b.len() < 24 || !b.starts_with(SIGNATURE) || &b[12..16] != b"IHDR" {
        return None;
    }
    let w = u32::from_be_bytes([b[16], b[17], b[18], b[19]]);
    let h = u32::from_be_bytes([b[20], b[21], b[22], b[23]]);
    Some((w, h))
}

fn gif_size(b: &[u8]) -> Option<(u32, u32)> {
    if b.len() < 10 || !(b.starts_with(b"GIF87a") || b.starts_with(b"GIF89a")) {
        return None;
    }
    let w = u16::from_le_bytes([b[6], b[7]]);
    let h = u16::from_le_bytes([b[8], b[9]]);
    Some((u32::from(w), u32::from(h)))
}

fn jpeg_size(b: &[u8]) -> Option<(u32, u32)> {
    if b.len() < 4 || b[0] != 0xFF || b[1] != 0xD8 {
        return None;
    }
    let mut i = 2;
    while i + 4 <= b.len() {
        if b[i] != 0xFF {
            return None;
        }
        let marker = b[i + 1];
        // Fill bytes between segments
        if marker == 0xFF {
            i += 1;
            continue;
        }
        let len = usize::from(u16::from_be_bytes([b[i + 2], b[i + 3]]));
        let is_sof = (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_sof {
            if i + 9 > b.len() {
                return None;
            }
            let h = u16::from_be_bytes([b[i + 5], b[i + 6]]);
            let w = u16::from_be_bytes([b[i + 7], b[i + 8]]);
            return Some((u32::from(w), u32::from(h)));
        }
        i += 2 + len;
    }
    None
}
