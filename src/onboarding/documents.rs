//! Required document attachments and the per-file size ceiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Per-file upload limit (1 MiB).
pub const MAX_DOCUMENT_BYTES: u64 = 1_048_576;

/// One of the seven required attachment points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentSlot {
    Resume,
    Photo,
    Aadhaar,
    Pan,
    SscMemo,
    InterMemo,
    DegreeOrSemesterMemo,
}

impl DocumentSlot {
    /// All slots, in form order.
    pub const ALL: [DocumentSlot; 7] = [
        DocumentSlot::Resume,
        DocumentSlot::Photo,
        DocumentSlot::Aadhaar,
        DocumentSlot::Pan,
        DocumentSlot::SscMemo,
        DocumentSlot::InterMemo,
        DocumentSlot::DegreeOrSemesterMemo,
    ];

    fn index(&self) -> usize {
        *self as usize
    }

    /// Slot identifier used in validation reports and commands.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::Photo => "photo",
            Self::Aadhaar => "aadhaar",
            Self::Pan => "pan",
            Self::SscMemo => "sscMemo",
            Self::InterMemo => "interMemo",
            Self::DegreeOrSemesterMemo => "degreeOrSemesterMemo",
        }
    }

    /// Name of the multipart file part carrying this slot.
    pub fn part_name(&self) -> &'static str {
        match self {
            Self::DegreeOrSemesterMemo => "degreeDoc",
            other => other.key(),
        }
    }

    /// Display label. The final slot's label depends on graduation status.
    pub fn label(&self, graduated: bool) -> &'static str {
        match self {
            Self::Resume => "Resume / CV",
            Self::Photo => "Passport Size Photo",
            Self::Aadhaar => "Aadhaar Card",
            Self::Pan => "PAN Card",
            Self::SscMemo => "10th Class Memo",
            Self::InterMemo => "Intermediate Memo",
            Self::DegreeOrSemesterMemo if graduated => "Degree Certificate / OD",
            Self::DegreeOrSemesterMemo => "Latest Semester Marks Memo",
        }
    }

    /// File-picker filter hint. Advisory only; never enforced.
    pub fn accept_hint(&self) -> &'static str {
        match self {
            Self::Resume => ".pdf,.doc,.docx",
            Self::Photo => "image/*",
            _ => ".pdf,.jpg,.png",
        }
    }
}

impl std::fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for DocumentSlot {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentSlot::ALL
            .into_iter()
            .find(|slot| slot.key().eq_ignore_ascii_case(s) || slot.part_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DocumentError::UnknownSlot(s.to_string()))
    }
}

/// A selected file, held in memory until submission.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub name: String,
    pub byte_size: u64,
    pub mime_hint: String,
    pub contents: Vec<u8>,
}

impl DocumentFile {
    /// Create a file from in-memory contents; the mime hint is derived from
    /// the file name's extension.
    pub fn new(name: impl Into<String>, contents: Vec<u8>) -> Self {
        let name = name.into();
        Self {
            mime_hint: mime_hint_for(&name).to_string(),
            byte_size: contents.len() as u64,
            name,
            contents,
        }
    }

    /// Read a file from disk. The size is checked from metadata first, so an
    /// oversized file is refused without its contents ever being loaded.
    pub async fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let io_err = |source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        let size = tokio::fs::metadata(path).await.map_err(io_err)?.len();
        if size > MAX_DOCUMENT_BYTES {
            return Err(DocumentError::TooLarge {
                name,
                size,
                limit: MAX_DOCUMENT_BYTES,
            });
        }

        let contents = tokio::fs::read(path).await.map_err(io_err)?;
        Ok(Self::new(name, contents))
    }
}

// Contents are omitted; debug output lands in logs.
impl std::fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFile")
            .field("name", &self.name)
            .field("byte_size", &self.byte_size)
            .field("mime_hint", &self.mime_hint)
            .finish()
    }
}

fn mime_hint_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// The seven required attachments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSlotSet {
    slots: [Option<DocumentFile>; 7],
}

impl DocumentSlotSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a file to a slot. An oversized file is refused and the slot is
    /// emptied, even if it previously held a valid file.
    pub fn bind(&mut self, slot: DocumentSlot, file: DocumentFile) -> Result<(), DocumentError> {
        if file.byte_size > MAX_DOCUMENT_BYTES {
            self.clear(slot);
            tracing::warn!(
                slot = %slot,
                bytes = file.byte_size,
                limit = MAX_DOCUMENT_BYTES,
                "Refused oversized document"
            );
            return Err(DocumentError::TooLarge {
                name: file.name,
                size: file.byte_size,
                limit: MAX_DOCUMENT_BYTES,
            });
        }
        tracing::debug!(slot = %slot, bytes = file.byte_size, name = %file.name, "Document bound");
        self.slots[slot.index()] = Some(file);
        Ok(())
    }

    /// Empty a slot.
    pub fn clear(&mut self, slot: DocumentSlot) {
        self.slots[slot.index()] = None;
    }

    pub fn get(&self, slot: DocumentSlot) -> Option<&DocumentFile> {
        self.slots[slot.index()].as_ref()
    }

    pub fn is_bound(&self, slot: DocumentSlot) -> bool {
        self.get(slot).is_some()
    }

    /// Slots with their current binding, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (DocumentSlot, Option<&DocumentFile>)> {
        DocumentSlot::ALL.into_iter().map(|slot| (slot, self.get(slot)))
    }

    pub fn missing_slots(&self) -> Vec<DocumentSlot> {
        self.iter()
            .filter(|(_, file)| file.is_none())
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Succeeds only when all seven slots are bound.
    pub fn validate(&self) -> Result<(), Vec<DocumentSlot>> {
        let missing = self.missing_slots();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}
