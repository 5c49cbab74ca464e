use anyhow::{Context, Result};
use std::path::Path;

/// Document formats the conversion service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Xlsx,
    Pptx,
    Html,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 5] = [
        DocumentFormat::Pdf,
        DocumentFormat::Docx,
        DocumentFormat::Xlsx,
        DocumentFormat::Pptx,
        DocumentFormat::Html,
    ];

    /// Match a file name against the accepted suffixes, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| lower.ends_with(format.suffix()))
    }

    /// Same check on the last component of a path, without touching the file
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|name| Self::from_name(&name.to_string_lossy()))
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Docx => ".docx",
            DocumentFormat::Xlsx => ".xlsx",
            DocumentFormat::Pptx => ".pptx",
            DocumentFormat::Html => ".html",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Xlsx => "XLSX",
            DocumentFormat::Pptx => "PPTX",
            DocumentFormat::Html => "HTML",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            DocumentFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            DocumentFormat::Html => "text/html",
        }
    }
}

/// Human-readable list of accepted formats, e.g. "PDF, DOCX, XLSX, PPTX, or HTML"
pub fn accepted_formats_label() -> String {
    let labels: Vec<&str> = DocumentFormat::ALL.iter().map(|f| f.label()).collect();
    match labels.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}

/// A document picked by the user, held in memory until it is uploaded
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Read a file from disk, naming it after its last path component
    pub async fn read(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .with_context(|| format!("Path has no file name: {}", path.display()))?;

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(Self::new(name, data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_name(&self.name)
    }
}
