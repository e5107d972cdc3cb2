// src/models/content.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentType {
    Pdf,
    Docx,
    Pptx,
    Img,
    Video,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Pdf,
        ContentType::Docx,
        ContentType::Pptx,
        ContentType::Img,
        ContentType::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Pdf => "PDF",
            ContentType::Docx => "DOCX",
            ContentType::Pptx => "PPTX",
            ContentType::Img => "IMG",
            ContentType::Video => "VIDEO",
        }
    }

    /// Tipos MIME aceites no upload para cada tipo de conteúdo.
    pub fn accepted_mime_types(&self) -> &'static [&'static str] {
        match self {
            ContentType::Pdf => &["application/pdf"],
            ContentType::Docx => &[
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "application/msword",
            ],
            ContentType::Pptx => {
                &["application/vnd.openxmlformats-officedocument.presentationml.presentation"]
            }
            ContentType::Img => &["image/jpeg", "image/png"],
            ContentType::Video => &["video/mp4", "video/quicktime"],
        }
    }

    pub fn accepts_mime(&self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        self.accepted_mime_types().iter().any(|m| *m == mime)
    }

    pub fn file_extension(&self, mime: &str) -> &'static str {
        match self {
            ContentType::Pdf => ".pdf",
            ContentType::Docx => ".docx",
            ContentType::Pptx => ".pptx",
            ContentType::Img if mime.eq_ignore_ascii_case("image/png") => ".png",
            ContentType::Img => ".jpg",
            ContentType::Video => ".mp4",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ContentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Metadados de um conteúdo (sem os dados do ficheiro).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: String,
    pub titulo: String,
    pub descricao: String,
    pub tipo: ContentType,
    pub mime_type: String,
    pub tamanho: i64,
    pub folder_id: String,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
}

impl ContentSummary {
    /// Nome sugerido no download: título mais a extensão do tipo, sem duplicar.
    pub fn download_file_name(&self) -> String {
        let ext = self.tipo.file_extension(&self.mime_type);
        if self.titulo.to_ascii_lowercase().ends_with(ext) {
            self.titulo.clone()
        } else {
            format!("{}{}", self.titulo, ext)
        }
    }
}

/// Conteúdo validado, pronto a gravar.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub titulo: String,
    pub tipo: ContentType,
    pub mime_type: String,
    pub folder_id: String,
    pub created_by: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub struct RenameContentPayload {
    #[serde(default)]
    pub titulo: Option<String>,
}
