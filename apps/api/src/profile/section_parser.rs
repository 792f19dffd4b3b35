//! Local Section Parser — rule-based fallback that needs no model call.
//!
//! Splits plain resume text into sections by header keywords. PDFs go through
//! their text layer; image-only documents need the model path.

use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::profile::encoding::MediaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Skills,
    Experience,
    Education,
    Projects,
    Achievements,
}

/// Header keywords per section. Longer phrases are listed after the bare word;
/// matching is "line starts with keyword at a word boundary".
const SECTION_KEYWORDS: &[(Section, &[&str])] = &[
    (
        Section::Skills,
        &["skills", "technical skills", "proficiencies", "technologies"],
    ),
    (
        Section::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "employment history",
            "internships",
        ],
    ),
    (
        Section::Education,
        &["education", "academic background", "academic history"],
    ),
    (
        Section::Projects,
        &["projects", "personal projects", "academic projects"],
    ),
    (
        Section::Achievements,
        &["achievements", "awards", "honors", "accomplishments"],
    ),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedSections {
    pub name: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
    pub projects: Vec<String>,
    pub achievements: Vec<String>,
    pub raw_text: String,
}

impl ParsedSections {
    fn section_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Skills => &mut self.skills,
            Section::Experience => &mut self.experience,
            Section::Education => &mut self.education,
            Section::Projects => &mut self.projects,
            Section::Achievements => &mut self.achievements,
        }
    }
}

/// If the line is a section header, returns the section and any text after
/// a trailing colon ("Skills: Python, SQL").
fn match_header(line: &str) -> Option<(Section, &str)> {
    let trimmed = line.trim();
    let lower = trimmed.to_lowercase();
    for (section, keywords) in SECTION_KEYWORDS {
        for kw in keywords.iter() {
            if !lower.starts_with(kw) {
                continue;
            }
            let rest = &lower[kw.len()..];
            let at_boundary = rest
                .chars()
                .next()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
            if at_boundary {
                // Lowercasing can shift byte offsets for non-ASCII input; only
                // carry inline text when the header itself is ASCII.
                let inline = if trimmed.is_char_boundary(kw.len()) && trimmed[..kw.len()].is_ascii() {
                    trimmed[kw.len()..].trim_start()
                } else {
                    ""
                };
                let inline = inline.strip_prefix(':').map(str::trim).unwrap_or("");
                return Some((*section, inline));
            }
        }
    }
    None
}

/// Splits a content line into items on bullet markers. Hyphens only count as
/// bullets at the start of a line or when spaced (" - "), so "Full-stack" survives.
fn split_items(line: &str) -> Vec<String> {
    let mut items = Vec::new();
    let line = line.trim();
    let line = line
        .strip_prefix(|c| c == '-' || c == '*' || c == '•')
        .unwrap_or(line);
    for chunk in line.split(|c| c == '•' || c == '*') {
        for piece in chunk.split(" - ") {
            let piece = piece.trim();
            if !piece.is_empty() {
                items.push(piece.to_string());
            }
        }
    }
    items
}

/// Parses resume text into sections. The name is the first non-empty line.
pub fn parse_resume_text(text: &str) -> ParsedSections {
    let mut parsed = ParsedSections {
        name: text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string),
        raw_text: text.to_string(),
        ..Default::default()
    };

    let mut current: Option<Section> = None;
    for line in text.lines() {
        if let Some((section, inline)) = match_header(line) {
            current = Some(section);
            if !inline.is_empty() {
                push_items(&mut parsed, section, inline);
            }
            continue;
        }
        if let Some(section) = current {
            push_items(&mut parsed, section, line);
        }
    }
    parsed
}

fn push_items(parsed: &mut ParsedSections, section: Section, line: &str) {
    let items = split_items(line);
    let target = parsed.section_mut(section);
    if section == Section::Skills {
        // Skill lines are usually comma lists
        target.extend(
            items
                .iter()
                .flat_map(|i| i.split(','))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    } else {
        target.extend(items);
    }
}

/// Pulls plain text out of an uploaded resume. Anything other than
/// `text/plain` is classified the same way the extraction path does it.
pub async fn extract_text(content_type: Option<&str>, bytes: &[u8]) -> Result<String, AppError> {
    let is_plain = content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("text/plain"));

    let text = if is_plain {
        String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::Validation("Text resume is not valid UTF-8".to_string()))?
    } else {
        match MediaType::resolve(content_type, bytes)? {
            MediaType::Pdf => {
                let owned = bytes.to_vec();
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&owned))
                    .await
                    .map_err(|e| {
                        AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
                    })?
                    .map_err(|e| {
                        AppError::UnprocessableEntity(format!("Error processing file: {e}"))
                    })?
            }
            MediaType::Jpeg | MediaType::Png => {
                return Err(AppError::UnprocessableEntity(
                    "Image resumes need AI extraction; upload them to /api/v1/profile/resume"
                        .to_string(),
                ))
            }
        }
    };

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Could not extract any text from the document. The file might be empty, corrupted, \
             or an image-only PDF without a text layer."
                .to_string(),
        ));
    }
    debug!("Extracted {} characters of resume text", text.len());
    Ok(text)
}
