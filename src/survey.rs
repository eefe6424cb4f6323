//! Survey form state. Submissions are shown back to the user and then dropped.

use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::error::{Error, Result};

pub const FACULTIES: [&str; 8] = [
    "Fakultas Teknik",
    "Fakultas Ilmu Sosial",
    "Fakultas Bahasa dan Sastra",
    "Fakultas Matematika dan Ilmu Pengetahuan Alam",
    "Fakultas Ekonomi dan Bisnis",
    "Fakultas Psikologi",
    "Fakultas Seni dan Desain",
    "Fakultas Ilmu Pendidikan",
];

pub const GENRES: [&str; 10] = [
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Fantasy",
    "Romance",
    "Slice of Life",
    "Horror",
    "Sci-Fi",
    "Sports",
];

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Nim,
    Faculty,
    Major,
    FavoriteAnime,
    FavoriteCharacter,
    Genre,
    StartDate,
    CharacterImage,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Name,
        FormField::Nim,
        FormField::Faculty,
        FormField::Major,
        FormField::FavoriteAnime,
        FormField::FavoriteCharacter,
        FormField::Genre,
        FormField::StartDate,
        FormField::CharacterImage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Full name",
            FormField::Nim => "NIM",
            FormField::Faculty => "Faculty",
            FormField::Major => "Major",
            FormField::FavoriteAnime => "Favorite anime",
            FormField::FavoriteCharacter => "Favorite character",
            FormField::Genre => "Favorite genre",
            FormField::StartDate => "Started watching (YYYY-MM-DD)",
            FormField::CharacterImage => "Character image (jpg/png path)",
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, FormField::Faculty | FormField::Genre)
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone)]
pub struct SurveyForm {
    pub focus: FormField,
    pub name: String,
    pub nim: String,
    pub faculty_idx: usize,
    pub major: String,
    pub favorite_anime: String,
    pub favorite_character: String,
    pub genre_idx: usize,
    pub start_date: String,
    pub character_image: String,
}

/// What the user sent, echoed back after submit
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub name: String,
    pub nim: String,
    pub faculty: &'static str,
    pub major: String,
    pub favorite_anime: String,
    pub favorite_character: String,
    pub genre: &'static str,
    pub start_date: NaiveDate,
    pub character_image: Option<String>,
}

impl Default for SurveyForm {
    fn default() -> Self {
        Self::with_date(Local::now().date_naive())
    }
}

impl SurveyForm {
    pub fn with_date(date: NaiveDate) -> Self {
        Self {
            focus: FormField::Name,
            name: String::new(),
            nim: String::new(),
            faculty_idx: 0,
            major: String::new(),
            favorite_anime: String::new(),
            favorite_character: String::new(),
            genre_idx: 0,
            start_date: date.format(DATE_FORMAT).to_string(),
            character_image: String::new(),
        }
    }

    pub fn faculty(&self) -> &'static str {
        FACULTIES[self.faculty_idx % FACULTIES.len()]
    }

    pub fn genre(&self) -> &'static str {
        GENRES[self.genre_idx % GENRES.len()]
    }

    /// Text shown for a field, select fields show their current choice
    pub fn display_value(&self, field: FormField) -> &str {
        match field {
            FormField::Faculty => self.faculty(),
            FormField::Genre => self.genre(),
            _ => self.text(field).map(String::as_str).unwrap_or_default(),
        }
    }

    fn text(&self, field: FormField) -> Option<&String> {
        match field {
            FormField::Name => Some(&self.name),
            FormField::Nim => Some(&self.nim),
            FormField::Major => Some(&self.major),
            FormField::FavoriteAnime => Some(&self.favorite_anime),
            FormField::FavoriteCharacter => Some(&self.favorite_character),
            FormField::StartDate => Some(&self.start_date),
            FormField::CharacterImage => Some(&self.character_image),
            FormField::Faculty | FormField::Genre => None,
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Nim => Some(&mut self.nim),
            FormField::Major => Some(&mut self.major),
            FormField::FavoriteAnime => Some(&mut self.favorite_anime),
            FormField::FavoriteCharacter => Some(&mut self.favorite_character),
            FormField::StartDate => Some(&mut self.start_date),
            FormField::CharacterImage => Some(&mut self.character_image),
            FormField::Faculty | FormField::Genre => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.text_mut(self.focus) {
            text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.text_mut(self.focus) {
            text.pop();
        }
    }

    /// Cycle the focused select field; `forward` false goes backwards
    pub fn cycle_option(&mut self, forward: bool) {
        let (idx, len) = match self.focus {
            FormField::Faculty => (&mut self.faculty_idx, FACULTIES.len()),
            FormField::Genre => (&mut self.genre_idx, GENRES.len()),
            _ => return,
        };
        *idx = if forward {
            (*idx + 1) % len
        } else {
            (*idx + len - 1) % len
        };
    }

    pub fn submit(&self) -> Result<Submission> {
        let date_text = self.start_date.trim();
        let start_date = NaiveDate::parse_from_str(date_text, DATE_FORMAT)
            .map_err(|_| Error::InvalidDate(date_text.to_string()))?;

        let image = self.character_image.trim();
        let character_image = if image.is_empty() {
            None
        } else {
            let supported = Path::new(image)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false);
            if !supported {
                return Err(Error::UnsupportedImage(image.to_string()));
            }
            Some(image.to_string())
        };

        info!(genre = self.genre(), faculty = self.faculty(), "Survey submitted");

        Ok(Submission {
            name: self.name.clone(),
            nim: self.nim.clone(),
            faculty: self.faculty(),
            major: self.major.clone(),
            favorite_anime: self.favorite_anime.clone(),
            favorite_character: self.favorite_character.clone(),
            genre: self.genre(),
            start_date,
            character_image,
        })
    }
}

impl Submission {
    /// Label/value pairs for the confirmation panel
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("Name", self.name.clone()),
            ("NIM", self.nim.clone()),
            ("Faculty", self.faculty.to_string()),
            ("Major", self.major.clone()),
            ("Favorite anime", self.favorite_anime.clone()),
            ("Favorite character", self.favorite_character.clone()),
            ("Favorite genre", self.genre.to_string()),
            ("Watching since", self.start_date.format(DATE_FORMAT).to_string()),
        ];
        if let Some(image) = &self.character_image {
            let file_name = Path::new(image)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| image.clone());
            lines.push(("Character image", file_name));
        }
        lines
    }
}
