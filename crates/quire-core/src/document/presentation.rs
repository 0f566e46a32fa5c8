//! Presentation content: an ordered deck of slides.
//!
//! Serialized as `{ "slides": [{ "id", "title", "content", "background" }] }`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{QuireError, Result};

pub const DEFAULT_SLIDE_BACKGROUND: &str = "#ffffff";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_background() -> String {
    DEFAULT_SLIDE_BACKGROUND.to_string()
}

impl Slide {
    pub fn blank(id: u64) -> Self {
        Slide {
            id,
            title: String::new(),
            content: String::new(),
            background: default_background(),
        }
    }
}

/// Editable slide fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideField {
    Title,
    Content,
    Background,
}

impl FromStr for SlideField {
    type Err = QuireError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(SlideField::Title),
            "content" => Ok(SlideField::Content),
            "background" => Ok(SlideField::Background),
            _ => Err(QuireError::InvalidSetting {
                key: "slide field",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationContent {
    pub slides: Vec<Slide>,
}

impl Default for PresentationContent {
    fn default() -> Self {
        PresentationContent {
            slides: vec![Slide::blank(1)],
        }
    }
}

impl PresentationContent {
    /// Decode stored content. Unreadable content, or a deck with no slides,
    /// yields the default single blank slide.
    pub fn from_content(content: &str) -> Self {
        match serde_json::from_str::<PresentationContent>(content) {
            Ok(deck) if !deck.slides.is_empty() => deck,
            Ok(_) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable presentation content, starting blank");
                Self::default()
            }
        }
    }

    pub fn to_content(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Append a blank slide and return its index.
    ///
    /// Ids come from the current millisecond clock, bumped past the highest
    /// existing id so two slides added in the same millisecond stay distinct.
    pub fn add_slide(&mut self) -> usize {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let next = self
            .slides
            .iter()
            .map(|s| s.id)
            .max()
            .map_or(now, |max| now.max(max.saturating_add(1)));
        self.slides.push(Slide::blank(next));
        self.slides.len() - 1
    }

    pub fn update_slide(&mut self, index: usize, field: SlideField, value: &str) -> Result<()> {
        let slide = self
            .slides
            .get_mut(index)
            .ok_or(QuireError::SlideOutOfRange(index))?;
        let target = match field {
            SlideField::Title => &mut slide.title,
            SlideField::Content => &mut slide.content,
            SlideField::Background => &mut slide.background,
        };
        *target = value.to_string();
        Ok(())
    }

    /// Remove a slide. The last remaining slide is never deleted; returns
    /// whether anything was removed.
    pub fn delete_slide(&mut self, index: usize) -> Result<bool> {
        if index >= self.slides.len() {
            return Err(QuireError::SlideOutOfRange(index));
        }
        if self.slides.len() <= 1 {
            return Ok(false);
        }
        self.slides.remove(index);
        Ok(true)
    }

    /// Clamp a selected slide index after the deck shrank.
    pub fn clamp_selection(&self, current: usize) -> usize {
        current.min(self.slides.len().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deck() {
        let deck = PresentationContent::default();
        assert_eq!(
            deck.to_content().unwrap(),
            r##"{"slides":[{"id":1,"title":"","content":"","background":"#ffffff"}]}"##
        );
    }

    #[test]
    fn test_from_content_fallbacks() {
        assert_eq!(
            PresentationContent::from_content("{"),
            PresentationContent::default()
        );
        assert_eq!(
            PresentationContent::from_content(r#"{"slides":[]}"#),
            PresentationContent::default()
        );
        let deck = PresentationContent::from_content(r#"{"slides":[{"id":7,"title":"Hi"}]}"#);
        assert_eq!(deck.slides[0].title, "Hi");
        assert_eq!(deck.slides[0].background, "#ffffff");
    }

    #[test]
    fn test_add_slide_ids_are_unique() {
        let mut deck = PresentationContent::default();
        let a = deck.add_slide();
        let b = deck.add_slide();
        assert_eq!((a, b), (1, 2));
        assert!(deck.slides[2].id > deck.slides[1].id);
        assert!(deck.slides[1].id > deck.slides[0].id);
    }

    #[test]
    fn test_update_slide() {
        let mut deck = PresentationContent::default();
        deck.update_slide(0, SlideField::Title, "Intro").unwrap();
        deck.update_slide(0, SlideField::Background, "#000000").unwrap();
        assert_eq!(deck.slides[0].title, "Intro");
        assert_eq!(deck.slides[0].background, "#000000");
        assert!(matches!(
            deck.update_slide(3, SlideField::Content, "x"),
            Err(QuireError::SlideOutOfRange(3))
        ));
    }

    #[test]
    fn test_last_slide_is_kept() {
        let mut deck = PresentationContent::default();
        assert!(!deck.delete_slide(0).unwrap());
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_delete_slide_and_clamp() {
        let mut deck = PresentationContent::default();
        deck.add_slide();
        deck.add_slide();
        assert!(deck.delete_slide(2).unwrap());
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.clamp_selection(2), 1);
        assert_eq!(deck.clamp_selection(0), 0);
    }

    #[test]
    fn test_slide_field_parse() {
        assert_eq!("Title".parse::<SlideField>().unwrap(), SlideField::Title);
        assert!("color".parse::<SlideField>().is_err());
    }
}
