//! Formatted text model: `Text`, its builder, and the elements that append to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The legacy chat colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Reset,
}

impl TextColor {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::DarkBlue => "dark_blue",
            Self::DarkGreen => "dark_green",
            Self::DarkAqua => "dark_aqua",
            Self::DarkRed => "dark_red",
            Self::DarkPurple => "dark_purple",
            Self::Gold => "gold",
            Self::Gray => "gray",
            Self::DarkGray => "dark_gray",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Aqua => "aqua",
            Self::Red => "red",
            Self::LightPurple => "light_purple",
            Self::Yellow => "yellow",
            Self::White => "white",
            Self::Reset => "reset",
        }
    }
}

/// Style flags. `None` means "inherit from the parent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextStyle {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub obfuscated: Option<bool>,
}

impl TextStyle {
    pub const NONE: TextStyle = TextStyle {
        bold: None,
        italic: None,
        underline: None,
        strikethrough: None,
        obfuscated: None,
    };

    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Self::NONE
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: Some(true),
            ..Self::NONE
        }
    }

    pub fn underline() -> Self {
        Self {
            underline: Some(true),
            ..Self::NONE
        }
    }

    /// Combine two styles; flags set on `other` win.
    pub fn and(self, other: TextStyle) -> TextStyle {
        TextStyle {
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            strikethrough: other.strikethrough.or(self.strikethrough),
            obfuscated: other.obfuscated.or(self.obfuscated),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Colour plus style of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextFormat {
    pub color: Option<TextColor>,
    pub style: TextStyle,
}

/// An immutable piece of formatted text with ordered children.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    #[serde(default)]
    pub format: TextFormat,
    #[serde(default)]
    pub children: Vec<Text>,
}

impl Text {
    pub fn of(content: impl Into<String>) -> Text {
        Text {
            content: content.into(),
            format: TextFormat::default(),
            children: Vec::new(),
        }
    }

    pub fn empty() -> Text {
        Text::default()
    }

    pub fn builder() -> TextBuilder {
        TextBuilder::default()
    }

    /// Turn this text back into a builder seeded with its content, format
    /// and children.
    pub fn to_builder(&self) -> TextBuilder {
        TextBuilder {
            content: self.content.clone(),
            format: self.format,
            children: self.children.clone(),
        }
    }

    /// Concatenate content depth-first, dropping formatting.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        out.push_str(&self.content);
        for child in &self.children {
            child.write_plain(out);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.children.iter().all(Text::is_empty)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain())
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::of(s)
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::of(s)
    }
}

/// Mutable accumulator for a [`Text`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBuilder {
    content: String,
    format: TextFormat,
    children: Vec<Text>,
}

impl TextBuilder {
    pub fn content(&mut self, content: impl Into<String>) -> &mut Self {
        self.content = content.into();
        self
    }

    pub fn append(&mut self, child: Text) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn color(&mut self, color: TextColor) -> &mut Self {
        self.format.color = Some(color);
        self
    }

    pub fn style(&mut self, style: TextStyle) -> &mut Self {
        self.format.style = self.format.style.and(style);
        self
    }

    pub fn format(&self) -> TextFormat {
        self.format
    }

    pub fn children(&self) -> &[Text] {
        &self.children
    }

    pub fn build(&self) -> Text {
        Text {
            content: self.content.clone(),
            format: self.format,
            children: self.children.clone(),
        }
    }
}

/// Something that knows how to add itself to a [`TextBuilder`].
pub trait TextElement: fmt::Debug + Send + Sync {
    fn append_to(&self, builder: &mut TextBuilder);
}

impl TextElement for Text {
    fn append_to(&self, builder: &mut TextBuilder) {
        builder.append(self.clone());
    }
}

impl TextElement for TextColor {
    fn append_to(&self, builder: &mut TextBuilder) {
        builder.color(*self);
    }
}

impl TextElement for TextStyle {
    fn append_to(&self, builder: &mut TextBuilder) {
        builder.style(*self);
    }
}
