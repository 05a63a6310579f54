use std::fmt;
use std::str::FromStr;

use eframe::egui::Color32;
use serde::Deserialize;

use crate::util::closest_token;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
    pub const TOKENS: [&'static str; 4] = ["Up", "Down", "Left", "Right"];

    pub fn token(self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|heading| heading.token().eq_ignore_ascii_case(token))
    }
}

/// Where a force points. `Token` keeps unvalidated text from the outside
/// world so a bad token fails only that force during layout.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Direction {
    Heading(Heading),
    Degrees(f32),
    Token(String),
}

impl From<Heading> for Direction {
    fn from(heading: Heading) -> Self {
        Self::Heading(heading)
    }
}

impl FromStr for Direction {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Some(heading) = Heading::from_token(raw) {
            return Ok(Self::Heading(heading));
        }
        let degrees = raw
            .strip_suffix("deg")
            .or_else(|| raw.strip_suffix('°'))
            .unwrap_or(raw)
            .trim();
        match degrees.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(Self::Degrees(value)),
            _ => Ok(Self::Token(raw.to_owned())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "Option<MagnitudeRepr>")]
pub enum Magnitude {
    Known(f32),
    #[default]
    Unknown,
}

impl Magnitude {
    /// The value when it can scale an arrow: known, finite and positive.
    pub fn usable(self) -> Option<f32> {
        match self {
            Self::Known(value) if value.is_finite() && value > 0.0 => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagnitudeParseError(String);

impl fmt::Display for MagnitudeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid magnitude {:?}; expected a number, or blank/\"?\"/\"unknown\"",
            self.0
        )
    }
}

impl std::error::Error for MagnitudeParseError {}

impl FromStr for Magnitude {
    type Err = MagnitudeParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        if text.is_empty() || text == "?" || text.eq_ignore_ascii_case("unknown") {
            return Ok(Self::Unknown);
        }
        match text.parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(Self::Known(value)),
            _ => Err(MagnitudeParseError(raw.to_owned())),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MagnitudeRepr {
    Number(f32),
    Text(String),
}

impl TryFrom<Option<MagnitudeRepr>> for Magnitude {
    type Error = MagnitudeParseError;

    fn try_from(repr: Option<MagnitudeRepr>) -> Result<Self, Self::Error> {
        match repr {
            None => Ok(Self::Unknown),
            Some(MagnitudeRepr::Number(value)) if value.is_finite() => Ok(Self::Known(value)),
            Some(MagnitudeRepr::Number(value)) => Err(MagnitudeParseError(value.to_string())),
            Some(MagnitudeRepr::Text(text)) => text.parse(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ForceColor {
    #[default]
    Red,
    Blue,
    Green,
    Orange,
    Purple,
    Cyan,
    Magenta,
    Black,
    Gray,
    Yellow,
}

impl ForceColor {
    pub const ALL: [Self; 10] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Orange,
        Self::Purple,
        Self::Cyan,
        Self::Magenta,
        Self::Black,
        Self::Gray,
        Self::Yellow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Orange => "Orange",
            Self::Purple => "Purple",
            Self::Cyan => "Cyan",
            Self::Magenta => "Magenta",
            Self::Black => "Black",
            Self::Gray => "Gray",
            Self::Yellow => "Yellow",
        }
    }

    pub fn color32(self) -> Color32 {
        match self {
            Self::Red => Color32::from_rgb(0xFF, 0x00, 0x00),
            Self::Blue => Color32::from_rgb(0x00, 0x00, 0xFF),
            Self::Green => Color32::from_rgb(0x00, 0xFF, 0x00),
            Self::Orange => Color32::from_rgb(0xFF, 0xA5, 0x00),
            Self::Purple => Color32::from_rgb(0x80, 0x00, 0x80),
            Self::Cyan => Color32::from_rgb(0x00, 0xFF, 0xFF),
            Self::Magenta => Color32::from_rgb(0xFF, 0x00, 0xFF),
            Self::Black => Color32::from_rgb(0x00, 0x00, 0x00),
            Self::Gray => Color32::from_rgb(0x80, 0x80, 0x80),
            Self::Yellow => Color32::from_rgb(0xFF, 0xFF, 0x00),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownColor {
    pub token: String,
    pub suggestion: Option<&'static str>,
}

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color {:?}", self.token)?;
        if let Some(suggestion) = self.suggestion {
            write!(f, " (did you mean {suggestion:?}?)")?;
        }
        Ok(())
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for ForceColor {
    type Err = UnknownColor;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        if let Some(color) = Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(token))
        {
            return Ok(color);
        }

        let names = Self::ALL.map(Self::name);
        Err(UnknownColor {
            token: raw.to_owned(),
            suggestion: closest_token(&names, token),
        })
    }
}

impl TryFrom<String> for ForceColor {
    type Error = UnknownColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Force {
    #[serde(default)]
    pub magnitude: Magnitude,
    pub direction: Direction,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: ForceColor,
}

impl Force {
    pub fn new(
        magnitude: Magnitude,
        direction: impl Into<Direction>,
        label: impl Into<String>,
        color: ForceColor,
    ) -> Self {
        Self {
            magnitude,
            direction: direction.into(),
            label: label.into(),
            color,
        }
    }

    pub fn known(value: f32, heading: Heading, label: impl Into<String>) -> Self {
        Self::new(Magnitude::Known(value), heading, label, ForceColor::default())
    }

    pub fn unknown(heading: Heading, label: impl Into<String>) -> Self {
        Self::new(Magnitude::Unknown, heading, label, ForceColor::default())
    }

    pub fn display_label(&self, index: usize) -> String {
        if self.label.trim().is_empty() {
            format!("Force {}", index + 1)
        } else {
            self.label.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_text_follows_blank_means_unknown() {
        assert_eq!("".parse::<Magnitude>(), Ok(Magnitude::Unknown));
        assert_eq!(" ? ".parse::<Magnitude>(), Ok(Magnitude::Unknown));
        assert_eq!("Unknown".parse::<Magnitude>(), Ok(Magnitude::Unknown));
        assert_eq!("12.5".parse::<Magnitude>(), Ok(Magnitude::Known(12.5)));
        assert!("twelve".parse::<Magnitude>().is_err());
        assert!("inf".parse::<Magnitude>().is_err());
    }

    #[test]
    fn only_positive_magnitudes_are_usable() {
        assert_eq!(Magnitude::Known(3.0).usable(), Some(3.0));
        assert_eq!(Magnitude::Known(0.0).usable(), None);
        assert_eq!(Magnitude::Known(-2.0).usable(), None);
        assert_eq!(Magnitude::Unknown.usable(), None);
    }

    #[test]
    fn direction_text_resolves_headings_angles_and_raw_tokens() {
        assert_eq!("up".parse::<Direction>(), Ok(Direction::Heading(Heading::Up)));
        assert_eq!("45".parse::<Direction>(), Ok(Direction::Degrees(45.0)));
        assert_eq!("30deg".parse::<Direction>(), Ok(Direction::Degrees(30.0)));
        assert_eq!(
            "sideways".parse::<Direction>(),
            Ok(Direction::Token("sideways".to_owned()))
        );
    }

    #[test]
    fn colors_parse_case_insensitively_and_suggest_on_typos() {
        assert_eq!("magenta".parse::<ForceColor>(), Ok(ForceColor::Magenta));
        let error = "Grean".parse::<ForceColor>().unwrap_err();
        assert_eq!(error.suggestion, Some("Green"));
    }

    #[test]
    fn forces_deserialize_from_json() {
        let forces: Vec<Force> = serde_json::from_str(
            r#"[
                {"magnitude": 50, "direction": "Up", "label": "Normal", "color": "Blue"},
                {"magnitude": "", "direction": 210, "label": "Friction"},
                {"magnitude": null, "direction": "Diagonal"}
            ]"#,
        )
        .unwrap();

        assert_eq!(forces[0].magnitude, Magnitude::Known(50.0));
        assert_eq!(forces[0].direction, Direction::Heading(Heading::Up));
        assert_eq!(forces[0].color, ForceColor::Blue);
        assert_eq!(forces[1].magnitude, Magnitude::Unknown);
        assert_eq!(forces[1].direction, Direction::Degrees(210.0));
        assert_eq!(forces[1].color, ForceColor::Red);
        assert_eq!(forces[2].direction, Direction::Token("Diagonal".to_owned()));
        assert_eq!(forces[2].display_label(2), "Force 3");
    }
}
