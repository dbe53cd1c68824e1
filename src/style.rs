use hex::{FromHex, FromHexError};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// An RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub(crate) struct Color {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Color {
    pub(crate) const WHITE: Color = Color::new(255, 255, 255);
    pub(crate) const BLACK: Color = Color::new(0, 0, 0);

    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Mix this color with another one.
    ///
    /// A ratio of 0 yields `self`, a ratio of 1 yields `other`.
    pub(crate) fn mix(&self, other: &Color, ratio: f32) -> Color {
        let ratio = ratio.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * ratio).round() as u8;
        Color::new(channel(self.r, other.r), channel(self.g, other.g), channel(self.b, other.b))
    }

    pub(crate) fn as_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.strip_prefix('#').unwrap_or(input);
        let [r, g, b] = <[u8; 3]>::from_hex(input)?;
        Ok(Self { r, g, b })
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode(self.as_array()))
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        let Color { r, g, b } = color;
        Self::Rgb { r, g, b }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ParseColorError {
    #[error("invalid hex color: {0}")]
    Hex(#[from] FromHexError),
}

/// A point within a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColorStop {
    pub(crate) color: Color,

    /// The position in the gradient line, between 0 and 1.
    pub(crate) position: f32,
}

/// A linear gradient, as in CSS' `linear-gradient(135deg, #667eea 0%, #764ba2 100%)`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Gradient {
    angle: f32,
    stops: Vec<ColorStop>,
}

impl Gradient {
    // CSS' default direction is "to bottom".
    const DEFAULT_ANGLE: f32 = 180.0;

    pub(crate) fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Get the color at a position in the gradient line.
    pub(crate) fn color_at(&self, position: f32) -> Color {
        let position = position.clamp(0.0, 1.0);
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Color::BLACK,
        };
        if position <= first.position {
            return first.color;
        }
        for window in self.stops.windows(2) {
            let (start, end) = (&window[0], &window[1]);
            if position <= end.position {
                let span = end.position - start.position;
                if span <= f32::EPSILON {
                    return end.color;
                }
                return start.color.mix(&end.color, (position - start.position) / span);
            }
        }
        last.color
    }

    /// Get the start and end points of the gradient line for a box of the given size.
    ///
    /// The line goes through the center of the box and is long enough for its perpendiculars at
    /// each end to touch the box's corners.
    pub(crate) fn line(&self, width: f32, height: f32) -> ((f32, f32), (f32, f32)) {
        let radians = self.angle.to_radians();
        let (dx, dy) = (radians.sin(), -radians.cos());
        let length = (width * dx).abs() + (height * dy).abs();
        let (cx, cy) = (width / 2.0, height / 2.0);
        let half = length / 2.0;
        ((cx - dx * half, cy - dy * half), (cx + dx * half, cy + dy * half))
    }

    /// Sample the gradient at a point within a box of the given size.
    pub(crate) fn sample(&self, x: f32, y: f32, width: f32, height: f32) -> Color {
        let ((x0, y0), (x1, y1)) = self.line(width, height);
        let (dx, dy) = (x1 - x0, y1 - y0);
        let length_squared = dx * dx + dy * dy;
        if length_squared <= f32::EPSILON {
            return self.color_at(0.0);
        }
        let position = ((x - x0) * dx + (y - y0) * dy) / length_squared;
        self.color_at(position)
    }

    fn parse_angle(input: &str) -> Result<Option<f32>, ParseGradientError> {
        let Some(degrees) = input.strip_suffix("deg") else {
            return Ok(None);
        };
        let angle: f32 = degrees.trim().parse().map_err(|_| ParseGradientError::InvalidAngle(input.into()))?;
        Ok(Some(angle))
    }

    fn parse_stop(input: &str) -> Result<(Color, Option<f32>), ParseGradientError> {
        let mut parts = input.split_whitespace();
        let color = parts.next().ok_or_else(|| ParseGradientError::InvalidStop(input.into()))?;
        let color = Color::from_str(color)?;
        let position = match parts.next() {
            Some(position) => {
                let percent = position
                    .strip_suffix('%')
                    .and_then(|p| p.parse::<f32>().ok())
                    .ok_or_else(|| ParseGradientError::InvalidStop(input.into()))?;
                Some(percent / 100.0)
            }
            None => None,
        };
        if parts.next().is_some() {
            return Err(ParseGradientError::InvalidStop(input.into()));
        }
        Ok((color, position))
    }
}

impl FromStr for Gradient {
    type Err = ParseGradientError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let arguments = input
            .trim()
            .strip_prefix("linear-gradient(")
            .and_then(|s| s.strip_suffix(')'))
            .ok_or(ParseGradientError::NotLinear)?;
        let mut parts: Vec<_> = arguments.split(',').map(str::trim).collect();
        let angle = match parts.first() {
            Some(first) => match Self::parse_angle(first)? {
                Some(angle) => {
                    parts.remove(0);
                    angle
                }
                None => Self::DEFAULT_ANGLE,
            },
            None => Self::DEFAULT_ANGLE,
        };
        if parts.len() < 2 {
            return Err(ParseGradientError::MissingStops);
        }
        let last_index = parts.len() - 1;
        let mut stops = Vec::new();
        let mut previous_position = 0.0_f32;
        for (index, part) in parts.into_iter().enumerate() {
            let (color, position) = Self::parse_stop(part)?;
            // Stops without a position are spread evenly; positions never go backwards.
            let position = position.unwrap_or(index as f32 / last_index as f32).clamp(0.0, 1.0);
            let position = position.max(previous_position);
            previous_position = position;
            stops.push(ColorStop { color, position });
        }
        Ok(Self { angle, stops })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ParseGradientError {
    #[error("not a linear-gradient(...) descriptor")]
    NotLinear,

    #[error("gradient needs at least 2 color stops")]
    MissingStops,

    #[error("invalid gradient angle: {0}")]
    InvalidAngle(String),

    #[error("invalid color stop: {0}")]
    InvalidStop(String),

    #[error(transparent)]
    Color(#[from] ParseColorError),
}
