use eframe::egui::{Vec2, vec2};

use super::error::LayoutError;
use super::force::{Direction, Heading};
use crate::util::closest_token;

pub fn heading_unit(heading: Heading) -> Vec2 {
    match heading {
        Heading::Up => vec2(0.0, 1.0),
        Heading::Down => vec2(0.0, -1.0),
        Heading::Left => vec2(-1.0, 0.0),
        Heading::Right => vec2(1.0, 0.0),
    }
}

/// Unit vector for a direction in scene space (+y up, angles counter-clockwise
/// from +x).
pub fn unit_vector(direction: &Direction) -> Result<Vec2, LayoutError> {
    match direction {
        Direction::Heading(heading) => Ok(heading_unit(*heading)),
        Direction::Degrees(degrees) => Ok(Vec2::angled(degrees.to_radians())),
        Direction::Token(token) => Heading::from_token(token)
            .map(heading_unit)
            .ok_or_else(|| LayoutError::InvalidDirection {
                token: token.clone(),
                suggestion: closest_token(&Heading::TOKENS, token),
            }),
    }
}
