//! Position points and shared-position ranking.

use rust_decimal::Decimal;

use crate::types::PointTemplate;

/// Template key consulted for positions without an explicit entry.
pub const DEFAULT_POSITION_KEY: &str = "default";

/// Built-in points scale when a tour has no template.
///
/// First place earns `field + 2`, second `field`, and every later place one
/// less than the one before, floored at zero.
pub fn default_position_points(position: u32, field_size: usize) -> Decimal {
    let field = field_size as i64;
    let points = match position {
        0 => 0,
        1 => field + 2,
        2 => field,
        n => (field - (i64::from(n) - 1)).max(0),
    };
    Decimal::from(points)
}

impl PointTemplate {
    /// Points for a finishing position, falling back to `"default"`, else zero.
    pub fn points_for(&self, position: u32) -> Decimal {
        self.points_structure
            .get(&position.to_string())
            .or_else(|| self.points_structure.get(DEFAULT_POSITION_KEY))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Where points for a ranked field come from.
#[derive(Debug, Clone, Copy)]
pub enum PointsRule<'a> {
    Template(&'a PointTemplate),
    Scaled { field_size: usize },
}

impl PointsRule<'_> {
    pub fn points_for(&self, position: u32) -> Decimal {
        match self {
            PointsRule::Template(template) => template.points_for(position),
            PointsRule::Scaled { field_size } => default_position_points(position, *field_size),
        }
    }
}

/// 1-based positions for an already sorted slice. Neighbours with equal keys
/// share a position; the next distinct key resumes at its own index + 1.
pub fn shared_positions<T, K, F>(sorted: &[T], key: F) -> Vec<u32>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut positions: Vec<u32> = Vec::with_capacity(sorted.len());
    for (idx, item) in sorted.iter().enumerate() {
        let position = match idx.checked_sub(1) {
            Some(prev) if key(&sorted[prev]) == key(item) => positions[prev],
            _ => idx as u32 + 1,
        };
        positions.push(position);
    }
    positions
}
