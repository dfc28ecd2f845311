use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// Four mat border widths in the reference unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Borders {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Borders {
    pub const ZERO: Self = Self::uniform(0.0);

    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub const fn get(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
            Edge::Right => self.right,
        }
    }

    pub fn set(&mut self, edge: Edge, value: f64) {
        match edge {
            Edge::Top => self.top = value,
            Edge::Bottom => self.bottom = value,
            Edge::Left => self.left = value,
            Edge::Right => self.right = value,
        }
    }

    pub fn with(mut self, edge: Edge, value: f64) -> Self {
        self.set(edge, value);
        self
    }

    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }

    /// Adds `amount` to every side.
    pub fn offset(&self, amount: f64) -> Self {
        Self::new(
            self.top + amount,
            self.bottom + amount,
            self.left + amount,
            self.right + amount,
        )
    }

    pub fn floor(&self, minimum: f64) -> Self {
        Self::new(
            self.top.max(minimum),
            self.bottom.max(minimum),
            self.left.max(minimum),
            self.right.max(minimum),
        )
    }

    /// First edge holding a negative or non-finite width, if any.
    pub fn first_invalid(&self) -> Option<(Edge, f64)> {
        Edge::ALL
            .into_iter()
            .map(|edge| (edge, self.get(edge)))
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
    }
}

/// Resolves the "link all sides" constraint after `changed` was edited.
///
/// With linkage on, the edited side is the master and the other three copy it.
pub fn apply_linkage(borders: Borders, changed: Edge, linked: bool) -> Borders {
    if linked {
        Borders::uniform(borders.get(changed))
    } else {
        borders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_linkage_copies_master_to_all_sides() {
        let borders = Borders::new(3.0, 2.0, 2.0, 2.0);
        assert_eq!(apply_linkage(borders, Edge::Top, true), Borders::uniform(3.0));
        assert_eq!(
            apply_linkage(borders, Edge::Left, true),
            Borders::uniform(2.0)
        );
    }

    #[test]
    fn apply_linkage_leaves_independent_sides_alone() {
        let borders = Borders::new(3.0, 2.0, 1.0, 4.0);
        assert_eq!(apply_linkage(borders, Edge::Right, false), borders);
    }

    #[test]
    fn edge_opposites_pair_up() {
        for edge in Edge::ALL {
            assert_eq!(edge.opposite().opposite(), edge);
            assert_ne!(edge.opposite(), edge);
            assert_eq!(edge.is_horizontal(), edge.opposite().is_horizontal());
        }
    }

    #[test]
    fn first_invalid_reports_negative_side() {
        let borders = Borders::new(1.0, 1.0, -0.5, 1.0);
        assert_eq!(borders.first_invalid(), Some((Edge::Left, -0.5)));
        assert_eq!(Borders::uniform(0.0).first_invalid(), None);
    }
}
