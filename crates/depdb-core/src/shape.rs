//! Node shapes CMake uses to tell target kinds apart.

use std::fmt;

/// Shape of a node in a CMake dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Shared library.
    Polygon,
    /// Executable.
    House,
    /// Module, aka plugin.
    Octagon,
    /// Static library.
    Diamond,
    /// Dependency that is not a target of the graph's own project.
    Ellipse,
    Other(String),
}

pub const TARGET_SHAPES: [Shape; 4] = [Shape::Polygon, Shape::House, Shape::Octagon, Shape::Diamond];

pub const DEPS_SHAPE: Shape = Shape::Ellipse;

impl Shape {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "polygon" => Self::Polygon,
            "house" => Self::House,
            "octagon" => Self::Octagon,
            "diamond" => Self::Diamond,
            "ellipse" => Self::Ellipse,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Polygon => "polygon",
            Self::House => "house",
            Self::Octagon => "octagon",
            Self::Diamond => "diamond",
            Self::Ellipse => "ellipse",
            Self::Other(s) => s,
        }
    }

    /// Whether nodes of this shape are build products of the graph's module.
    #[must_use]
    pub fn is_target(&self) -> bool {
        TARGET_SHAPES.contains(self)
    }

    /// Target shapes plus the dependency shape.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        self.is_target() || *self == DEPS_SHAPE
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_vocabulary() {
        for name in ["polygon", "house", "octagon", "diamond"] {
            assert!(Shape::parse(name).is_target(), "{name}");
        }
        assert!(!Shape::Ellipse.is_target());
        assert!(Shape::Ellipse.is_recognized());
        assert!(!Shape::parse("egg").is_recognized());
    }

    #[test]
    fn unknown_shapes_keep_their_name() {
        assert_eq!(Shape::parse("box").to_string(), "box");
    }
}
