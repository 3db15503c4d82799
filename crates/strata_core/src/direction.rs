//! Axis-aligned face directions.

/// One of the six faces of a voxel.
///
/// Forward is +Z, Right is +X, Up is +Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// +Z
    Forward,
    /// +X
    Right,
    /// -Z
    Backward,
    /// -X
    Left,
    /// +Y
    Up,
    /// -Y
    Down,
}

impl Direction {
    /// All six directions.
    pub const ALL: [Self; 6] = [
        Self::Backward,
        Self::Down,
        Self::Forward,
        Self::Left,
        Self::Right,
        Self::Up,
    ];

    /// Unit offset towards the neighbour on this side.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> [i32; 3] {
        match self {
            Self::Forward => [0, 0, 1],
            Self::Right => [1, 0, 0],
            Self::Backward => [0, 0, -1],
            Self::Left => [-1, 0, 0],
            Self::Up => [0, 1, 0],
            Self::Down => [0, -1, 0],
        }
    }

    /// The direction pointing the other way.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Right => Self::Left,
            Self::Backward => Self::Forward,
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_cancel() {
        for dir in Direction::ALL {
            let a = dir.offset();
            let b = dir.opposite().offset();
            assert_eq!([a[0] + b[0], a[1] + b[1], a[2] + b[2]], [0, 0, 0]);
        }
    }
}
