//! Quad corner tables.
//!
//! Corners are listed bottom-right, top-right, top-left, bottom-left as seen
//! from outside the voxel, which is counter-clockwise around the outward
//! normal and matches the corner order of `VoxelCatalog::face_uvs`.

use strata_core::Direction;

/// Corner offsets of a face relative to the voxel centre.
#[must_use]
pub const fn face_offsets(direction: Direction) -> [[f32; 3]; 4] {
    const H: f32 = 0.5;
    match direction {
        Direction::Up => [[H, H, H], [H, H, -H], [-H, H, -H], [-H, H, H]],
        Direction::Down => [[H, -H, -H], [H, -H, H], [-H, -H, H], [-H, -H, -H]],
        Direction::Forward => [[H, -H, H], [H, H, H], [-H, H, H], [-H, -H, H]],
        Direction::Backward => [[-H, -H, -H], [-H, H, -H], [H, H, -H], [H, -H, -H]],
        Direction::Right => [[H, -H, -H], [H, H, -H], [H, H, H], [H, -H, H]],
        Direction::Left => [[-H, -H, H], [-H, H, H], [-H, H, -H], [-H, -H, -H]],
    }
}

/// Corner positions of the face of the voxel at chunk-local `(x, y, z)`.
#[inline]
#[must_use]
pub fn face_corners(x: usize, y: usize, z: usize, direction: Direction) -> [[f32; 3]; 4] {
    let centre = [x as f32, y as f32, z as f32];
    face_offsets(direction).map(|o| [centre[0] + o[0], centre[1] + o[1], centre[2] + o[2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn normalised(v: [f32; 3]) -> [i32; 3] {
        let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        v.map(|c| (c / len).round() as i32)
    }

    #[test]
    fn test_both_triangles_wind_around_outward_normal() {
        for direction in Direction::ALL {
            let c = face_offsets(direction);
            for [a, b, d] in [[0, 1, 2], [0, 2, 3]] {
                let normal = cross(sub(c[b], c[a]), sub(c[d], c[a]));
                assert_eq!(
                    normalised(normal),
                    direction.offset(),
                    "{direction:?} triangle ({a}, {b}, {d}) faces the wrong way"
                );
            }
        }
    }

    #[test]
    fn test_faces_lie_on_their_side() {
        for direction in Direction::ALL {
            let offset = direction.offset();
            for corner in face_offsets(direction) {
                for axis in 0..3 {
                    if offset[axis] != 0 {
                        assert_eq!(corner[axis], offset[axis] as f32 * 0.5, "{direction:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_corners_are_translated() {
        let corners = face_corners(3, 4, 5, Direction::Up);
        assert_eq!(corners[0], [3.5, 4.5, 5.5]);
        assert_eq!(corners[2], [2.5, 4.5, 4.5]);
    }
}
