use crate::{camera::Camera, world::GridMap};

/// Stand-in for `|1 / 0|` when a ray runs parallel to an axis.
const AXIS_PARALLEL: f64 = 1e30;

/// Which family of grid lines the ray crossed last before the hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Crossed a line of constant x (stepped along x).
    X,
    /// Crossed a line of constant y (stepped along y).
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the camera's forward axis, not along the ray.
    pub perp_distance: f64,
    pub side: Side,
    /// Code of the wall cell that stopped the ray.
    pub cell: u8,
}

/// Casts the ray for screen column `x` and walks the grid with DDA until it
/// enters a wall cell.
pub fn cast_column(map: &GridMap, camera: &Camera, x: usize, screen_width: usize) -> RayHit {
    let ray = camera.ray_dir(Camera::camera_x(x, screen_width));
    cast_ray(map, camera.pos, ray)
}

/// One hit per screen column, left to right.
pub fn cast_frame(map: &GridMap, camera: &Camera, screen_width: usize) -> Vec<RayHit> {
    (0..screen_width)
        .map(|x| cast_column(map, camera, x, screen_width))
        .collect()
}

pub fn cast_ray(map: &GridMap, pos: [f64; 2], ray: [f64; 2]) -> RayHit {
    let mut cell = [pos[0].floor() as isize, pos[1].floor() as isize];

    // ray length needed to cross one whole cell along each axis
    let delta = [axis_delta(ray[0]), axis_delta(ray[1])];

    let mut step = [0isize; 2];
    let mut side_dist = [0.0f64; 2];
    for axis in 0..2 {
        if ray[axis] < 0.0 {
            step[axis] = -1;
            side_dist[axis] = (pos[axis] - cell[axis] as f64) * delta[axis];
        } else {
            step[axis] = 1;
            side_dist[axis] = (cell[axis] as f64 + 1.0 - pos[axis]) * delta[axis];
        }
    }

    // The closed boundary guarantees a hit before the indices leave the grid.
    loop {
        let axis = if side_dist[0] < side_dist[1] { 0 } else { 1 };
        side_dist[axis] += delta[axis];
        cell[axis] += step[axis];

        let code = map.cell_at(cell[0] as usize, cell[1] as usize);
        if code > 0 {
            return RayHit {
                perp_distance: side_dist[axis] - delta[axis],
                side: if axis == 0 { Side::X } else { Side::Y },
                cell: code,
            };
        }
    }
}

#[inline]
fn axis_delta(component: f64) -> f64 {
    if component == 0.0 {
        AXIS_PARALLEL
    } else {
        (1.0 / component).abs()
    }
}
