#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: [f64; 2],   // (x, y) position in grid cells
    pub dir: [f64; 2],   // facing vector
    pub plane: [f64; 2], // camera plane, perpendicular to dir; length sets the FOV
}

impl Camera {
    /// Builds a camera with `plane` on the right-hand side of `dir`,
    /// `plane_length` times as long as `dir`.
    pub fn new(pos: [f64; 2], dir: [f64; 2], plane_length: f64) -> Self {
        // right-hand perpendicular of (dx, dy) is (dy, -dx)
        let plane = [dir[1] * plane_length, -dir[0] * plane_length];
        Self { pos, dir, plane }
    }

    /// Rotates `dir` and `plane` together. Positive angles turn left.
    pub fn rotate(&mut self, angle: f64) {
        let (s, c) = angle.sin_cos();
        self.dir = rotate2(self.dir, c, s);
        self.plane = rotate2(self.plane, c, s);
    }

    /// Maps screen column `x` to camera space, -1 at the left edge and
    /// approaching 1 at the right edge.
    #[inline]
    pub fn camera_x(x: usize, screen_width: usize) -> f64 {
        2.0 * x as f64 / screen_width as f64 - 1.0
    }

    #[inline]
    pub fn ray_dir(&self, camera_x: f64) -> [f64; 2] {
        [
            self.dir[0] + self.plane[0] * camera_x,
            self.dir[1] + self.plane[1] * camera_x,
        ]
    }

    pub fn fov_x_degrees(&self) -> f64 {
        let ratio = length(self.plane) / length(self.dir);
        (2.0 * ratio.atan()).to_degrees()
    }
}

#[inline]
fn rotate2(v: [f64; 2], c: f64, s: f64) -> [f64; 2] {
    [v[0] * c - v[1] * s, v[0] * s + v[1] * c]
}

#[inline]
pub fn length(v: [f64; 2]) -> f64 {
    v[0].hypot(v[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < EPS && (a[1] - b[1]).abs() < EPS
    }

    #[test]
    fn test_new_places_plane_on_the_right() {
        let cam = Camera::new([22.0, 12.0], [-1.0, 0.0], 0.66);
        assert!(close(cam.plane, [0.0, 0.66]));

        let cam = Camera::new([2.0, 2.0], [0.0, 1.0], 0.5);
        assert!(close(cam.plane, [0.5, 0.0]));
    }

    #[test]
    fn test_rotation_round_trip() {
        let start = Camera::new([22.0, 12.0], [-1.0, 0.0], 0.66);
        let mut cam = start;
        cam.rotate(0.37);
        assert!(!close(cam.dir, start.dir));
        cam.rotate(-0.37);
        assert!(close(cam.dir, start.dir));
        assert!(close(cam.plane, start.plane));
    }

    #[test]
    fn test_rotation_preserves_fov_and_perpendicularity() {
        let mut cam = Camera::new([5.0, 5.0], [-1.0, 0.0], 0.66);
        let fov = cam.fov_x_degrees();
        for step in [0.1, -2.3, 1.7, 0.016, 3.0, -0.5] {
            cam.rotate(step);
            assert!((length(cam.plane) - 0.66).abs() < EPS);
            let dot = cam.dir[0] * cam.plane[0] + cam.dir[1] * cam.plane[1];
            assert!(dot.abs() < EPS);
        }
        assert!((cam.fov_x_degrees() - fov).abs() < 1e-6);
    }

    #[test]
    fn test_positive_angle_turns_left() {
        // facing +x, a left turn by 90 degrees faces +y
        let mut cam = Camera::new([5.0, 5.0], [1.0, 0.0], 0.66);
        cam.rotate(std::f64::consts::FRAC_PI_2);
        assert!(close(cam.dir, [0.0, 1.0]));
    }

    #[test]
    fn test_camera_x_and_ray_dir() {
        assert_eq!(Camera::camera_x(0, 640), -1.0);
        assert_eq!(Camera::camera_x(320, 640), 0.0);

        let cam = Camera::new([22.0, 12.0], [-1.0, 0.0], 0.66);
        assert!(close(cam.ray_dir(0.0), [-1.0, 0.0]));
        assert!(close(cam.ray_dir(-1.0), [-1.0, -0.66]));
        assert!((cam.fov_x_degrees() - 66.8).abs() < 0.1);
    }
}
