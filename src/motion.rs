use crate::{
    camera::Camera,
    input::{Action, InputSource},
    world::GridMap,
};

/// Held state of the four movement actions, sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionInput {
    pub forward: bool,
    pub backward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

impl MotionInput {
    pub fn sample(input: &impl InputSource) -> Self {
        Self {
            forward: input.is_held(Action::Forward),
            backward: input.is_held(Action::Backward),
            rotate_left: input.is_held(Action::RotateLeft),
            rotate_right: input.is_held(Action::RotateRight),
        }
    }
}

/// Turns held input and elapsed time into camera motion.
#[derive(Debug, Clone, Copy)]
pub struct MotionController {
    pub move_speed: f64,     // cells per second
    pub rotation_speed: f64, // radians per second
}

impl Default for MotionController {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            rotation_speed: 3.0,
        }
    }
}

impl MotionController {
    /// Next camera state after `elapsed` seconds of `input`.
    pub fn advance(
        &self,
        camera: &Camera,
        map: &GridMap,
        input: &MotionInput,
        elapsed: f64,
    ) -> Camera {
        let move_step = elapsed * self.move_speed;
        let rot_step = elapsed * self.rotation_speed;
        let mut next = *camera;

        if input.forward {
            let d = [next.dir[0] * move_step, next.dir[1] * move_step];
            slide(&mut next.pos, d, map);
        }
        if input.backward {
            let d = [-next.dir[0] * move_step, -next.dir[1] * move_step];
            slide(&mut next.pos, d, map);
        }
        if input.rotate_right {
            next.rotate(-rot_step);
        }
        if input.rotate_left {
            next.rotate(rot_step);
        }

        next
    }
}

/// Applies each axis of `d` on its own so a blocked axis does not stop the
/// other one; the y check sees the already-updated x.
fn slide(pos: &mut [f64; 2], d: [f64; 2], map: &GridMap) {
    if map.is_open_at(pos[0] + d[0], pos[1]) {
        pos[0] += d[0];
    }
    if map.is_open_at(pos[0], pos[1] + d[1]) {
        pos[1] += d[1];
    }
}
