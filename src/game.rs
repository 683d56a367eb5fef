use crate::{
    camera::Camera,
    clock::{ClockSource, FrameClock},
    input::{InputSource, QuitSignal},
    motion::{MotionController, MotionInput},
    renderer::{self, Rgb, Surface},
    world::{GridMap, MapError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// Map, camera and per-frame update, independent of any window.
pub struct Game {
    pub map: GridMap,
    pub camera: Camera,
    pub motion: MotionController,
    pub clock: FrameClock,
    pub ceiling: Rgb,
    pub floor: Rgb,
}

impl Game {
    /// Fails when the camera does not start inside an open interior cell.
    pub fn new(
        map: GridMap,
        camera: Camera,
        motion: MotionController,
        clock: FrameClock,
        ceiling: Rgb,
        floor: Rgb,
    ) -> Result<Self, MapError> {
        map.validate_spawn(camera.pos)?;
        Ok(Self {
            map,
            camera,
            motion,
            clock,
            ceiling,
            floor,
        })
    }

    /// One frame: move, draw, present, then sample the clock for the next
    /// frame's time step.
    pub fn tick<I, C, S>(
        &mut self,
        input: &I,
        clock: &C,
        surface: &mut S,
    ) -> Result<TickOutcome, S::Error>
    where
        I: InputSource + QuitSignal,
        C: ClockSource,
        S: Surface,
    {
        let quit = input.quit_requested();
        let held = MotionInput::sample(input);

        self.camera = self
            .motion
            .advance(&self.camera, &self.map, &held, self.clock.elapsed());

        renderer::render_frame(surface, &self.map, &self.camera, self.ceiling, self.floor);
        surface.present()?;

        self.clock.tick(clock.now_millis());

        Ok(if quit {
            TickOutcome::Quit
        } else {
            TickOutcome::Continue
        })
    }
}
