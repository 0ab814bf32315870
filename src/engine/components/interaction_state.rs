use log::debug;

/// Boolean toggles the input layer can flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    Animate,
    Fullscreen,
    Wireframe,
    Culling,
    DepthTest,
}

/// Normalized input delivered by the platform layer, already stripped of
/// window-system detail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    PointerDown { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    /// Positive values move the model toward the camera.
    Zoom(f32),
    Toggle(Toggle),
    Resize { width: u32, height: u32 },
}

/// Side effects only the platform layer can carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleFullscreen,
    Resize { width: u32, height: u32 },
}

/// Tuning for how raw input maps onto the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSettings {
    /// Degrees of rotation per pixel of drag.
    pub drag_sensitivity: f32,
    /// Zoom units per scroll step.
    pub zoom_step: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.5,
            zoom_step: 0.5,
        }
    }
}

/// Everything the input layer can change between frames. Plain data; read
/// once per frame by the transform pipeline and the render-state toggles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pub zoom: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub animation_angle: f32,
    pub animating: bool,
    pub wireframe: bool,
    pub culling_enabled: bool,
    pub depth_test_enabled: bool,
    pub dragging: bool,
    pub last_cursor: (f64, f64),
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            zoom: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            animation_angle: 0.0,
            animating: false,
            wireframe: false,
            culling_enabled: true,
            depth_test_enabled: true,
            dragging: false,
            last_cursor: (0.0, 0.0),
        }
    }
}

impl InteractionState {
    /// Applies one input event. Returns the command the platform layer has to
    /// execute, if any.
    pub fn apply(&mut self, event: InputEvent, settings: &InputSettings) -> Option<Command> {
        match event {
            InputEvent::Quit => {
                return Some(Command::Quit);
            }
            InputEvent::PointerDown { x, y } => {
                self.dragging = true;
                self.last_cursor = (x, y);
            }
            InputEvent::PointerUp { x, y } => {
                self.dragging = false;
                self.last_cursor = (x, y);
            }
            InputEvent::PointerMove { x, y } => {
                if self.dragging {
                    let dx = (x - self.last_cursor.0) as f32;
                    let dy = (y - self.last_cursor.1) as f32;
                    // The model matrix negates these, so subtracting here makes
                    // the model follow the cursor.
                    self.rotation_y -= dx * settings.drag_sensitivity;
                    self.rotation_x -= dy * settings.drag_sensitivity;
                }
                self.last_cursor = (x, y);
            }
            InputEvent::Zoom(delta) => {
                self.zoom += delta * settings.zoom_step;
            }
            InputEvent::Toggle(toggle) => {
                return self.flip(toggle);
            }
            InputEvent::Resize { width, height } => {
                return Some(Command::Resize { width, height });
            }
        }
        None
    }

    fn flip(&mut self, toggle: Toggle) -> Option<Command> {
        let flag = match toggle {
            Toggle::Fullscreen => {
                return Some(Command::ToggleFullscreen);
            }
            Toggle::Animate => &mut self.animating,
            Toggle::Wireframe => &mut self.wireframe,
            Toggle::Culling => &mut self.culling_enabled,
            Toggle::DepthTest => &mut self.depth_test_enabled,
        };
        *flag = !*flag;
        debug!("{:?} -> {}", toggle, *flag);
        None
    }

    /// The state for the next frame: the spin advances one degree per frame
    /// while animating and not at all otherwise.
    pub fn advanced(mut self) -> Self {
        if self.animating {
            self.animation_angle += 1.0;
        }
        self
    }
}
