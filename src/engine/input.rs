//! winit events to normalized `InputEvent`s.

use winit::event::{ ElementState, MouseButton, MouseScrollDelta, WindowEvent };
use winit::keyboard::{ KeyCode, PhysicalKey };

use crate::engine::components::interaction_state::{ InputEvent, Toggle };

/// Pixels of touchpad scroll that count as one wheel notch.
const PIXELS_PER_LINE: f64 = 20.0;

/// Stateful only in that it remembers the cursor, because winit reports
/// button presses without a position.
#[derive(Debug, Default)]
pub struct InputTranslator {
    cursor: (f64, f64),
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CloseRequested => Some(InputEvent::Quit),
            WindowEvent::Resized(size) =>
                Some(InputEvent::Resize { width: size.width, height: size.height }),
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position.x, position.y),
            WindowEvent::MouseInput { state, button, .. } => self.mouse_button(*state, *button),
            WindowEvent::MouseWheel { delta, .. } => Some(scroll(*delta)),
            WindowEvent::KeyboardInput { event, .. } => {
                match event.physical_key {
                    PhysicalKey::Code(code) => key(code, event.state, event.repeat),
                    PhysicalKey::Unidentified(_) => None,
                }
            }
            _ => None,
        }
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Option<InputEvent> {
        self.cursor = (x, y);
        Some(InputEvent::PointerMove { x, y })
    }

    pub fn mouse_button(&self, state: ElementState, button: MouseButton) -> Option<InputEvent> {
        if button != MouseButton::Left {
            return None;
        }
        let (x, y) = self.cursor;
        Some(match state {
            ElementState::Pressed => InputEvent::PointerDown { x, y },
            ElementState::Released => InputEvent::PointerUp { x, y },
        })
    }
}

pub fn scroll(delta: MouseScrollDelta) -> InputEvent {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => InputEvent::Zoom(y),
        MouseScrollDelta::PixelDelta(position) => InputEvent::Zoom((position.y / PIXELS_PER_LINE) as f32),
    }
}

/// Key presses only. Held keys repeat zoom but not toggles.
pub fn key(code: KeyCode, state: ElementState, repeat: bool) -> Option<InputEvent> {
    if state != ElementState::Pressed {
        return None;
    }
    let zoom = match code {
        KeyCode::Equal | KeyCode::NumpadAdd => Some(1.0),
        KeyCode::Minus | KeyCode::NumpadSubtract => Some(-1.0),
        _ => None,
    };
    if let Some(delta) = zoom {
        return Some(InputEvent::Zoom(delta));
    }
    if repeat {
        return None;
    }
    let toggle = match code {
        KeyCode::Escape | KeyCode::KeyQ => {
            return Some(InputEvent::Quit);
        }
        KeyCode::KeyA => Toggle::Animate,
        KeyCode::KeyF => Toggle::Fullscreen,
        KeyCode::KeyW => Toggle::Wireframe,
        KeyCode::KeyC => Toggle::Culling,
        KeyCode::KeyD => Toggle::DepthTest,
        _ => {
            return None;
        }
    };
    Some(InputEvent::Toggle(toggle))
}
