use cgmath::Vector3;
use log::{debug, warn};
use winit::{
    event::{DeviceEvent, ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::config::ControllerConfig;
use crate::gfx::scene::object::WorldObject;
use crate::gfx::scene::Scene;

const PITCH_LIMIT: f32 = 89.0;

/// Drives one world object from player input.
///
/// The controller never owns the object; it looks the target up by id in the
/// scene it is handed, so a stale id after a reload is a no-op.
#[derive(Debug, Clone)]
pub struct Controller {
    pub movement_speed: f32,
    pub turn_speed: f32,
    pub jump_height: f32,
    target: Option<String>,
    saved_immovability: bool,
}

impl Controller {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            movement_speed: config.movement_speed,
            turn_speed: config.turn_speed,
            jump_height: config.jump_height,
            target: None,
            saved_immovability: true,
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Take control of `id`, handing the previous target back its immovability
    pub fn possess(&mut self, scene: &mut Scene, id: &str) -> bool {
        if !scene.world_objects.contains_key(id) {
            warn!("Cannot possess unknown world object '{id}'");
            return false;
        }
        self.release(scene);

        if let Some(object) = scene.world_objects.get_mut(id) {
            self.saved_immovability = object.is_immovable;
            object.is_immovable = false;
            self.target = Some(id.to_string());
            debug!("Possessed '{id}'");
        }
        true
    }

    /// Give up the current target, restoring its immovability
    pub fn release(&mut self, scene: &mut Scene) {
        if let Some(previous) = self.target.take() {
            if let Some(object) = scene.world_objects.get_mut(&previous) {
                object.is_immovable = self.saved_immovability;
            }
        }
    }

    fn target_mut<'a>(&self, scene: &'a mut Scene) -> Option<&'a mut WorldObject> {
        scene.world_objects.get_mut(self.target.as_deref()?)
    }

    fn push(&self, scene: &mut Scene, direction: impl Fn(&WorldObject) -> Vector3<f32>, dt: f32) {
        let speed = self.movement_speed * dt;
        if let Some(object) = self.target_mut(scene) {
            let impulse = direction(object) * speed;
            object.velocity.x += impulse.x;
            object.velocity.z += impulse.z;
            if object.flying {
                object.velocity.y += impulse.y;
            }
        }
    }

    pub fn move_forward(&self, scene: &mut Scene, dt: f32) {
        self.push(scene, |object| object.front, dt);
    }

    pub fn move_backward(&self, scene: &mut Scene, dt: f32) {
        self.push(scene, |object| -object.front, dt);
    }

    pub fn move_left(&self, scene: &mut Scene, dt: f32) {
        self.push(scene, |object| -object.right, dt);
    }

    pub fn move_right(&self, scene: &mut Scene, dt: f32) {
        self.push(scene, |object| object.right, dt);
    }

    /// Queue a turn; physics commits it on the next tick
    pub fn turn(&self, scene: &mut Scene, mouse_delta: (f32, f32), dt: f32) {
        let (dx, dy) = mouse_delta;
        let turn = self.turn_speed * dt;
        if let Some(object) = self.target_mut(scene) {
            object.pending_rotation.y += dx * turn;
            object.pending_rotation.x =
                (object.pending_rotation.x - dy * turn).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
    }

    /// Jump, only from the ground and never while flying
    pub fn jump(&self, scene: &mut Scene, dt: f32) {
        if let Some(object) = self.target_mut(scene) {
            if !object.airborne && !object.flying {
                object.airborne = true;
                object.velocity.y += self.jump_height * dt;
            }
        }
    }

    pub fn toggle_flying(&self, scene: &mut Scene) {
        if let Some(object) = self.target_mut(scene) {
            object.flying = !object.flying;
            debug!("Flying {}", if object.flying { "on" } else { "off" });
        }
    }
}

/// Keys held and mouse motion gathered between frames
#[derive(Debug, Default, Clone)]
pub struct InputState {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    jump: bool,
    toggle_flying: bool,
    mouse_delta: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the key is one the controller listens to
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::KeyW => self.forward = pressed,
            KeyCode::KeyS => self.backward = pressed,
            KeyCode::KeyA => self.left = pressed,
            KeyCode::KeyD => self.right = pressed,
            KeyCode::Space => self.jump = pressed,
            KeyCode::KeyF => self.toggle_flying |= pressed,
            _ => return false,
        }
        true
    }

    pub fn process_keyboard(&mut self, event: &KeyEvent) -> bool {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(code),
                state,
                repeat,
                ..
            } => {
                // a held F must not flip flying every repeat
                if *repeat && *code == KeyCode::KeyF {
                    return true;
                }
                self.set_key(*code, *state == ElementState::Pressed)
            }
            _ => false,
        }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.add_mouse_delta(delta.0, delta.1);
        }
    }

    pub fn add_mouse_delta(&mut self, dx: f64, dy: f64) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    pub fn mouse_delta(&self) -> (f64, f64) {
        self.mouse_delta
    }

    /// Apply held actions and accumulated mouse motion, then reset the motion
    pub fn drain(&mut self, controller: &Controller, scene: &mut Scene, dt: f32) {
        if self.forward {
            controller.move_forward(scene, dt);
        }
        if self.backward {
            controller.move_backward(scene, dt);
        }
        if self.left {
            controller.move_left(scene, dt);
        }
        if self.right {
            controller.move_right(scene, dt);
        }
        if self.jump {
            controller.jump(scene, dt);
        }
        if std::mem::take(&mut self.toggle_flying) {
            controller.toggle_flying(scene);
        }

        let (dx, dy) = std::mem::take(&mut self.mouse_delta);
        if dx != 0.0 || dy != 0.0 {
            controller.turn(scene, (dx as f32, dy as f32), dt);
        }
    }
}
