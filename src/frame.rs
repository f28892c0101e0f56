use glam::{Mat4, Vec2, Vec3};

use crate::input::{InputState, KeyCode};
use crate::starfield::Starfield;

pub const MOVE_SPEED: f32 = 2.5;
pub const AIM_SENSITIVITY: f32 = 0.1;
pub const ZOOM_SPEED: f32 = 3.0;
pub const MIN_CAMERA_DISTANCE: f32 = 2.0;
pub const MAX_CAMERA_DISTANCE: f32 = 10.0;
/// Rotation rates in radians per second.
pub const EARTH_TURN_RATE: f32 = 0.06;
pub const STAR_TURN_RATE: f32 = 0.03;

const FOV_Y_DEGREES: f32 = 60.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 500.0;

const KEY_FORWARD: KeyCode = KeyCode::Character('W');
const KEY_BACK: KeyCode = KeyCode::Character('S');
const KEY_LEFT: KeyCode = KeyCode::Character('A');
const KEY_RIGHT: KeyCode = KeyCode::Character('D');
const KEY_ZOOM_IN: KeyCode = KeyCode::Character('Z');
const KEY_ZOOM_OUT: KeyCode = KeyCode::Character('X');
const KEY_TOGGLE_TEXTURE: KeyCode = KeyCode::Character('L');

/// Free camera aimed at a movable target point.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub target: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            target: Vec3::ZERO,
        }
    }
}

/// All mutable per-frame state, threaded explicitly through the update
/// instead of living in globals.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub camera: Camera,
    earth_angle: f32,
    star_angle: f32,
    distance: f32,
    last_cursor: Option<Vec2>,
    alternate_texture: bool,
    toggle_was_down: bool,
}

impl Default for FrameState {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameState {
    pub fn new() -> Self {
        Self {
            camera: Camera::default(),
            earth_angle: 0.0,
            star_angle: 0.0,
            distance: 5.0,
            last_cursor: None,
            alternate_texture: false,
            toggle_was_down: false,
        }
    }

    /// Advances camera, zoom, toggle and rotation state by `dt` seconds.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        self.advance_camera(input, dt);
        self.aim_camera(input.mouse_position(), dt);
        self.apply_zoom(input, dt);
        self.toggle_texture(input);
        self.earth_angle += EARTH_TURN_RATE * dt;
        self.star_angle += STAR_TURN_RATE * dt;
    }

    fn advance_camera(&mut self, input: &InputState, dt: f32) {
        let step = MOVE_SPEED * dt;
        let camera = &mut self.camera;
        if input.is_key_down(KEY_FORWARD) {
            camera.position += camera.front * step;
        }
        if input.is_key_down(KEY_BACK) {
            camera.position -= camera.front * step;
        }
        let strafe = camera.front.cross(camera.up).normalize_or_zero();
        if input.is_key_down(KEY_LEFT) {
            camera.position -= strafe * step;
        }
        if input.is_key_down(KEY_RIGHT) {
            camera.position += strafe * step;
        }
    }

    /// Mouse aim offsets the look-at target rather than a yaw/pitch pair.
    /// The first cursor sample only seeds `last_cursor` so the view does not
    /// jump on the initial event.
    fn aim_camera(&mut self, cursor: Vec2, dt: f32) {
        let Some(last) = self.last_cursor.replace(cursor) else {
            return;
        };
        let offset = (cursor - last) * AIM_SENSITIVITY;
        self.camera.target.x += offset.x * dt;
        // Screen coordinates grow downward.
        self.camera.target.y -= offset.y * dt;
    }

    /// Dolly zoom: the clamped camera distance translates the position along
    /// the front vector, so zooming is visible through the view matrix.
    fn apply_zoom(&mut self, input: &InputState, dt: f32) {
        let mut requested = self.distance;
        if input.is_key_down(KEY_ZOOM_IN) {
            requested -= ZOOM_SPEED * dt;
        }
        if input.is_key_down(KEY_ZOOM_OUT) {
            requested += ZOOM_SPEED * dt;
        }
        let clamped = requested.clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
        let applied = self.distance - clamped;
        if applied != 0.0 {
            self.camera.position += self.camera.front * applied;
            self.distance = clamped;
        }
    }

    fn toggle_texture(&mut self, input: &InputState) {
        let down = input.is_key_down(KEY_TOGGLE_TEXTURE);
        if down && !self.toggle_was_down {
            self.alternate_texture = !self.alternate_texture;
        }
        self.toggle_was_down = down;
    }

    pub fn camera_distance(&self) -> f32 {
        self.distance
    }

    pub fn earth_angle(&self) -> f32 {
        self.earth_angle
    }

    pub fn star_angle(&self) -> f32 {
        self.star_angle
    }

    pub fn alternate_texture(&self) -> bool {
        self.alternate_texture
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.camera.position, self.camera.target, self.camera.up)
    }

    pub fn projection(aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            FOV_Y_DEGREES.to_radians(),
            aspect.max(0.01),
            NEAR_PLANE,
            FAR_PLANE,
        )
    }

    pub fn earth_model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.earth_angle)
    }

    /// Everything the renderer needs for one frame.
    pub fn matrices(&self, aspect: f32, starfield: &Starfield) -> FrameMatrices {
        FrameMatrices {
            view_proj: Self::projection(aspect) * self.view_matrix(),
            earth_model: self.earth_model(),
            star_models: starfield.model_matrices(self.star_angle),
            alternate_texture: self.alternate_texture,
        }
    }
}

/// Matrices and draw switches computed once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMatrices {
    pub view_proj: Mat4,
    pub earth_model: Mat4,
    pub star_models: Vec<Mat4>,
    pub alternate_texture: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn input_with(keys: &[KeyCode]) -> InputState {
        let input = InputState::new();
        for &key in keys {
            input.set_key_down(key);
        }
        input
    }

    #[test]
    fn forward_motion_follows_the_front_vector() {
        let mut frame = FrameState::new();
        frame.update(&input_with(&[KEY_FORWARD]), 1.0);
        assert!((frame.camera.position - Vec3::new(0.0, 0.0, 2.5)).length() < 1e-5);
    }

    #[test]
    fn strafing_moves_along_the_right_vector() {
        let mut frame = FrameState::new();
        frame.update(&input_with(&[KEY_RIGHT]), 0.5);
        assert!((frame.camera.position - Vec3::new(1.25, 0.0, 5.0)).length() < 1e-5);
        frame.update(&input_with(&[KEY_LEFT]), 0.5);
        assert!((frame.camera.position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn first_cursor_sample_does_not_move_the_target() {
        let mut frame = FrameState::new();
        let input = InputState::new();
        input.set_mouse_position(Vec2::new(400.0, 300.0));
        frame.update(&input, 0.016);
        assert_eq!(frame.camera.target, Vec3::ZERO);
    }

    #[test]
    fn cursor_deltas_offset_the_target_with_inverted_y() {
        let mut frame = FrameState::new();
        let input = InputState::new();
        input.set_mouse_position(Vec2::new(100.0, 100.0));
        frame.update(&input, 1.0);
        // Cursor moves right and up (screen y decreases).
        input.set_mouse_position(Vec2::new(110.0, 90.0));
        frame.update(&input, 1.0);
        assert!((frame.camera.target.x - 1.0).abs() < 1e-5);
        assert!((frame.camera.target.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zoom_distance_clamps_at_both_ends() {
        let mut frame = FrameState::new();
        frame.update(&input_with(&[KEY_ZOOM_IN]), 10.0);
        assert_eq!(frame.camera_distance(), MIN_CAMERA_DISTANCE);
        frame.update(&input_with(&[KEY_ZOOM_OUT]), 10.0);
        assert_eq!(frame.camera_distance(), MAX_CAMERA_DISTANCE);
    }

    #[test]
    fn zoom_dollies_the_camera_along_front() {
        let mut frame = FrameState::new();
        frame.update(&input_with(&[KEY_ZOOM_IN]), 0.5);
        // Distance 5.0 -> 3.5, so the camera moved 1.5 units forward.
        assert!((frame.camera_distance() - 3.5).abs() < 1e-5);
        assert!((frame.camera.position.z - 3.5).abs() < 1e-5);
    }

    #[test]
    fn texture_toggle_fires_on_the_key_edge_only() {
        let mut frame = FrameState::new();
        let input = input_with(&[KEY_TOGGLE_TEXTURE]);
        frame.update(&input, 0.016);
        assert!(frame.alternate_texture());
        // Held key must not retrigger.
        frame.update(&input, 0.016);
        assert!(frame.alternate_texture());
        input.set_key_up(KEY_TOGGLE_TEXTURE);
        frame.update(&input, 0.016);
        input.set_key_down(KEY_TOGGLE_TEXTURE);
        frame.update(&input, 0.016);
        assert!(!frame.alternate_texture());
    }

    #[test]
    fn rotation_angles_scale_with_elapsed_time() {
        let mut frame = FrameState::new();
        let input = InputState::new();
        frame.update(&input, 0.5);
        assert!((frame.earth_angle() - EARTH_TURN_RATE * 0.5).abs() < 1e-6);
        assert!((frame.star_angle() - STAR_TURN_RATE * 0.5).abs() < 1e-6);
    }

    #[test]
    fn frame_matrices_cover_the_whole_star_field() {
        let frame = FrameState::new();
        let stars = Starfield::generate(50, 20.0, &mut StdRng::seed_from_u64(5));
        let matrices = frame.matrices(1.0, &stars);
        assert_eq!(matrices.star_models.len(), 50);
        assert_eq!(
            matrices.view_proj,
            FrameState::projection(1.0) * frame.view_matrix()
        );
    }
}
