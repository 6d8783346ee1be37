//! Orbital camera, projection and the damped orbit controller.
//!
//! The camera orbits a target point at a distance, described by yaw and
//! pitch; its position is derived, never stored. [`OrbitController`]
//! accumulates mouse input as pending deltas and applies them gradually in
//! [`OrbitController::update`], the damping discipline that gives the view
//! its smoothed glide. `update` reports whether the view actually moved,
//! which drives on-change frame sampling.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use winit::event::{MouseButton, MouseScrollDelta, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Keep pitch just short of the poles so the view never flips over.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.02;

/// Fraction of a pending delta applied per 60 Hz frame.
pub const DEFAULT_DAMPING: f32 = 0.05;

/// Below this applied movement the view counts as standing still.
const MOVEMENT_EPSILON: f32 = 1e-4;

#[derive(Debug)]
pub struct Camera {
    pub target: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub distance: f32,
}

impl Camera {
    pub fn new<T, Y, P>(target: T, yaw: Y, pitch: P, distance: f32) -> Self
    where
        T: Into<Point3<f32>>,
        Y: Into<Rad<f32>>,
        P: Into<Rad<f32>>,
    {
        Self {
            target: target.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            distance,
        }
    }

    /// Eye position on the orbit sphere. Yaw and pitch of zero place the
    /// camera on the positive Z axis looking back at the target.
    pub fn position(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let offset = Vector3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw);
        self.target + offset * self.distance
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }

    /// Snap back to the head-on framing used right after a model loads:
    /// camera on the Z axis at `distance`, looking at the origin.
    pub fn frame(&mut self, distance: f32) {
        self.target = Point3::new(0.0, 0.0, 0.0);
        self.yaw = Rad(0.0);
        self.pitch = Rad(0.0);
        self.distance = distance;
    }
}

#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Camera data as the shader sees it.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position().to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Mouse-driven orbit/pan/zoom with damping.
///
/// Input handlers only accumulate deltas; nothing moves until `update`
/// applies a damped fraction and decays the remainder, so releasing the
/// mouse leaves the view gliding to a stop over a few frames.
#[derive(Debug)]
pub struct OrbitController {
    sensitivity: f32,
    damping: f32,
    yaw_delta: f32,
    pitch_delta: f32,
    zoom_delta: f32,
    pan_x: f32,
    pan_y: f32,
    orbiting: bool,
    panning: bool,
}

impl OrbitController {
    pub fn new(sensitivity: f32, damping: f32) -> Self {
        Self {
            sensitivity,
            damping: damping.clamp(0.0, 1.0),
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            zoom_delta: 0.0,
            pan_x: 0.0,
            pan_y: 0.0,
            orbiting: false,
            panning: false,
        }
    }

    /// Feed raw mouse motion. Which gesture it belongs to depends on the
    /// button currently held: left orbits, right pans.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if self.orbiting {
            self.yaw_delta += dx as f32 * 0.005 * self.sensitivity;
            self.pitch_delta += dy as f32 * 0.005 * self.sensitivity;
        } else if self.panning {
            self.pan_x += dx as f32;
            self.pan_y += dy as f32;
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => match button {
                MouseButton::Left => self.orbiting = state.is_pressed(),
                MouseButton::Right => self.panning = state.is_pressed(),
                _ => (),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                self.zoom_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }
            _ => (),
        }
    }

    /// Discard pending motion, e.g. when the camera is reframed onto a
    /// freshly loaded model.
    pub fn reset(&mut self) {
        self.yaw_delta = 0.0;
        self.pitch_delta = 0.0;
        self.zoom_delta = 0.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Apply a damped fraction of the pending deltas and report whether the
    /// view moved beyond the idle threshold.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) -> bool {
        // Damping is defined per 60 Hz frame; convert to the actual frame
        // time so the glide feels the same at any refresh rate.
        let steps = dt.as_secs_f32() * 60.0;
        let factor = 1.0 - (1.0 - self.damping).powf(steps.max(0.0));
        let keep = 1.0 - factor;

        let applied_yaw = self.yaw_delta * factor;
        let applied_pitch = self.pitch_delta * factor;
        let applied_zoom = self.zoom_delta * factor;
        let applied_pan_x = self.pan_x * factor;
        let applied_pan_y = self.pan_y * factor;

        camera.yaw -= Rad(applied_yaw);
        camera.pitch = Rad((camera.pitch.0 + applied_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT));
        camera.distance = (camera.distance * 0.9f32.powf(applied_zoom)).max(0.01);

        if applied_pan_x != 0.0 || applied_pan_y != 0.0 {
            // Shift the target in the view plane, scaled so a drag covers
            // about the same screen distance regardless of zoom.
            let forward = (camera.target - camera.position()).normalize();
            let right = forward.cross(Vector3::unit_y()).normalize();
            let up = right.cross(forward);
            let units_per_pixel = camera.distance * 0.002;
            camera.target += right * (-applied_pan_x * units_per_pixel);
            camera.target += up * (applied_pan_y * units_per_pixel);
        }

        self.yaw_delta *= keep;
        self.pitch_delta *= keep;
        self.zoom_delta *= keep;
        self.pan_x *= keep;
        self.pan_y *= keep;

        applied_yaw.abs() > MOVEMENT_EPSILON
            || applied_pitch.abs() > MOVEMENT_EPSILON
            || applied_zoom.abs() > MOVEMENT_EPSILON
            || applied_pan_x.abs() > MOVEMENT_EPSILON
            || applied_pan_y.abs() > MOVEMENT_EPSILON
    }
}

/// Camera state bundled with its GPU resources, built once by the context
/// and written every redraw.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
