//! Simulated balls
//!
//! A body owns its kinematics, its per-step force/torque accumulators, the cached
//! model transform handed to the renderer, and the material tint picked by the last
//! frustum test.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::frustum::{Containment, Frustum};
use crate::consts::*;
use crate::error::{Result, SimError};
use crate::settings::SpeedClamp;

/// Stable handle to a body owned by a [`super::World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Material colors for a ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
}

impl Tint {
    /// Fully inside the view volume (red)
    pub const INSIDE: Tint = Tint {
        ambient: Vec4::new(0.1, 0.02, 0.02, 1.0),
        diffuse: Vec4::new(0.7, 0.1, 0.1, 1.0),
        specular: Vec4::new(0.6, 0.45, 0.45, 1.0),
    };
    /// Straddling a frustum plane (green)
    pub const INTERSECTING: Tint = Tint {
        ambient: Vec4::new(0.02, 0.1, 0.02, 1.0),
        diffuse: Vec4::new(0.1, 0.7, 0.1, 1.0),
        specular: Vec4::new(0.45, 0.6, 0.45, 1.0),
    };
    /// Outside the view volume (blue)
    pub const OUTSIDE: Tint = Tint {
        ambient: Vec4::new(0.02, 0.02, 0.1, 1.0),
        diffuse: Vec4::new(0.1, 0.1, 0.7, 1.0),
        specular: Vec4::new(0.45, 0.45, 0.6, 1.0),
    };

    pub fn for_containment(containment: Containment) -> Tint {
        match containment {
            Containment::Inside => Tint::INSIDE,
            Containment::Intersecting => Tint::INTERSECTING,
            Containment::Outside => Tint::OUTSIDE,
        }
    }
}

/// Read-only snapshot for diagnostic display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyDiagnostics {
    pub id: BodyId,
    pub radius: f32,
    pub mass: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub speed: f32,
    pub acceleration: Vec3,
    pub net_force: Vec3,
    pub angle: Vec3,
    pub angular_velocity: Vec3,
    pub containment: Containment,
}

/// A ball
#[derive(Debug, Clone)]
pub struct Body {
    id: BodyId,
    mass: f32,
    radius: f32,
    moment_of_inertia: f32,

    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,

    /// Accumulated this step, cleared after integration
    force: Vec3,
    torque: Vec3,
    /// Total force used by the last integration step
    net_force: Vec3,

    angle: Vec3,
    angular_velocity: Vec3,
    angular_acceleration: Vec3,

    model: Mat4,
    containment: Containment,
    tint: Tint,
}

/// Radius for a given mass
#[inline]
pub fn radius_for_mass(mass: f32) -> f32 {
    mass * RADIUS_PER_MASS
}

/// Solid-sphere moment of inertia (2/5 m r²)
#[inline]
pub fn solid_sphere_inertia(mass: f32, radius: f32) -> f32 {
    0.4 * mass * radius * radius
}

fn check_mass(mass: f32) -> Result<f32> {
    if mass.is_finite() && mass > 0.0 {
        Ok(mass)
    } else {
        Err(SimError::invalid("mass", mass))
    }
}

impl Body {
    pub fn new(id: BodyId, position: Vec3, velocity: Vec3, mass: f32) -> Result<Self> {
        let mass = check_mass(mass)?;
        let radius = radius_for_mass(mass);
        let mut body = Self {
            id,
            mass,
            radius,
            moment_of_inertia: solid_sphere_inertia(mass, radius),
            position,
            velocity,
            acceleration: Vec3::ZERO,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            net_force: Vec3::ZERO,
            angle: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            angular_acceleration: Vec3::ZERO,
            model: Mat4::IDENTITY,
            containment: Containment::Inside,
            tint: Tint::INSIDE,
        };
        body.refresh_transform();
        Ok(body)
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn moment_of_inertia(&self) -> f32 {
        self.moment_of_inertia
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Force accumulated so far this step
    pub fn pending_force(&self) -> Vec3 {
        self.force
    }

    /// Torque accumulated so far this step
    pub fn pending_torque(&self) -> Vec3 {
        self.torque
    }

    /// Total force applied during the last integration step
    pub fn net_force(&self) -> Vec3 {
        self.net_force
    }

    pub fn angle(&self) -> Vec3 {
        self.angle
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    pub fn angular_acceleration(&self) -> Vec3 {
        self.angular_acceleration
    }

    /// Cached translate * scale(radius) model matrix
    pub fn render_transform(&self) -> Mat4 {
        self.model
    }

    pub fn containment(&self) -> Containment {
        self.containment
    }

    pub fn tint(&self) -> Tint {
        self.tint
    }

    /// Change mass; radius and inertia follow
    pub fn set_mass(&mut self, mass: f32) -> Result<()> {
        self.mass = check_mass(mass)?;
        self.radius = radius_for_mass(self.mass);
        self.moment_of_inertia = solid_sphere_inertia(self.mass, self.radius);
        self.refresh_transform();
        Ok(())
    }

    /// Move the body, keeping the model transform in sync
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.refresh_transform();
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Accumulate a force. Also accumulates `position × f` as torque, so the
    /// lever arm is measured from the world origin, not the ball center.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
        self.torque += self.position.cross(force);
    }

    pub fn apply_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Weight along -Y
    pub fn apply_gravity(&mut self, gravity: f32) {
        self.apply_force(Vec3::new(0.0, -gravity, 0.0) * self.mass);
    }

    /// Linear drag opposing the current velocity
    pub fn apply_drag(&mut self, drag: f32) {
        self.apply_force(-self.velocity * drag);
    }

    /// Advance one step with semi-implicit Euler.
    ///
    /// Gravity and drag join whatever was accumulated since the last step. Both
    /// accumulators are empty afterwards.
    pub fn integrate(&mut self, dt: f32, gravity: f32, drag: f32, clamp: Option<SpeedClamp>) {
        self.apply_gravity(gravity);
        self.apply_drag(drag);

        self.acceleration = self.force / self.mass;
        self.velocity += self.acceleration * dt;
        if let Some(clamp) = clamp {
            self.velocity = clamp.apply(self.velocity);
        }
        self.position += self.velocity * dt;

        self.angular_acceleration = self.torque / self.moment_of_inertia;
        self.angular_velocity += self.angular_acceleration * dt;
        self.angle += self.angular_velocity * dt;

        // Rotation isn't baked into the model matrix; see `oriented_transform`
        self.refresh_transform();

        self.net_force = self.force;
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Model matrix including the integrated rotation (Euler XYZ)
    pub fn oriented_transform(&self) -> Mat4 {
        let rotation =
            glam::Quat::from_euler(glam::EulerRot::XYZ, self.angle.x, self.angle.y, self.angle.z);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.radius), rotation, self.position)
    }

    /// Classify against the view volume and pick the matching tint
    pub fn classify(&mut self, frustum: &Frustum) -> Containment {
        let containment = frustum.classify_sphere(self.position, self.radius);
        self.containment = containment;
        self.tint = Tint::for_containment(containment);
        containment
    }

    pub fn diagnostics(&self) -> BodyDiagnostics {
        BodyDiagnostics {
            id: self.id,
            radius: self.radius,
            mass: self.mass,
            position: self.position,
            velocity: self.velocity,
            speed: self.velocity.length(),
            acceleration: self.acceleration,
            net_force: self.net_force,
            angle: self.angle,
            angular_velocity: self.angular_velocity,
            containment: self.containment,
        }
    }

    fn refresh_transform(&mut self) {
        self.model = Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.radius));
    }
}

/// Integrate one body (see [`Body::integrate`])
pub fn integrate(body: &mut Body, dt: f32, gravity: f32, drag: f32) {
    body.integrate(dt, gravity, drag, None);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn ball(position: Vec3, velocity: Vec3, mass: f32) -> Body {
        Body::new(BodyId(1), position, velocity, mass).unwrap()
    }

    #[test]
    fn test_radius_and_inertia_follow_mass() {
        let body = ball(Vec3::ZERO, Vec3::ZERO, 4.0);
        assert!((body.radius() - 0.2).abs() < EPS);
        assert!((body.moment_of_inertia() - 0.4 * 4.0 * 0.04).abs() < EPS);
        assert!(body.moment_of_inertia() > 0.0);
    }

    #[test]
    fn test_rejects_bad_mass() {
        for mass in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                Body::new(BodyId(1), Vec3::ZERO, Vec3::ZERO, mass),
                Err(SimError::InvalidParameter { name: "mass", .. })
            ));
        }
    }

    #[test]
    fn test_set_mass_keeps_radius_in_sync() {
        let mut body = ball(Vec3::ZERO, Vec3::ZERO, 1.0);
        body.set_mass(10.0).unwrap();
        assert!((body.radius() - 0.5).abs() < EPS);
        assert!((body.render_transform().x_axis.x - 0.5).abs() < EPS);
        assert!(body.set_mass(0.0).is_err());
        assert!((body.mass() - 10.0).abs() < EPS);
    }

    #[test]
    fn test_apply_force_adds_position_torque() {
        let mut body = ball(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, 1.0);
        body.apply_force(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(body.pending_force(), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(body.pending_torque(), Vec3::new(0.0, 0.0, 2.0));
        body.apply_torque(Vec3::X);
        assert_eq!(body.pending_torque(), Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_semi_implicit_euler() {
        let mut body = ball(Vec3::new(0.0, 10.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 2.0);
        body.integrate(0.5, 10.0, 0.0, None);
        assert!((body.acceleration() - Vec3::new(0.0, -10.0, 0.0)).length() < EPS);
        // velocity updated first, position uses the new velocity
        assert!((body.velocity() - Vec3::new(1.0, -5.0, 0.0)).length() < EPS);
        assert!((body.position() - Vec3::new(0.5, 7.5, 0.0)).length() < EPS);
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let mut body = ball(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.0);
        body.integrate(0.1, 0.0, 0.5, None);
        assert!((body.net_force() - Vec3::new(-1.0, 0.0, 0.0)).length() < EPS);
        assert!(body.velocity().x < 2.0);
    }

    #[test]
    fn test_accumulators_cleared_after_step() {
        let mut body = ball(Vec3::new(1.0, 5.0, 0.0), Vec3::ZERO, 1.0);
        body.apply_force(Vec3::new(3.0, 0.0, 0.0));
        body.apply_torque(Vec3::Z);
        body.integrate(0.01, 9.81, 0.2, None);
        assert_eq!(body.pending_force(), Vec3::ZERO);
        assert_eq!(body.pending_torque(), Vec3::ZERO);
        assert!(body.net_force().x > 2.9);
    }

    #[test]
    fn test_angular_state_integrates() {
        let mut body = ball(Vec3::ZERO, Vec3::ZERO, 1.0);
        body.apply_torque(Vec3::new(0.0, body.moment_of_inertia(), 0.0));
        body.integrate(1.0, 0.0, 0.0, None);
        assert!((body.angular_acceleration() - Vec3::Y).length() < EPS);
        assert!((body.angular_velocity() - Vec3::Y).length() < EPS);
        assert!((body.angle() - Vec3::Y).length() < EPS);
    }

    #[test]
    fn test_render_transform_translates_and_scales() {
        let mut body = ball(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), 1.0);
        body.integrate(0.5, 0.0, 0.0, None);
        let model = body.render_transform();
        assert!((model.w_axis.truncate() - Vec3::new(0.0, 0.0, 1.0)).length() < EPS);
        assert!((model.x_axis.x - 0.05).abs() < EPS);

        body.set_position(Vec3::new(4.0, 3.0, 2.0));
        assert!((body.render_transform().w_axis.truncate() - Vec3::new(4.0, 3.0, 2.0)).length() < EPS);
    }

    #[test]
    fn test_oriented_transform_includes_rotation() {
        let mut body = ball(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 2.0);
        assert!(body.oriented_transform().abs_diff_eq(body.render_transform(), EPS));

        // One radian about Y
        body.apply_torque(Vec3::new(0.0, body.moment_of_inertia(), 0.0));
        body.integrate(1.0, 0.0, 0.0, None);
        let model = body.oriented_transform();
        let x = model.transform_vector3(Vec3::X);
        let expected = Vec3::new(1.0f32.cos(), 0.0, -1.0f32.sin()) * body.radius();
        assert!((x - expected).length() < EPS);
        assert!((model.w_axis.truncate() - body.position()).length() < EPS);
        // The plain render transform stays unrotated
        assert!((body.render_transform().transform_vector3(Vec3::X) - Vec3::X * 0.1).length() < EPS);
    }

    #[test]
    fn test_velocity_clamp_option() {
        let mut body = ball(Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0), 1.0);
        body.integrate(0.01, 0.0, 0.0, Some(SpeedClamp::LEGACY));
        assert!((body.velocity().length() - 5.0).abs() < 1e-4);

        let mut free = ball(Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0), 1.0);
        free.integrate(0.01, 0.0, 0.0, None);
        assert!((free.velocity().length() - 20.0).abs() < 1e-4);
    }
}
