pub mod animation;
pub mod clock;

use std::sync::Arc;

use animation::{Animation, Motion};
use clock::{Clock, SystemClock};

use crate::config::{AnimationConfig, StarFieldParams};
use crate::geometry::{build_primitives, StarPrimitive};
use crate::logging::{AuditLog, TrialLogger};
use crate::scene::{FrameDriven, SceneContainer, StarGroup};
use crate::{Quaternion, Vector3};

/// Time source, audit sink and trial id handed to a star field at construction
pub struct FieldHooks {
    pub clock: Box<dyn Clock>,
    pub logger: Option<Arc<dyn TrialLogger>>,
    pub trial_id: u64,
}

impl Default for FieldHooks {
    fn default() -> Self {
        FieldHooks {
            clock: Box::new(SystemClock::new()),
            logger: None,
            trial_id: 0,
        }
    }
}

impl FieldHooks {
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn TrialLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_trial_id(mut self, trial_id: u64) -> Self {
        self.trial_id = trial_id;
        self
    }
}

/// A set of star primitives on a spherical shell around the viewpoint,
/// rotating about the vertical (+Y) axis
///
/// The host owns the field, places [`StarField::drawable`] in its scene and
/// calls [`StarField::tick`] once per frame. Reconfiguration calls must be
/// made between ticks.
pub struct StarField<G: SceneContainer = StarGroup> {
    params: StarFieldParams,
    positions: Vec<Vector3>,
    container: G,
    animation: Animation,
    clock: Box<dyn Clock>,
    audit: AuditLog,
}

impl StarField<StarGroup> {
    /// Build a field in a fresh [`StarGroup`] using the system clock and no logger
    ///
    /// # Panics
    /// See [`crate::geometry::build_primitives`]
    pub fn new(params: StarFieldParams, positions: Vec<Vector3>) -> Self {
        Self::with_hooks(params, positions, StarGroup::new(), FieldHooks::default())
    }
}

impl<G: SceneContainer> StarField<G> {
    /// Build a field into `container`
    ///
    /// Construction entries go to `hooks.logger` when one is given.
    pub fn with_hooks(
        params: StarFieldParams,
        positions: Vec<Vector3>,
        container: G,
        hooks: FieldHooks,
    ) -> Self {
        let mut audit = AuditLog::default();
        audit.set_sink(hooks.logger);
        audit.set_trial_id(hooks.trial_id);

        let mut field = StarField {
            params,
            positions,
            container,
            animation: Animation::new(),
            clock: hooks.clock,
            audit,
        };
        field.build();
        field
    }

    fn build(&mut self) {
        self.audit.record("star_count", self.params.star_count);
        self.audit
            .record("angular_radius_deg", &self.params.angular_radius_deg);
        self.audit.record("shell_radius", self.params.shell_radius);
        self.audit.record("seed", self.params.seed);
        self.audit.record("color", &self.params.color);
        self.audit.record("primitive", self.params.primitive.as_str());

        for star in build_primitives(&self.params, &self.positions) {
            self.container.add_child(star);
        }

        tracing::debug!(
            star_count = self.params.star_count,
            shell_radius = self.params.shell_radius,
            primitive = self.params.primitive.as_str(),
            "built star field"
        );
    }

    /// Replace the whole configuration
    ///
    /// All primitives are discarded and the angle returns to zero before the
    /// new set is built. Rate and oscillation settings are kept, but an
    /// active oscillation restarts its phase from now.
    pub fn change_spheres(&mut self, params: StarFieldParams, positions: Vec<Vector3>) {
        self.container.clear_children();
        self.animation.reset_rotation(self.clock.now_seconds());
        self.audit.record("clear_spheres", true);
        self.audit.record("rotation", self.animation.rotation());

        self.params = params;
        self.positions = positions;
        self.build();
    }

    /// Remove every primitive without rebuilding or touching the angle
    pub fn clear_spheres(&mut self) {
        self.container.clear_children();
        self.audit.record("clear_spheres", true);
        tracing::debug!("cleared star field");
    }

    pub fn set_rotate_rate_rad_hz(&mut self, rad_hz: f64) {
        self.animation.set_rotate_rate_rad_hz(rad_hz);
        self.audit.record("rotate_rate_rad_hz", rad_hz);
        self.audit.record("rotation", self.animation.rotation());
    }

    pub fn set_rotate_rate_deg_hz(&mut self, deg_hz: f64) {
        self.set_rotate_rate_rad_hz(deg_hz.to_radians());
    }

    /// Start a sinusoidal swing from now when `rate_hz > 0`; any other rate stops it
    pub fn set_oscillation(&mut self, rate_hz: f64, max_angle_deg: f64) {
        let now = self.clock.now_seconds();
        let active = self.animation.set_oscillation(rate_hz, max_angle_deg, now);
        self.audit.record("oscillation_rate_hz", rate_hz);
        self.audit
            .record("oscillation_max_angle_rad", max_angle_deg.to_radians());
        self.audit.record("rotation", self.animation.rotation());
        tracing::debug!(rate_hz, max_angle_deg, active = active.is_some(), "oscillation set");
    }

    /// Jump to `angle_rad` (wrapped into [0, 2π)) in any mode
    pub fn set_rotation_absolute(&mut self, angle_rad: f64) {
        self.animation.set_rotation_absolute(angle_rad);
        self.audit.record("rotation", self.animation.rotation());
    }

    /// Advance one frame
    ///
    /// # Arguments
    /// * `delta_seconds` - time since the previous tick; unused while oscillating
    ///
    /// # Returns
    /// The new angle in radians
    pub fn tick(&mut self, delta_seconds: f64) -> f64 {
        let now = self.clock.now_seconds();
        let rotation = self.animation.step(delta_seconds, now);
        self.audit.record("rotation", rotation);
        rotation
    }

    /// Apply an initial rate and/or oscillation from config
    pub fn apply_animation(&mut self, config: &AnimationConfig) {
        if let Some(deg_hz) = config.rotate_rate_deg_hz {
            self.set_rotate_rate_deg_hz(deg_hz);
        }
        if let Some(osc) = config.oscillation {
            self.set_oscillation(osc.rate_hz, osc.max_angle_deg);
        }
    }

    pub fn set_trial_id(&mut self, trial_id: u64) {
        self.audit.set_trial_id(trial_id);
        self.audit.record("trial_id", trial_id);
    }

    pub fn trial_id(&self) -> u64 {
        self.audit.trial_id()
    }

    /// Attach or detach the audit sink
    pub fn set_logger(&mut self, logger: Option<Arc<dyn TrialLogger>>) {
        self.audit.set_sink(logger);
    }

    pub fn rotation(&self) -> f64 {
        self.animation.rotation()
    }

    pub fn motion(&self) -> Motion {
        self.animation.motion()
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn params(&self) -> &StarFieldParams {
        &self.params
    }

    pub fn positions(&self) -> &[Vector3] {
        &self.positions
    }

    pub fn stars(&self) -> &[StarPrimitive] {
        self.container.children()
    }

    /// The container the host adds to its scene
    pub fn drawable(&self) -> &G {
        &self.container
    }

    pub fn drawable_mut(&mut self) -> &mut G {
        &mut self.container
    }

    /// Group orientation: rotation by the current angle about +Y
    pub fn orientation(&self) -> Quaternion {
        Quaternion::from_axis_angle(&Vector3::y_axis(), self.animation.rotation())
    }

    /// Star positions after applying [`StarField::orientation`]
    pub fn world_positions(&self) -> Vec<Vector3> {
        let q = self.orientation();
        self.stars()
            .iter()
            .map(|star| q.transform_vector(&star.position))
            .collect()
    }
}

impl<G: SceneContainer> FrameDriven for StarField<G> {
    fn advance(&mut self, delta_seconds: f64) {
        self.tick(delta_seconds);
    }
}

impl<G: SceneContainer + std::fmt::Debug> std::fmt::Debug for StarField<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarField")
            .field("params", &self.params)
            .field("container", &self.container)
            .field("animation", &self.animation)
            .field("audit", &self.audit)
            .finish()
    }
}
