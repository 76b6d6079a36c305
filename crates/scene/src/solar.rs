//! The solar-system scene and its per-frame orbit update.
//!
//! Layout, all pivots hanging off the graph root:
//!
//! ```text
//! root
//! ├── sun-pivot
//! │   ├── sun ── sun-body
//! │   └── earth (6, 0, 0)
//! │       ├── earth-body
//! │       └── moon-body (1, 0, 0)
//! ├── mercury-pivot
//! │   └── mercury (2, 0, 0) ── mercury-body
//! └── venus-pivot
//!     └── venus (4, 0, 0) ── venus-body
//! ```
//!
//! Spinning `earth` carries the moon around it; spinning a pivot carries
//! everything beneath it around the pivot's origin.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{SceneError, SceneResult};
use crate::graph::SceneGraph;
use crate::node::NodeId;

/// Names of the nodes the orbit update targets or the layout creates.
pub mod names {
    /// Pivot carrying the sun and the earth; its spin is the earth's orbit.
    pub const SUN_PIVOT: &str = "sun-pivot";
    /// Pivot whose spin is mercury's orbit.
    pub const MERCURY_PIVOT: &str = "mercury-pivot";
    /// Pivot whose spin is venus' orbit.
    pub const VENUS_PIVOT: &str = "venus-pivot";
    /// Group holding the sun's body, at the pivot origin.
    pub const SUN: &str = "sun";
    /// Group holding the earth and the moon; its spin is the moon's orbit.
    pub const EARTH: &str = "earth";
    /// Group holding mercury's body, offset from its pivot.
    pub const MERCURY: &str = "mercury";
    /// Group holding venus' body, offset from its pivot.
    pub const VENUS: &str = "venus";
    /// Drawable leaf of the sun.
    pub const SUN_BODY: &str = "sun-body";
    /// Drawable leaf of the earth.
    pub const EARTH_BODY: &str = "earth-body";
    /// Drawable leaf of the moon.
    pub const MOON_BODY: &str = "moon-body";
    /// Drawable leaf of mercury.
    pub const MERCURY_BODY: &str = "mercury-body";
    /// Drawable leaf of venus.
    pub const VENUS_BODY: &str = "venus-body";

    /// Every name the layout creates, in creation order.
    pub const ALL: [&str; 12] = [
        SUN_PIVOT,
        MERCURY_PIVOT,
        VENUS_PIVOT,
        SUN,
        EARTH,
        MERCURY,
        VENUS,
        SUN_BODY,
        EARTH_BODY,
        MOON_BODY,
        MERCURY_BODY,
        VENUS_BODY,
    ];
}

/// Angular velocity in radians per second about each local axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngularRate {
    /// Pitch rate about X
    pub x: f32,
    /// Yaw rate about Y
    pub y: f32,
    /// Roll rate about Z
    pub z: f32,
}

impl AngularRate {
    /// Create a rate from per-axis radians per second.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Angles covered during a frame of `tpf` seconds.
    pub fn angles(&self, tpf: f32) -> Vec3 {
        Vec3::new(self.x, self.y, self.z) * tpf
    }
}

/// Per-node angular velocities applied by [`SolarSystem::update`].
///
/// The defaults are hand-tuned to look pleasant, not derived from real orbits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitRates {
    /// Spin of the earth node, which swings the moon around it
    pub earth_spin: AngularRate,
    /// Orbit of the sun pivot, which carries the earth
    pub sun_pivot: AngularRate,
    /// Orbit of mercury's pivot
    pub mercury_pivot: AngularRate,
    /// Orbit of venus' pivot
    pub venus_pivot: AngularRate,
}

impl Default for OrbitRates {
    fn default() -> Self {
        Self {
            earth_spin: AngularRate::new(0.0, 1.0, 0.0),
            sun_pivot: AngularRate::new(0.0, 1.0 / 3.0, 0.0),
            mercury_pivot: AngularRate::new(0.0, 1.0 / 2.0, 1.0 / 3.0),
            venus_pivot: AngularRate::new(0.0, 1.0 / 5.0, 1.0 / 6.0),
        }
    }
}

/// Description of a body handed to the host so it can build a drawable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDesc {
    /// Name of the node that will carry the drawable
    pub name: &'static str,
    /// Sphere radius
    pub radius: f32,
    /// RGBA color
    pub color: [f32; 4],
    /// Tessellation along the sphere's axis
    pub z_samples: u32,
    /// Tessellation around the sphere's axis
    pub radial_samples: u32,
}

impl BodyDesc {
    const fn sphere(name: &'static str, radius: f32, color: [f32; 4]) -> Self {
        Self {
            name,
            radius,
            color,
            z_samples: 30,
            radial_samples: 30,
        }
    }
}

pub const SUN: BodyDesc = BodyDesc::sphere(names::SUN_BODY, 1.2, [1.0, 1.0, 0.0, 1.0]);
pub const EARTH: BodyDesc = BodyDesc::sphere(names::EARTH_BODY, 0.7, [0.0, 0.0, 1.0, 1.0]);
pub const MOON: BodyDesc = BodyDesc::sphere(names::MOON_BODY, 0.2, [1.0, 1.0, 1.0, 1.0]);
pub const MERCURY: BodyDesc =
    BodyDesc::sphere(names::MERCURY_BODY, 0.4, [0.984, 0.51, 0.0, 1.0]);
pub const VENUS: BodyDesc = BodyDesc::sphere(names::VENUS_BODY, 0.5, [0.0, 1.0, 1.0, 1.0]);

/// Every body of the scene, in creation order.
pub const BODIES: [BodyDesc; 5] = [SUN, EARTH, MOON, MERCURY, VENUS];

const EARTH_ORBIT: Vec3 = Vec3::new(6.0, 0.0, 0.0);
const MOON_ORBIT: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const MERCURY_ORBIT: Vec3 = Vec3::new(2.0, 0.0, 0.0);
const VENUS_ORBIT: Vec3 = Vec3::new(4.0, 0.0, 0.0);

/// Drives the orbit animation of a solar-system scene.
#[derive(Clone, Debug)]
pub struct SolarSystem {
    root: NodeId,
    rates: OrbitRates,
}

impl SolarSystem {
    /// Compose the solar system under the root of `graph`.
    ///
    /// `make_drawable` is called once per [`BodyDesc`] in [`BODIES`] order;
    /// whatever it returns is stored on the body node untouched.
    ///
    /// Every layout name is checked before anything is created, so a
    /// conflict leaves `graph` exactly as it was.
    ///
    /// # Errors
    ///
    /// [`SceneError::DuplicateName`] for the first name in [`names::ALL`]
    /// already present in `graph`.
    pub fn build<D, F>(
        graph: &mut SceneGraph<D>,
        rates: OrbitRates,
        mut make_drawable: F,
    ) -> SceneResult<Self>
    where
        F: FnMut(&BodyDesc) -> D,
    {
        if let Some(taken) = names::ALL.iter().find(|name| graph.contains_name(name)) {
            return Err(SceneError::DuplicateName(taken.to_string()));
        }

        let root = graph.root();

        let sun_pivot = graph.create_node(names::SUN_PIVOT)?;
        let mercury_pivot = graph.create_node(names::MERCURY_PIVOT)?;
        let venus_pivot = graph.create_node(names::VENUS_PIVOT)?;

        let sun = graph.create_node(names::SUN)?;
        let earth = graph.create_node(names::EARTH)?;
        let mercury = graph.create_node(names::MERCURY)?;
        let venus = graph.create_node(names::VENUS)?;

        let sun_body = graph.create_drawable_node(SUN.name, make_drawable(&SUN))?;
        let earth_body = graph.create_drawable_node(EARTH.name, make_drawable(&EARTH))?;
        let moon_body = graph.create_drawable_node(MOON.name, make_drawable(&MOON))?;
        let mercury_body = graph.create_drawable_node(MERCURY.name, make_drawable(&MERCURY))?;
        let venus_body = graph.create_drawable_node(VENUS.name, make_drawable(&VENUS))?;

        graph.set_translation(moon_body, MOON_ORBIT)?;
        graph.set_translation(earth, EARTH_ORBIT)?;
        graph.set_translation(mercury, MERCURY_ORBIT)?;
        graph.set_translation(venus, VENUS_ORBIT)?;

        graph.attach(earth, earth_body)?;
        graph.attach(earth, moon_body)?;
        graph.attach(mercury, mercury_body)?;
        graph.attach(venus, venus_body)?;
        graph.attach(sun, sun_body)?;

        graph.attach(sun_pivot, sun)?;
        graph.attach(sun_pivot, earth)?;
        graph.attach(mercury_pivot, mercury)?;
        graph.attach(venus_pivot, venus)?;

        graph.attach(root, sun_pivot)?;
        graph.attach(root, mercury_pivot)?;
        graph.attach(root, venus_pivot)?;

        debug!(nodes = graph.len(), "solar system composed");
        Ok(Self { root, rates })
    }

    /// The node under which the update looks up its targets.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Angular velocities applied on each update.
    pub fn rates(&self) -> &OrbitRates {
        &self.rates
    }

    /// Replace the angular velocities, keeping the accumulated rotations.
    pub fn set_rates(&mut self, rates: OrbitRates) {
        self.rates = rates;
    }

    /// Advance the animation by `tpf` seconds.
    ///
    /// All targets are resolved before any is rotated, so a missing node
    /// leaves the whole scene untouched for this frame. A `tpf` of zero is an
    /// identity rotation.
    ///
    /// # Errors
    ///
    /// - [`SceneError::InvalidTimeStep`] if `tpf` is negative or not finite.
    /// - [`SceneError::NotFound`] if a target node is missing.
    pub fn update<D>(&self, graph: &mut SceneGraph<D>, tpf: f32) -> SceneResult<()> {
        if !tpf.is_finite() || tpf < 0.0 {
            return Err(SceneError::InvalidTimeStep(tpf));
        }

        let targets = [
            (names::EARTH, self.rates.earth_spin),
            (names::SUN_PIVOT, self.rates.sun_pivot),
            (names::MERCURY_PIVOT, self.rates.mercury_pivot),
            (names::VENUS_PIVOT, self.rates.venus_pivot),
        ];

        let mut resolved = Vec::with_capacity(targets.len());
        for (name, rate) in targets {
            resolved.push((graph.find_by_name(self.root, name)?, rate));
        }

        for (id, rate) in resolved {
            let angles = rate.angles(tpf);
            graph.rotate(id, angles.x, angles.y, angles.z)?;
        }

        trace!(tpf, "orbit update");
        Ok(())
    }
}
