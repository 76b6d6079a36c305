//! Headless render host.
//!
//! Owns the scene graph and the frame loop. Instead of submitting draw calls
//! to a GPU it builds the per-frame draw list and logs it periodically.

use std::thread;

use anyhow::Result;
use glam::{Mat3, Mat4, Vec3};
use orrery_core::FrameClock;
use orrery_scene::{BodyDesc, NodeId, SceneGraph, SceneResult, SolarSystem};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, HostConfig};

/// Host-side sphere mesh description, stored as the drawable of body nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub label: &'static str,
    pub radius: f32,
    pub color: [f32; 4],
    pub z_samples: u32,
    pub radial_samples: u32,
}

impl Sphere {
    /// Triangle count of the tessellated sphere, poles included.
    pub fn triangles(&self) -> u32 {
        2 * self.z_samples.saturating_sub(2) * self.radial_samples
    }
}

impl From<&BodyDesc> for Sphere {
    fn from(desc: &BodyDesc) -> Self {
        Self {
            label: desc.name,
            radius: desc.radius,
            color: desc.color,
            z_samples: desc.z_samples,
            radial_samples: desc.radial_samples,
        }
    }
}

/// One entry of the draw list.
#[derive(Clone, Debug)]
pub struct DrawCommand {
    pub node: NodeId,
    pub label: &'static str,
    pub color: [f32; 4],
    pub triangles: u32,
    /// World matrix with the sphere radius folded into the scale
    pub model: Mat4,
    /// Normal matrix matching `model`
    pub normal: Mat3,
}

impl DrawCommand {
    /// World-space center of the sphere.
    pub fn position(&self) -> Vec3 {
        self.model.transform_point3(Vec3::ZERO)
    }
}

/// The frame loop driving the orrery.
pub struct Host {
    graph: SceneGraph<Sphere>,
    system: SolarSystem,
    clock: FrameClock,
    config: HostConfig,
    skipped: u64,
}

impl Host {
    /// Compose the scene described by `config`.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut graph = SceneGraph::new("root");
        let system = SolarSystem::build(&mut graph, config.orbit, |desc| Sphere::from(desc))?;
        info!(nodes = graph.len(), "Scene composed");

        Ok(Self {
            graph,
            system,
            clock: FrameClock::with_max_delta(config.host.max_delta),
            config: config.host.clone(),
            skipped: 0,
        })
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    /// Frames whose rotation update failed and was skipped.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Run one frame and return the time step it used.
    ///
    /// A failed update is logged and the frame's rotation skipped; drawing
    /// still happens with the previous state.
    pub fn frame(&mut self) -> Result<f32> {
        let measured = self.clock.tick();
        let tpf = self.config.fixed_tpf.unwrap_or(measured);

        if let Err(e) = self.system.update(&mut self.graph, tpf) {
            warn!(frame = self.clock.frames(), "Skipping rotation update: {}", e);
            self.skipped += 1;
        }

        let draw_list = self.draw_list()?;
        let frame = self.clock.frames();
        if self.config.report_every > 0 && frame % self.config.report_every == 0 {
            report(frame, &draw_list);
        }
        Ok(tpf)
    }

    /// Walk the scene and produce what would be submitted for drawing.
    pub fn draw_list(&self) -> SceneResult<Vec<DrawCommand>> {
        Ok(self
            .graph
            .drawables(self.graph.root())?
            .into_iter()
            .map(|(node, sphere, world)| {
                let sized = world.with_scale(world.scale * sphere.radius);
                DrawCommand {
                    node,
                    label: sphere.label,
                    color: sphere.color,
                    triangles: sphere.triangles(),
                    model: sized.compute_matrix(),
                    normal: sized.normal_matrix(),
                }
            })
            .collect())
    }

    /// Run until the configured frame count is reached.
    pub fn run(&mut self) -> Result<()> {
        let frame_budget = self.config.frame_budget();

        info!(
            frames = self.config.frames,
            fixed_tpf = ?self.config.fixed_tpf,
            "Entering frame loop"
        );
        while self.config.frames == 0 || self.clock.frames() < self.config.frames {
            self.frame()?;

            if let Some(budget) = frame_budget {
                let spent = self.clock.since_last_tick();
                if spent < budget {
                    thread::sleep(budget - spent);
                }
            }
        }

        info!(
            frames = self.clock.frames(),
            skipped = self.skipped,
            elapsed = ?self.clock.elapsed(),
            "Frame loop finished"
        );
        Ok(())
    }
}

fn report(frame: u64, draw_list: &[DrawCommand]) {
    let triangles: u32 = draw_list.iter().map(|cmd| cmd.triangles).sum();
    info!(frame, bodies = draw_list.len(), triangles, "World positions");
    for cmd in draw_list {
        let p = cmd.position();
        info!(
            body = cmd.label,
            "  ({:>7.3}, {:>7.3}, {:>7.3})", p.x, p.y, p.z
        );
        debug!(
            body = cmd.label,
            node = cmd.node.index(),
            color = ?cmd.color,
            normal = ?cmd.normal,
            "draw"
        );
    }
}
