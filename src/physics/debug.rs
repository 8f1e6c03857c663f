//! Debug-draw line collection and runtime toggles.
//!
//! The physics world renders its debug overlay into a plain list of colored
//! line segments. How (and whether) those lines reach the screen is up to
//! the render layer; collecting them never allocates GPU resources and can
//! not fail, so toggling the overlay has no effect on simulation
//! correctness.

use rapier3d::pipeline::{DebugRenderBackend, DebugRenderObject};
use rapier3d::prelude::{Point, Real};

use crate::physics::PhysicsWorld;

pub use rapier3d::pipeline::DebugRenderMode;

/// One debug overlay segment in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub from: [f32; 3],
    pub to: [f32; 3],
    /// HSLA, as emitted by the rapier debug renderer.
    pub color: [f32; 4],
}

/// Backend that appends every rendered line to a buffer.
pub(crate) struct LineCollector<'a> {
    lines: &'a mut Vec<DebugLine>,
}

impl<'a> LineCollector<'a> {
    pub(crate) fn new(lines: &'a mut Vec<DebugLine>) -> Self {
        Self { lines }
    }
}

impl DebugRenderBackend for LineCollector<'_> {
    fn draw_line(
        &mut self,
        _object: DebugRenderObject,
        a: Point<Real>,
        b: Point<Real>,
        color: [f32; 4],
    ) {
        self.lines.push(DebugLine {
            from: [a.x, a.y, a.z],
            to: [b.x, b.y, b.z],
            color,
        });
    }
}

/// A labelled on/off switch for one debug overlay.
///
/// The set of toggles is a fixed table rather than closures over the world,
/// so a menu can list them without capturing any engine state.
#[derive(Debug, Clone, Copy)]
pub struct DebugToggle {
    mode: DebugRenderMode,
    label: &'static str,
}

impl DebugToggle {
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_enabled(&self, world: &PhysicsWorld) -> bool {
        world.debug_mode().contains(self.mode)
    }

    pub fn toggle(&self, world: &mut PhysicsWorld) {
        let mut mode = world.debug_mode();
        mode.toggle(self.mode);
        world.set_debug_mode(mode);
        log::info!(
            "Debug overlay \"{}\" {}",
            self.label,
            if world.debug_mode().contains(self.mode) {
                "enabled"
            } else {
                "disabled"
            }
        );
    }
}

static TOGGLES: [DebugToggle; 3] = [
    DebugToggle {
        mode: DebugRenderMode::COLLIDER_SHAPES,
        label: "Collider wireframes",
    },
    DebugToggle {
        mode: DebugRenderMode::COLLIDER_AABBS,
        label: "Collider AABBs",
    },
    DebugToggle {
        mode: DebugRenderMode::CONTACTS,
        label: "Contact points",
    },
];

/// The overlays a debug menu can offer.
pub fn debug_toggles() -> &'static [DebugToggle] {
    &TOGGLES
}
