//! Fixed ordering of the work done each frame.

use std::fmt;

use cirrus_editor::EditorMode;

/// One step of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStage {
    /// Controller update from this frame's keyboard and mouse state.
    Input,
    /// Fixed-step physics. Playing only.
    Physics,
    /// Build the egui panels; edits land in the live settings here.
    Ui,
    /// Freeze camera and scene settings into this frame's snapshot.
    Snapshot,
    /// CPU raymarch, upload and fullscreen blit. Clears the target.
    Raymarch,
    /// Physics proxies and imported meshes, depth tested.
    Raster,
    /// egui draw on top, no clear.
    Overlay,
    Present,
}

impl fmt::Display for FrameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The stages a frame runs, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePlan {
    stages: Vec<FrameStage>,
}

impl FramePlan {
    pub fn for_mode(mode: EditorMode) -> Self {
        let stages = [
            FrameStage::Input,
            FrameStage::Physics,
            FrameStage::Ui,
            FrameStage::Snapshot,
            FrameStage::Raymarch,
            FrameStage::Raster,
            FrameStage::Overlay,
            FrameStage::Present,
        ]
        .into_iter()
        .filter(|s| *s != FrameStage::Physics || mode.is_playing())
        .collect();
        Self { stages }
    }

    pub fn stages(&self) -> &[FrameStage] {
        &self.stages
    }

    pub fn contains(&self, stage: FrameStage) -> bool {
        self.stages.contains(&stage)
    }

    fn position(&self, stage: FrameStage) -> Option<usize> {
        self.stages.iter().position(|s| *s == stage)
    }

    /// True when both stages run and `first` runs before `second`.
    pub fn runs_before(&self, first: FrameStage, second: FrameStage) -> bool {
        matches!(
            (self.position(first), self.position(second)),
            (Some(a), Some(b)) if a < b
        )
    }
}
