//! Crop session lifecycle.
//!
//! A [`CropSession`] strings the pipeline together for one upload
//! dialog: load bytes, zoom and pan under the fixed region, render
//! previews, commit once. The stage machine keeps every operation honest
//! about the state it needs, so hosts get typed errors instead of
//! half-initialized geometry.

use thiserror::Error;

use crate::decode::{load_source, LoadError, SourceImage};
use crate::encode::{EncodeError, EncodedImage};
use crate::output::commit_crop;
use crate::render::{render_preview, PreviewFrame};
use crate::viewport::{Viewport, ViewportState};
use crate::{CropShape, OutputSpec, OutputSpecError, ResolvedOutput};

/// Errors for operations issued in the wrong stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No image is currently loaded.
    #[error("no image loaded")]
    NoImage,

    /// The crop was already committed; the session is finished.
    #[error("crop already committed")]
    Completed,
}

/// Errors from committing the crop.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The session is not in an interactive stage.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Encoding the final raster failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Externally visible lifecycle stage of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    /// No file has been loaded yet.
    Empty,
    /// The last load failed; the error is kept for display.
    Failed,
    /// An image is loaded and interactive.
    Ready,
    /// The crop was committed.
    Committed,
}

/// Interactive state held while an image is loaded.
#[derive(Debug)]
struct Active {
    source: SourceImage,
    viewport: Viewport,
    drag_anchor: Option<(f64, f64)>,
}

#[derive(Debug)]
enum Stage {
    Empty,
    Failed(LoadError),
    Ready(Active),
    Committed,
}

/// One avatar/banner crop interaction, from file pick to upload bytes.
#[derive(Debug)]
pub struct CropSession {
    shape: CropShape,
    output: ResolvedOutput,
    stage: Stage,
}

impl CropSession {
    /// Create a session from a caller-facing output spec.
    ///
    /// # Errors
    ///
    /// Fails when the spec cannot be resolved, for example a zero or
    /// non-finite aspect ratio.
    pub fn new(spec: OutputSpec) -> Result<Self, OutputSpecError> {
        let output = spec.resolve()?;
        Ok(Self {
            shape: output.shape,
            output,
            stage: Stage::Empty,
        })
    }

    /// Current lifecycle stage.
    pub fn stage(&self) -> SessionStage {
        match self.stage {
            Stage::Empty => SessionStage::Empty,
            Stage::Failed(_) => SessionStage::Failed,
            Stage::Ready(_) => SessionStage::Ready,
            Stage::Committed => SessionStage::Committed,
        }
    }

    /// Crop region shape for this session.
    pub fn shape(&self) -> CropShape {
        self.shape
    }

    /// Resolved export size as `(width, height)`.
    pub fn output_size(&self) -> (u32, u32) {
        (self.output.width, self.output.height)
    }

    /// The error from the most recent failed load, if that is the stage.
    pub fn load_error(&self) -> Option<&LoadError> {
        match &self.stage {
            Stage::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Load a new file, replacing whatever was loaded before.
    ///
    /// Allowed in every stage: a failed or committed session can start
    /// over with a fresh upload. On success the viewport resets to the
    /// initial zoom and a centered offset.
    ///
    /// # Errors
    ///
    /// Propagates [`LoadError`]; the session moves to the failed stage
    /// and keeps the error for display.
    pub fn load(&mut self, bytes: &[u8]) -> Result<ViewportState, LoadError> {
        match load_source(bytes) {
            Ok(source) => {
                let viewport = Viewport::new(source.width, source.height, self.shape);
                let state = viewport.state();
                self.stage = Stage::Ready(Active {
                    source,
                    viewport,
                    drag_anchor: None,
                });
                Ok(state)
            }
            Err(err) => {
                self.stage = Stage::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Snapshot the current viewport state.
    pub fn viewport(&self) -> Result<ViewportState, SessionError> {
        Ok(self.active()?.viewport.state())
    }

    /// Set the zoom factor; clamping and offset re-clamping apply.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<ViewportState, SessionError> {
        Ok(self.active_mut()?.viewport.set_zoom(zoom))
    }

    /// Capture the current offset as the anchor of a drag gesture.
    pub fn begin_pan(&mut self) -> Result<(), SessionError> {
        let active = self.active_mut()?;
        active.drag_anchor = Some(active.viewport.offset());
        Ok(())
    }

    /// Pan by the total pointer displacement since the drag began.
    ///
    /// Without a preceding [`CropSession::begin_pan`] the current offset
    /// serves as the anchor, which makes each call incremental.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<ViewportState, SessionError> {
        let active = self.active_mut()?;
        let anchor = active
            .drag_anchor
            .unwrap_or_else(|| active.viewport.offset());
        Ok(active.viewport.pan_from(anchor, dx, dy))
    }

    /// Finish a drag gesture.
    pub fn end_pan(&mut self) -> Result<(), SessionError> {
        self.active_mut()?.drag_anchor = None;
        Ok(())
    }

    /// Render the live preview for the current state.
    pub fn render_preview(&self) -> Result<PreviewFrame, SessionError> {
        let active = self.active()?;
        Ok(render_preview(&active.source, &active.viewport, self.shape))
    }

    /// Produce the final export and finish the session.
    ///
    /// On success the session moves to [`SessionStage::Committed`] and
    /// further edits are rejected. An encoder failure leaves the session
    /// interactive so the caller can retry.
    pub fn commit(&mut self) -> Result<EncodedImage, CommitError> {
        let active = self.active()?;
        let encoded = commit_crop(&active.source, &active.viewport, &self.output)?;
        self.stage = Stage::Committed;
        Ok(encoded)
    }

    fn active(&self) -> Result<&Active, SessionError> {
        match &self.stage {
            Stage::Ready(active) => Ok(active),
            Stage::Committed => Err(SessionError::Completed),
            Stage::Empty | Stage::Failed(_) => Err(SessionError::NoImage),
        }
    }

    fn active_mut(&mut self) -> Result<&mut Active, SessionError> {
        match &mut self.stage {
            Stage::Ready(active) => Ok(active),
            Stage::Committed => Err(SessionError::Completed),
            Stage::Empty | Stage::Failed(_) => Err(SessionError::NoImage),
        }
    }
}
