//! Editing session: the context object driven by the event loop.
//!
//! A `Session` owns the registry, the mode controller and the match finder
//! (which holds the read-only search image). Every event is handled to
//! completion before the next one, so no state is shared across threads.

mod command;
mod input;

pub use command::{Command, THRESHOLD_STEP};
pub use input::InputEvent;

use std::path::{Path, PathBuf};

use crate::contour::{detect_regions, DetectConfig};
use crate::group::{auto_group, GroupReport};
use crate::image::ImageView;
use crate::matcher::{MatchConfig, MatchFinder};
use crate::mode::{EditContext, Effect, Mode, ModeController, PointerEvent};
use crate::region::{BoxRegistry, UNGROUPED};
use crate::render::{render_registry, Renderer};
use crate::trace::{trace_event, trace_warn};
use crate::util::GlyphGroupResult;

/// Whether the event loop should keep running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Application context for one editing session.
#[derive(Debug)]
pub struct Session {
    registry: BoxRegistry,
    controller: ModeController,
    finder: MatchFinder,
    snapshot_path: PathBuf,
    last_report: Option<GroupReport>,
}

impl Session {
    pub fn new(
        registry: BoxRegistry,
        finder: MatchFinder,
        snapshot_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            controller: ModeController::default(),
            finder,
            snapshot_path: snapshot_path.into(),
            last_report: None,
        }
    }

    /// Seeds the registry by detecting blobs in `binary` and prepares matching
    /// against the same image.
    pub fn from_image(
        binary: ImageView<'_, u8>,
        detect: &DetectConfig,
        matching: MatchConfig,
        snapshot_path: impl Into<PathBuf>,
    ) -> GlyphGroupResult<Self> {
        let registry = detect_regions(binary, detect)?;
        let finder = MatchFinder::new(binary, matching)?;
        Ok(Self::new(registry, finder, snapshot_path))
    }

    pub fn registry(&self) -> &BoxRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BoxRegistry {
        &mut self.registry
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn finder(&self) -> &MatchFinder {
        &self.finder
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Report of the most recent grouping pass.
    pub fn last_report(&self) -> Option<&GroupReport> {
        self.last_report.as_ref()
    }

    /// Handles one event. Recoverable failures are logged and swallowed;
    /// anything else is returned, and the caller decides whether to go on.
    pub fn dispatch(&mut self, event: InputEvent) -> GlyphGroupResult<Flow> {
        let result = match event {
            InputEvent::Key(key) => match Command::from_key(key) {
                Some(command) => self.run_command(command),
                None => Ok(Flow::Continue),
            },
            InputEvent::Pointer(pointer) => self.handle_pointer(pointer).map(|_| Flow::Continue),
        };
        match result {
            Err(err) if err.is_recoverable() => {
                trace_warn!("event_skipped", error = %err);
                Ok(Flow::Continue)
            }
            other => other,
        }
    }

    /// Executes a key command.
    pub fn run_command(&mut self, command: Command) -> GlyphGroupResult<Flow> {
        match command {
            Command::SetMode(mode) => self.controller.set_mode(mode),
            Command::Quit => return Ok(Flow::Quit),
            Command::Save => self.registry.save(&self.snapshot_path)?,
            Command::Load => self.registry.load(&self.snapshot_path)?,
            Command::ShowUngrouped => {
                self.registry.unselect_all();
                let count = self.registry.select_group(UNGROUPED);
                trace_event!("ungrouped_shown", count = count);
            }
            Command::AutoGroup => {
                let report = auto_group(&mut self.registry, &self.finder)?;
                trace_event!(
                    "auto_group_done",
                    groups = report.groups.len(),
                    grouped = report.regions_grouped,
                    garbage = report.garbage_skipped
                );
                self.last_report = Some(report);
            }
            Command::LowerThreshold => {
                let threshold = self.finder.threshold() - THRESHOLD_STEP;
                self.finder.set_threshold(threshold);
            }
            Command::RaiseThreshold => {
                let threshold = self.finder.threshold() + THRESHOLD_STEP;
                self.finder.set_threshold(threshold);
            }
        }
        Ok(Flow::Continue)
    }

    /// Routes a pointer event through the current mode.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> GlyphGroupResult<Effect> {
        let mut ctx = EditContext {
            registry: &mut self.registry,
            matches: &self.finder,
        };
        self.controller.handle_pointer(&mut ctx, event)
    }

    /// Draws the current registry state.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        render_registry(&self.registry, renderer);
    }
}
