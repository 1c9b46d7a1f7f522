//! Mode state machine turning pointer events into registry edits.

use crate::matcher::MatchSource;
use crate::mode::{DragState, Effect, Mode, PointerEvent, PointerKind};
use crate::region::{BoxRegistry, UNGROUPED};
use crate::trace::{trace_event, trace_warn};
use crate::util::GlyphGroupResult;

/// Everything a mode handler may touch.
pub struct EditContext<'a> {
    pub registry: &'a mut BoxRegistry,
    pub matches: &'a dyn MatchSource,
}

type PointerHandler =
    fn(&mut DragState, &mut EditContext<'_>, PointerEvent) -> GlyphGroupResult<Effect>;

struct ModeBinding {
    on_down: PointerHandler,
    on_up: Option<PointerHandler>,
}

/// Handlers indexed by [`Mode::slot`].
const BINDINGS: [ModeBinding; 7] = [
    ModeBinding {
        on_down: on_match,
        on_up: None,
    },
    ModeBinding {
        on_down: on_delete,
        on_up: None,
    },
    ModeBinding {
        on_down: on_add_press,
        on_up: Some(on_add_release),
    },
    ModeBinding {
        on_down: on_select,
        on_up: None,
    },
    ModeBinding {
        on_down: on_group,
        on_up: None,
    },
    ModeBinding {
        on_down: on_ungroup,
        on_up: None,
    },
    ModeBinding {
        on_down: on_new,
        on_up: None,
    },
];

/// Holds the current mode and the in-flight ADD drag.
#[derive(Clone, Debug, Default)]
pub struct ModeController {
    mode: Mode,
    drag: DragState,
}

impl ModeController {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            drag: DragState::Idle,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches mode. An unfinished drag is kept; only a release ends it.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            trace_event!("mode_changed", key = mode.key() as u32);
        }
        self.mode = mode;
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    /// Dispatches one pointer event to the current mode's handler.
    ///
    /// Lookup misses come back as `RegionNotFound` with the registry left
    /// untouched.
    pub fn handle_pointer(
        &mut self,
        ctx: &mut EditContext<'_>,
        event: PointerEvent,
    ) -> GlyphGroupResult<Effect> {
        let binding = &BINDINGS[self.mode.slot()];
        let handler = match event.kind {
            PointerKind::Down => Some(binding.on_down),
            PointerKind::Up => binding.on_up,
        };
        match handler {
            Some(handler) => handler(&mut self.drag, ctx, event),
            None => Ok(Effect::Ignored),
        }
    }
}

fn on_match(
    _drag: &mut DragState,
    ctx: &mut EditContext<'_>,
    event: PointerEvent,
) -> GlyphGroupResult<Effect> {
    let registry = &mut *ctx.registry;
    let seed = registry.find_index(event.x, event.y)?;
    let points = ctx.matches.find_matches(&registry.box_at(seed)?)?;

    registry.unselect_all();
    for point in &points {
        if let Some(index) = registry.index_at_point(point.x, point.y) {
            registry.select_index(index)?;
        }
    }
    let active = registry.regions().iter().filter(|r| r.is_active()).count();
    trace_event!("match_highlighted", seed = seed, points = points.len(), active = active);
    Ok(Effect::Matched { seed, active })
}

fn on_delete(
    _drag: &mut DragState,
    ctx: &mut EditContext<'_>,
    event: PointerEvent,
) -> GlyphGroupResult<Effect> {
    let index = ctx.registry.find_index(event.x, event.y)?;
    let removed = ctx.registry.remove(index)?;
    Ok(Effect::Removed(removed.id()))
}

fn on_add_press(
    drag: &mut DragState,
    _ctx: &mut EditContext<'_>,
    event: PointerEvent,
) -> GlyphGroupResult<Effect> {
    drag.begin(event.point());
    Ok(Effect::DragStarted(event.point()))
}

fn on_add_release(
    drag: &mut DragState,
    ctx: &mut EditContext<'_>,
    event: PointerEvent,
) -> GlyphGroupResult<Effect> {
    match drag.finish(event.point()) {
        Some(rect) => Ok(Effect::Added(ctx.registry.add(rect, UNGROUPED))),
        None => Ok(Effect::Ignored),
    }
}

fn on_select(
    _drag: &mut DragState,
    ctx: &mut EditContext<'_>,
    event: PointerEvent,
) -> GlyphGroupResult<Effect> {
    let registry = &mut *ctx.registry;
    let index = registry.find_index(event.x, event.y)?;
    registry.unselect_all();
    let group = registry.group_of(index)?;
    if group == UNGROUPED {
        return Ok(Effect::Selected { group, count: 0 });
    }
    let count = registry.select_group(group);
    Ok(Effect::Selected { group, count })
}

fn on_group(
    _drag: &mut DragState,
    ctx: &mut EditContext<'_>,
    event: PointerEvent,
) -> GlyphGroupResult<Effect> {
    let registry = &mut *ctx.registry;
    let group = registry.selected_group();
    let index = registry.find_index(event.x, event.y)?;
    if group == UNGROUPED {
        trace_warn!("group_without_selection", index = index);
        return Ok(Effect::Ignored);
    }
    registry.set_group(group, Some(index))?;
    registry.select_index(index)?;
    Ok(Effect::Grouped { index, group })
}

fn on_ungroup(
    _drag: &mut DragState,
    ctx: &mut EditContext<'_>,
    event: PointerEvent,
) -> GlyphGroupResult<Effect> {
    let registry = &mut *ctx.registry;
    let group = registry.selected_group();
    let index = registry.find_index(event.x, event.y)?;
    if registry.group_of(index)? != group {
        return Ok(Effect::Ignored);
    }
    registry.set_group(UNGROUPED, Some(index))?;
    registry.unselect_index(index)?;
    Ok(Effect::Ungrouped { index })
}

fn on_new(
    _drag: &mut DragState,
    ctx: &mut EditContext<'_>,
    event: PointerEvent,
) -> GlyphGroupResult<Effect> {
    let registry = &mut *ctx.registry;
    let index = registry.find_index(event.x, event.y)?;
    if registry.group_of(index)? != UNGROUPED {
        return Ok(Effect::Ignored);
    }
    let group = registry.next_group()?;
    registry.set_group(group, Some(index))?;
    registry.unselect_all();
    registry.select_index(index)?;
    trace_event!("group_minted", index = index, group = group);
    Ok(Effect::NewGroup { index, group })
}

#[cfg(test)]
mod tests {
    use super::{EditContext, ModeController};
    use crate::matcher::MatchSource;
    use crate::mode::{DragState, Effect, Mode, PointerEvent};
    use crate::region::{BoxFilter, BoxRect, BoxRegistry, MinSize, Point, UNGROUPED};
    use crate::util::{GlyphGroupError, GlyphGroupResult};

    struct Canned(Vec<Point>);

    impl MatchSource for Canned {
        fn find_matches(&self, _seed: &BoxRect) -> GlyphGroupResult<Vec<Point>> {
            Ok(self.0.clone())
        }
    }

    fn row_of_boxes(n: i32) -> BoxRegistry {
        let mut registry = BoxRegistry::default();
        for i in 0..n {
            registry.add(BoxRect::new(i * 20, 0, 10, 10), UNGROUPED).unwrap();
        }
        registry
    }

    fn click(
        controller: &mut ModeController,
        registry: &mut BoxRegistry,
        matches: &dyn MatchSource,
        x: i32,
        y: i32,
    ) -> GlyphGroupResult<Effect> {
        let mut ctx = EditContext { registry, matches };
        controller.handle_pointer(&mut ctx, PointerEvent::down(x, y))
    }

    fn active(registry: &BoxRegistry) -> Vec<bool> {
        registry.regions().iter().map(|r| r.is_active()).collect()
    }

    #[test]
    fn group_mode_joins_selected_group() {
        let mut registry = row_of_boxes(3);
        registry.set_group(7, Some(0)).unwrap();
        registry.select_index(0).unwrap();
        let mut controller = ModeController::new(Mode::Group);
        let effect = click(&mut controller, &mut registry, &Canned(vec![]), 45, 5).unwrap();
        assert_eq!(effect, Effect::Grouped { index: 2, group: 7 });
        assert_eq!(registry.group_of(2).unwrap(), 7);
        assert!(registry.get(2).unwrap().is_active());
    }

    #[test]
    fn group_mode_without_selection_is_ignored() {
        let mut registry = row_of_boxes(2);
        let mut controller = ModeController::new(Mode::Group);
        let effect = click(&mut controller, &mut registry, &Canned(vec![]), 5, 5).unwrap();
        assert_eq!(effect, Effect::Ignored);
        assert_eq!(registry.group_of(0).unwrap(), UNGROUPED);
    }

    #[test]
    fn ungroup_mode_only_touches_selected_group() {
        let mut registry = row_of_boxes(3);
        registry.set_group(2, Some(0)).unwrap();
        registry.set_group(2, Some(1)).unwrap();
        registry.set_group(3, Some(2)).unwrap();
        registry.select_group(2);
        let mut controller = ModeController::new(Mode::Ungroup);
        let canned = Canned(vec![]);

        let effect = click(&mut controller, &mut registry, &canned, 45, 5).unwrap();
        assert_eq!(effect, Effect::Ignored);
        assert_eq!(registry.group_of(2).unwrap(), 3);

        let effect = click(&mut controller, &mut registry, &canned, 25, 5).unwrap();
        assert_eq!(effect, Effect::Ungrouped { index: 1 });
        assert_eq!(registry.group_of(1).unwrap(), UNGROUPED);
        assert_eq!(active(&registry), vec![true, false, false]);
    }

    #[test]
    fn new_mode_mints_next_group() {
        let mut registry = row_of_boxes(3);
        registry.set_group(4, Some(0)).unwrap();
        registry.select_index(0).unwrap();
        let mut controller = ModeController::new(Mode::New);
        let canned = Canned(vec![]);

        let effect = click(&mut controller, &mut registry, &canned, 25, 5).unwrap();
        assert_eq!(effect, Effect::NewGroup { index: 1, group: 5 });
        assert_eq!(registry.max_group(), 5);
        assert_eq!(active(&registry), vec![false, true, false]);

        let effect = click(&mut controller, &mut registry, &canned, 5, 5).unwrap();
        assert_eq!(effect, Effect::Ignored);
    }

    #[test]
    fn select_mode_highlights_whole_group() {
        let mut registry = row_of_boxes(4);
        registry.set_group(1, Some(0)).unwrap();
        registry.set_group(1, Some(3)).unwrap();
        registry.select_index(1).unwrap();
        let mut controller = ModeController::new(Mode::Select);
        let canned = Canned(vec![]);

        let effect = click(&mut controller, &mut registry, &canned, 65, 5).unwrap();
        assert_eq!(effect, Effect::Selected { group: 1, count: 2 });
        assert_eq!(active(&registry), vec![true, false, false, true]);

        let effect = click(&mut controller, &mut registry, &canned, 25, 5).unwrap();
        assert_eq!(effect, Effect::Selected { group: 0, count: 0 });
        assert_eq!(active(&registry), vec![false; 4]);
    }

    #[test]
    fn delete_mode_removes_and_misses_are_errors() {
        let mut registry = row_of_boxes(2);
        let second = registry.regions()[1].id();
        let mut controller = ModeController::new(Mode::Delete);
        let canned = Canned(vec![]);

        let effect = click(&mut controller, &mut registry, &canned, 25, 5).unwrap();
        assert_eq!(effect, Effect::Removed(second));
        assert_eq!(registry.len(), 1);

        let err = click(&mut controller, &mut registry, &canned, 500, 5).unwrap_err();
        assert_eq!(err, GlyphGroupError::RegionNotFound { x: 500, y: 5 });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn match_mode_highlights_regions_under_match_points() {
        let mut registry = row_of_boxes(4);
        registry.select_index(1).unwrap();
        let canned = Canned(vec![Point::new(5, 5), Point::new(65, 5), Point::new(300, 300)]);
        let mut controller = ModeController::new(Mode::Match);

        let effect = click(&mut controller, &mut registry, &canned, 5, 5).unwrap();
        assert_eq!(effect, Effect::Matched { seed: 0, active: 2 });
        assert_eq!(active(&registry), vec![true, false, false, true]);
    }

    #[test]
    fn add_mode_spans_press_and_release() {
        let mut registry = BoxRegistry::new(MinSize::new(3, 3));
        let mut controller = ModeController::new(Mode::Add);
        let canned = Canned(vec![]);
        let mut ctx = EditContext {
            registry: &mut registry,
            matches: &canned,
        };

        assert_eq!(
            controller.handle_pointer(&mut ctx, PointerEvent::up(1, 1)).unwrap(),
            Effect::Ignored
        );
        controller.handle_pointer(&mut ctx, PointerEvent::down(40, 30)).unwrap();
        assert_eq!(
            controller.drag(),
            DragState::Dragging {
                start: Point::new(40, 30)
            }
        );
        let effect = controller.handle_pointer(&mut ctx, PointerEvent::up(10, 20)).unwrap();
        assert!(matches!(effect, Effect::Added(Some(_))));
        assert_eq!(controller.drag(), DragState::Idle);

        controller.handle_pointer(&mut ctx, PointerEvent::down(0, 0)).unwrap();
        let effect = controller.handle_pointer(&mut ctx, PointerEvent::up(2, 2)).unwrap();
        assert_eq!(effect, Effect::Added(None));
        let boxes: Vec<BoxRect> = registry.boxes(BoxFilter::All).collect();
        assert_eq!(boxes, vec![BoxRect::new(10, 20, 30, 10)]);
    }

    #[test]
    fn release_is_ignored_outside_add_mode() {
        let mut registry = row_of_boxes(1);
        let mut controller = ModeController::new(Mode::Delete);
        let canned = Canned(vec![]);
        let mut ctx = EditContext {
            registry: &mut registry,
            matches: &canned,
        };
        let effect = controller.handle_pointer(&mut ctx, PointerEvent::up(5, 5)).unwrap();
        assert_eq!(effect, Effect::Ignored);
        assert_eq!(registry.len(), 1);
    }
}
