//! Automatic grouping pass.
//!
//! Every ungrouped region, in index order, serves once as a seed: its matches
//! are resolved to regions and the seed plus all resolved regions receive a
//! freshly minted group. Regions grouped by an earlier seed are never used as
//! seeds again, so the outcome depends on insertion order.

use crate::matcher::MatchSource;
use crate::region::{BoxRegistry, GroupId, UNGROUPED};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::GlyphGroupResult;

/// Summary of one grouping pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupReport {
    /// Groups minted, in order.
    pub groups: Vec<GroupId>,
    /// Regions that received a group (seeds included).
    pub regions_grouped: usize,
    /// Seeds skipped because they matched more places than there are regions.
    pub garbage_skipped: usize,
    /// Seeds skipped because no usable template could be cut from them.
    pub template_skipped: usize,
}

/// Runs the grouping pass over `registry`.
///
/// A seed whose match count exceeds the number of regions is treated as a
/// degenerate template and left ungrouped. Match points that fall in no region
/// are ignored; points resolve to the earliest region containing them.
pub fn auto_group<M>(registry: &mut BoxRegistry, matches: &M) -> GlyphGroupResult<GroupReport>
where
    M: MatchSource + ?Sized,
{
    let _span = trace_span!("auto_group", regions = registry.len()).entered();
    let mut report = GroupReport::default();

    for seed in 0..registry.len() {
        if registry.group_of(seed)? != UNGROUPED {
            continue;
        }

        let rect = registry.box_at(seed)?;
        let points = match matches.find_matches(&rect) {
            Ok(points) => points,
            Err(err) if err.is_recoverable() => {
                trace_warn!("seed_template_unusable", seed = seed);
                report.template_skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        if points.len() > registry.len() {
            trace_warn!(
                "garbage_match_rejected",
                seed = seed,
                points = points.len(),
                regions = registry.len()
            );
            report.garbage_skipped += 1;
            continue;
        }

        let group = registry.next_group()?;
        registry.set_group(group, Some(seed))?;
        let mut members = vec![seed];
        for point in &points {
            if let Some(index) = registry.index_at_point(point.x, point.y) {
                registry.set_group(group, Some(index))?;
                if !members.contains(&index) {
                    members.push(index);
                }
            }
        }
        trace_event!("group_formed", group = group, seed = seed, members = members.len());
        report.regions_grouped += members.len();
        report.groups.push(group);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{auto_group, GroupReport};
    use crate::matcher::MatchSource;
    use crate::region::{BoxRect, BoxRegistry, Point, UNGROUPED};
    use crate::util::{GlyphGroupError, GlyphGroupResult};
    use std::collections::HashMap;

    /// Returns canned points keyed by seed position.
    struct Table(HashMap<(i32, i32), GlyphGroupResult<Vec<Point>>>);

    impl MatchSource for Table {
        fn find_matches(&self, seed: &BoxRect) -> GlyphGroupResult<Vec<Point>> {
            self.0
                .get(&(seed.x, seed.y))
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn ten_regions() -> BoxRegistry {
        let mut registry = BoxRegistry::default();
        for i in 0..10 {
            registry.add(BoxRect::new(i * 20, 0, 10, 10), UNGROUPED).unwrap();
        }
        registry
    }

    #[test]
    fn seed_and_matches_share_new_group() {
        let mut registry = ten_regions();
        registry.set_group(3, None).unwrap();
        let table = Table(HashMap::from([(
            (0, 0),
            Ok(vec![Point::new(45, 5), Point::new(85, 5)]),
        )]));

        let report = auto_group(&mut registry, &table).unwrap();
        assert_eq!(registry.group_of(0).unwrap(), 4);
        assert_eq!(registry.group_of(2).unwrap(), 4);
        assert_eq!(registry.group_of(4).unwrap(), 4);
        assert_eq!(report.groups[0], 4);
        // every other region became its own singleton group
        assert_eq!(report.groups.len(), 8);
        assert!(registry.regions().iter().all(|r| r.group() != UNGROUPED));
    }

    #[test]
    fn garbage_matches_leave_seed_ungrouped() {
        let mut registry = ten_regions();
        let flood: Vec<Point> = (0..11).map(|i| Point::new(i, 0)).collect();
        let table = Table(HashMap::from([((0, 0), Ok(flood))]));
        let report = auto_group(&mut registry, &table).unwrap();
        assert_eq!(registry.group_of(0).unwrap(), UNGROUPED);
        assert_eq!(report.garbage_skipped, 1);
        assert_eq!(report.groups.len(), 9);
    }

    #[test]
    fn grouped_regions_are_not_reseeded() {
        let mut registry = ten_regions();
        registry.set_group(1, Some(1)).unwrap();
        let table = Table(HashMap::from([
            ((0, 0), Ok(vec![Point::new(45, 5)])),
            ((20, 0), Ok(vec![Point::new(65, 5)])),
        ]));
        auto_group(&mut registry, &table).unwrap();
        assert_eq!(registry.group_of(1).unwrap(), 1);
        assert_eq!(registry.group_of(3).unwrap(), 3);
        assert_eq!(registry.group_of(0).unwrap(), registry.group_of(2).unwrap());
    }

    #[test]
    fn unusable_templates_are_skipped() {
        let mut registry = ten_regions();
        let table = Table(HashMap::from([(
            (0, 0),
            Err(GlyphGroupError::DegenerateTemplate {
                reason: "zero variance",
            }),
        )]));
        let report = auto_group(&mut registry, &table).unwrap();
        assert_eq!(registry.group_of(0).unwrap(), UNGROUPED);
        assert_eq!(report.template_skipped, 1);
    }

    #[test]
    fn exhausted_group_ids_stop_the_pass() {
        let mut registry = ten_regions();
        registry.set_group(u32::MAX, Some(9)).unwrap();
        let table = Table(HashMap::new());
        let err = auto_group(&mut registry, &table).unwrap_err();
        assert_eq!(err, GlyphGroupError::GroupIdsExhausted { max_group: u32::MAX });
        assert_eq!(registry.group_of(0).unwrap(), UNGROUPED);
    }

    #[test]
    fn empty_registry_produces_empty_report() {
        let mut registry = BoxRegistry::default();
        let table = Table(HashMap::new());
        assert_eq!(auto_group(&mut registry, &table).unwrap(), GroupReport::default());
    }
}
