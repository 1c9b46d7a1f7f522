use glyphgroup::{
    point_in_rect, BoxFilter, BoxRect, BoxRegistry, GlyphGroupError, MinSize, UNGROUPED,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_rect(rng: &mut StdRng) -> BoxRect {
    BoxRect::new(
        rng.random_range(0..200),
        rng.random_range(0..200),
        rng.random_range(1..30),
        rng.random_range(1..30),
    )
}

fn temp_snapshot(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("glyphgroup-{}-{name}.json", std::process::id()))
}

#[test]
fn undersized_boxes_never_change_length() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut registry = BoxRegistry::new(MinSize::new(10, 12));
    for _ in 0..500 {
        let rect = random_rect(&mut rng);
        let before = registry.len();
        let added = registry.add(rect, UNGROUPED);
        if rect.width < 10 || rect.height < 12 {
            assert!(added.is_none());
            assert_eq!(registry.len(), before);
        } else {
            assert_eq!(registry.len(), before + 1);
        }
    }
}

#[test]
fn minimum_size_scenario() {
    let mut registry = BoxRegistry::new(MinSize::new(3, 3));
    registry.add(BoxRect::new(0, 0, 2, 2), UNGROUPED);
    assert_eq!(registry.len(), 0);
    registry.add(BoxRect::new(0, 0, 3, 3), UNGROUPED);
    assert_eq!(registry.len(), 1);
}

#[test]
fn containment_is_inclusive_on_every_edge() {
    let rect = BoxRect::new(4, 9, 6, 3);
    for (x, y) in [(4, 10), (10, 10), (7, 9), (7, 12), (4, 9), (10, 12)] {
        assert!(point_in_rect(x, y, &rect), "({x}, {y})");
    }
    for (x, y) in [(3, 10), (11, 10), (7, 8), (7, 13)] {
        assert!(!point_in_rect(x, y, &rect), "({x}, {y})");
    }
}

#[test]
fn point_lookup_prefers_lowest_index() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut registry = BoxRegistry::default();
    for _ in 0..60 {
        registry.add(random_rect(&mut rng), UNGROUPED);
    }
    for _ in 0..500 {
        let (x, y) = (rng.random_range(0..230), rng.random_range(0..230));
        let expected = registry
            .regions()
            .iter()
            .position(|r| point_in_rect(x, y, &r.rect()));
        assert_eq!(registry.index_at_point(x, y), expected);
    }
}

#[test]
fn identical_boxes_resolve_to_first() {
    let mut registry = BoxRegistry::default();
    registry.add(BoxRect::new(0, 0, 10, 10), UNGROUPED);
    registry.add(BoxRect::new(0, 0, 10, 10), UNGROUPED);
    assert_eq!(registry.index_at_point(5, 5), Some(0));
}

#[test]
fn max_group_tracks_largest_value_ever_set() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut registry = BoxRegistry::default();
    for _ in 0..8 {
        registry.add(random_rect(&mut rng), UNGROUPED);
    }
    let mut largest = 0;
    for _ in 0..200 {
        let value = rng.random_range(0..50);
        let before = registry.max_group();
        match rng.random_range(0..3) {
            0 => registry.set_group(value, None).unwrap(),
            1 => registry.set_group(value, Some(rng.random_range(0..8))).unwrap(),
            _ => registry.set_group_all(value),
        }
        largest = largest.max(value);
        assert!(registry.max_group() >= before);
        assert_eq!(registry.max_group(), largest);
    }
}

#[test]
fn select_group_touches_exactly_that_group() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut registry = BoxRegistry::default();
    for i in 0..40 {
        registry.add(random_rect(&mut rng), rng.random_range(0..4));
        if rng.random_bool(0.3) {
            registry.select_index(i).unwrap();
        }
    }
    let before: Vec<bool> = registry.regions().iter().map(|r| r.is_active()).collect();
    registry.select_group(2);
    for (region, was_active) in registry.regions().iter().zip(before) {
        if region.group() == 2 {
            assert!(region.is_active());
        } else {
            assert_eq!(region.is_active(), was_active);
        }
    }
}

#[test]
fn save_then_load_reproduces_registry() {
    let mut rng = StdRng::seed_from_u64(13);
    let mut registry = BoxRegistry::new(MinSize::new(2, 3));
    for _ in 0..25 {
        let group = rng.random_range(0..6);
        if registry.add(random_rect(&mut rng), group).is_some() && rng.random_bool(0.4) {
            registry.select_index(registry.len() - 1).unwrap();
        }
    }
    assert!(!registry.is_empty());

    let path = temp_snapshot("round-trip");
    registry.save(&path).unwrap();
    let mut restored = BoxRegistry::default();
    restored.load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(restored.min_size(), registry.min_size());
    assert_eq!(restored.len(), registry.len());
    for (a, b) in registry.regions().iter().zip(restored.regions()) {
        assert_eq!(a.rect(), b.rect());
        assert_eq!(a.is_active(), b.is_active());
        assert_eq!(a.group(), b.group());
    }
    assert_eq!(
        restored.boxes(BoxFilter::All).collect::<Vec<_>>(),
        registry.boxes(BoxFilter::All).collect::<Vec<_>>()
    );
}

#[test]
fn load_keeps_new_groups_clear_of_loaded_ids() {
    let mut source = BoxRegistry::default();
    source.add(BoxRect::new(0, 0, 5, 5), 9);
    let mut buf = Vec::new();
    source.write_snapshot(&mut buf).unwrap();

    let mut fresh = BoxRegistry::default();
    fresh.read_snapshot(buf.as_slice()).unwrap();
    assert_eq!(fresh.max_group(), 9);
    assert_eq!(fresh.next_group().unwrap(), 10);
}

#[test]
fn loading_a_missing_file_reports_io() {
    let mut registry = BoxRegistry::default();
    let err = registry.load(temp_snapshot("does-not-exist")).unwrap_err();
    assert!(matches!(err, GlyphGroupError::Io { .. }));
    assert!(!err.is_recoverable());
}
