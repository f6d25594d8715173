use super::*;

#[test]
fn rect_edges_and_shrink() {
    let r = Rect::new(12.0, 340.0, 80.0, 60.0);
    assert_eq!(r.x2(), 92.0);
    assert_eq!(r.y2(), 400.0);
    assert_eq!(r.middle_x(), 52.0);
    assert_eq!(r.middle_y(), 370.0);
    assert_eq!(r.position(), (12.0, 340.0));
    assert_eq!(r.size(), (80.0, 60.0));

    let r2 = r.shrink(2.0, 0.0, 20.0, 5.0);
    assert_eq!(r2, Rect::new(14.0, 360.0, 78.0, 35.0));
    assert_ne!(r, r2);
}

#[test]
fn size_request_ensure_and_resize_keep_fill() {
    let rq = SizeRequest::with_fill(10.0, 20.0, true, false);
    let grown = rq.ensure(30.0, 5.0);
    assert_eq!(grown, SizeRequest::with_fill(30.0, 20.0, true, false));
    let padded = grown.resize(20.0, 35.0);
    assert_eq!(padded, SizeRequest::with_fill(50.0, 55.0, true, false));
}

#[test]
fn merge_size_requests_is_elementwise_max() {
    let merged = merge_size_requests(&[
        SizeRequest::with_fill(100.0, 10.0, false, false),
        SizeRequest::with_fill(20.0, 50.0, true, false),
    ]);
    assert_eq!(merged, SizeRequest::with_fill(100.0, 50.0, true, false));
    assert_eq!(merge_size_requests(&[]), SizeRequest::default());
}

#[test]
fn unbounded_show_range_is_visible_from_start() {
    for start in 1..6 {
        let range = ShowRange::from_step(start).unwrap();
        for step in 1..12 {
            assert_eq!(range.contains(step), step >= start, "start={start} step={step}");
        }
    }
}

#[test]
fn bounded_show_range_is_inclusive() {
    let range = (2..=4u32).into_show_range().unwrap();
    assert!(!range.contains(1));
    assert!(range.contains(2));
    assert!(range.contains(4));
    assert!(!range.contains(5));
    assert_eq!(range.last_step(), 4);
    assert_eq!((3u32..).into_show_range().unwrap().last_step(), 3);
}

#[test]
fn invalid_show_ranges_are_construction_errors() {
    assert!(matches!(
        ShowRange::new(0, None),
        Err(DeckError::Construction(_))
    ));
    assert!(matches!(
        (5u32, 2u32).into_show_range(),
        Err(DeckError::Construction(_))
    ));
    assert_eq!(ShowRange::default(), ShowRange::from_step(1).unwrap());
}
