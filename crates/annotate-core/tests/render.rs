// File: crates/annotate-core/tests/render.rs
// Purpose: Validate renderer geometry per tool, paint order, draft preview and skipping of indeterminate drawings.

use annotate_core::render::RenderStyle;
use annotate_core::{
    ChartViewport, CoordinateBridge, DomainPoint, DrawingStore, DrawingTool, GestureMachine, Pixel, PixelRect,
    Primitive, RecordingSurface, Renderer, Rgba, SurfaceSize, Theme, ToolKind,
};

/// x = time, y = price, with times past `max_time` unresolvable.
struct Linear {
    max_time: f64,
}

impl CoordinateBridge for Linear {
    fn time_to_x(&self, time: f64) -> Option<f32> { (time <= self.max_time).then_some(time as f32) }
    fn price_to_y(&self, price: f64) -> Option<f32> { Some(price as f32) }
    fn x_to_time(&self, x: f32) -> Option<f64> { Some(x as f64) }
    fn y_to_price(&self, y: f32) -> Option<f64> { Some(y as f64) }
}

const OPEN: Linear = Linear { max_time: f64::INFINITY };

fn p(t: f64, price: f64) -> DomainPoint {
    DomainPoint::new(t, price)
}

fn size() -> SurfaceSize {
    SurfaceSize::new(400.0, 300.0, 1.0)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn indeterminate_drawing_is_skipped_others_painted() {
    let mut store = DrawingStore::default();
    store.add_drawing(DrawingTool::Trendline, vec![p(10.0, 10.0), p(20.0, 20.0)]).unwrap();
    store.add_drawing(DrawingTool::Trendline, vec![p(500.0, 10.0), p(600.0, 20.0)]).unwrap();
    store.add_drawing(DrawingTool::Rectangle, vec![p(30.0, 30.0), p(60.0, 90.0)]).unwrap();

    let mut surface = RecordingSurface::new(400.0, 300.0);
    let stats = Renderer::default().paint(&mut surface, store.as_slice(), None, &Linear { max_time: 100.0 });

    assert_eq!(stats.painted, 2);
    assert_eq!(stats.skipped, 1);
    assert!(!stats.draft_painted);
    assert_eq!(surface.primitives().len(), 2);
    assert!(matches!(surface.primitives()[0], Primitive::Line { .. }));
    assert!(matches!(surface.primitives()[1], Primitive::Rect { .. }));
}

#[test]
fn half_resolved_two_point_drawing_is_skipped() {
    let mut store = DrawingStore::default();
    store.add_drawing(DrawingTool::Ray, vec![p(10.0, 10.0), p(200.0, 20.0)]).unwrap();
    let mut surface = RecordingSurface::new(400.0, 300.0);
    let stats = Renderer::default().paint(&mut surface, store.as_slice(), None, &Linear { max_time: 100.0 });
    assert_eq!(stats.skipped, 1);
    assert!(surface.primitives().is_empty());
}

#[test]
fn brush_drops_only_unresolved_points() {
    let mut store = DrawingStore::default();
    let stroke: Vec<_> = (0..10).map(|i| p(i as f64 * 20.0, 5.0)).collect();
    store.add_drawing(DrawingTool::Brush, stroke).unwrap();
    let mut surface = RecordingSurface::new(400.0, 300.0);
    Renderer::default().paint(&mut surface, store.as_slice(), None, &Linear { max_time: 100.0 });
    match &surface.primitives()[0] {
        Primitive::Polyline { points, .. } => assert_eq!(points.len(), 6),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn drawings_paint_in_insertion_order_with_draft_last() {
    let mut store = DrawingStore::default();
    store.add_drawing(DrawingTool::HorizontalLine, vec![p(1.0, 10.0)]).unwrap();
    store.add_drawing(DrawingTool::VerticalLine, vec![p(50.0, 1.0)]).unwrap();
    store.add_drawing(DrawingTool::Brush, vec![p(1.0, 1.0), p(2.0, 2.0), p(3.0, 1.0)]).unwrap();

    let mut g = GestureMachine::new(ToolKind::Trendline);
    g.pointer_down(p(5.0, 5.0));
    g.pointer_move(p(80.0, 40.0));

    let renderer = Renderer::default();
    let mut surface = RecordingSurface::new(400.0, 300.0);
    let stats = renderer.paint(&mut surface, store.as_slice(), g.draft(), &OPEN);

    assert_eq!(stats.painted, 3);
    assert!(stats.draft_painted);
    let prims = surface.primitives();
    assert_eq!(prims.len(), 4);
    let colors: Vec<Rgba> = store.iter().map(|d| d.color()).collect();
    assert_eq!(prims[0].stroke().color, colors[0]);
    assert_eq!(prims[1].stroke().color, colors[1]);
    assert_eq!(prims[2].stroke().color, colors[2]);
    assert_eq!(prims[3].stroke().color, Theme::dark().preview);
    assert_eq!(
        prims[3],
        Primitive::Line {
            from: Pixel::new(5.0, 5.0),
            to: Pixel::new(80.0, 40.0),
            stroke: prims[3].stroke().clone(),
        }
    );
}

#[test]
fn single_point_draft_is_not_painted() {
    let mut g = GestureMachine::new(ToolKind::Rectangle);
    g.pointer_down(p(5.0, 5.0));
    let mut surface = RecordingSurface::new(400.0, 300.0);
    let stats = Renderer::default().paint(&mut surface, &[], g.draft(), &OPEN);
    assert!(!stats.draft_painted);
    assert!(surface.primitives().is_empty());
}

#[test]
fn each_pass_clears_first() {
    let renderer = Renderer::default();
    let mut surface = RecordingSurface::new(400.0, 300.0);
    let mut store = DrawingStore::default();
    store.add_drawing(DrawingTool::Trendline, vec![p(1.0, 1.0), p(2.0, 2.0)]).unwrap();
    renderer.paint(&mut surface, store.as_slice(), None, &OPEN);
    renderer.paint(&mut surface, store.as_slice(), None, &OPEN);
    assert_eq!(surface.clear_count(), 2);
    assert_eq!(surface.primitives().len(), 1);
}

#[test]
fn trendline_is_a_solid_segment() {
    let r = Renderer::default();
    let c = Rgba::opaque(10, 20, 30);
    let prim = r.geometry(DrawingTool::Trendline, &[Pixel::new(1.0, 2.0), Pixel::new(3.0, 4.0)], c, size()).unwrap();
    match prim {
        Primitive::Line { from, to, stroke } => {
            assert_eq!(from, Pixel::new(1.0, 2.0));
            assert_eq!(to, Pixel::new(3.0, 4.0));
            assert_eq!(stroke.color, c);
            assert!(approx(stroke.width, 1.75));
            assert!(stroke.dash.is_none());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn ray_extends_through_second_point() {
    let r = Renderer::default();
    let c = Rgba::opaque(1, 1, 1);
    let start = Pixel::new(100.0, 100.0);
    let through = Pixel::new(130.0, 140.0);
    let prim = r.geometry(DrawingTool::Ray, &[start, through], c, size()).unwrap();
    let Primitive::Line { from, to, .. } = prim else { panic!("ray is a line") };
    assert_eq!(from, start);

    let (dx, dy) = (to.x - from.x, to.y - from.y);
    assert!(approx((dx * dx + dy * dy).sqrt(), 400.0 * 1.5));
    // same direction as start -> through (3:4)
    assert!(approx(dx / dy, 30.0 / 40.0));
    assert!(dx > 0.0 && dy > 0.0);
}

#[test]
fn guides_span_the_surface_dashed() {
    let r = Renderer::default();
    let c = Rgba::opaque(200, 0, 0);
    let at = Pixel::new(120.0, 75.0);

    let h = r.geometry(DrawingTool::HorizontalLine, &[at], c, size()).unwrap();
    let Primitive::Line { from, to, stroke } = h else { panic!("guide is a line") };
    assert_eq!(from, Pixel::new(0.0, 75.0));
    assert_eq!(to, Pixel::new(400.0, 75.0));
    assert_eq!(stroke.dash, Some(vec![6.0, 4.0]));

    let v = r.geometry(DrawingTool::VerticalLine, &[at], c, size()).unwrap();
    let Primitive::Line { from, to, stroke } = v else { panic!("guide is a line") };
    assert_eq!(from, Pixel::new(120.0, 0.0));
    assert_eq!(to, Pixel::new(120.0, 300.0));
    assert_eq!(stroke.dash, Some(vec![6.0, 4.0]));
}

#[test]
fn rectangle_is_normalized_and_filled() {
    let r = Renderer::default();
    let c = Rgba::opaque(0, 100, 200);
    let prim = r
        .geometry(DrawingTool::Rectangle, &[Pixel::new(90.0, 10.0), Pixel::new(30.0, 70.0)], c, size())
        .unwrap();
    let Primitive::Rect { rect, stroke, fill } = prim else { panic!("expected rect") };
    assert_eq!(rect, PixelRect { left: 30.0, top: 10.0, right: 90.0, bottom: 70.0 });
    assert_eq!((rect.width(), rect.height()), (60.0, 60.0));
    assert_eq!(stroke.color, c);
    let fill = fill.unwrap();
    assert_eq!((fill.r, fill.g, fill.b), (0, 100, 200));
    assert_eq!(fill.a, (255.0f32 * 0.08).round() as u8);
}

#[test]
fn brush_uses_wider_polyline() {
    let r = Renderer::default();
    let pts = [Pixel::new(0.0, 0.0), Pixel::new(1.0, 1.0), Pixel::new(2.0, 0.0)];
    let prim = r.geometry(DrawingTool::Brush, &pts, Rgba::opaque(5, 5, 5), size()).unwrap();
    let Primitive::Polyline { points, stroke } = prim else { panic!("expected polyline") };
    assert_eq!(points, pts.to_vec());
    assert!(approx(stroke.width, 2.0));
}

#[test]
fn too_few_pixels_yield_nothing() {
    let r = Renderer::default();
    for tool in DrawingTool::ALL {
        assert!(r.geometry(tool, &[], Rgba::opaque(0, 0, 0), size()).is_none(), "{tool}");
    }
    assert!(r.geometry(DrawingTool::Brush, &[Pixel::new(0.0, 0.0)], Rgba::opaque(0, 0, 0), size()).is_none());
}

#[test]
fn light_theme_changes_preview_and_fill() {
    let mut style = RenderStyle::default();
    style.theme = Theme::light();
    let r = Renderer::new(style);
    let c = Rgba::opaque(0, 0, 0);
    let Some(Primitive::Rect { fill: Some(fill), .. }) =
        r.geometry(DrawingTool::Rectangle, &[Pixel::new(0.0, 0.0), Pixel::new(5.0, 5.0)], c, size())
    else {
        panic!("expected filled rect")
    };
    assert_eq!(fill.a, (255.0f32 * 0.12).round() as u8);
}

#[test]
fn drawings_follow_the_viewport_after_pan() {
    let mut vp = ChartViewport::new(400.0, 300.0);
    vp.fit(0.0, 100.0, 0.0, 100.0);

    let mut store = DrawingStore::default();
    let a = p(25.0, 40.0);
    let b = p(75.0, 60.0);
    store.add_drawing(DrawingTool::Trendline, vec![a, b]).unwrap();

    let renderer = Renderer::default();
    let mut surface = RecordingSurface::new(400.0, 300.0);
    renderer.paint(&mut surface, store.as_slice(), None, &vp);
    let before = surface.primitives()[0].clone();

    vp.pan_by_pixels(-40.0, 0.0);
    renderer.paint(&mut surface, store.as_slice(), None, &vp);
    let after = surface.primitives()[0].clone();

    // stored domain points are untouched; pixels moved with the view
    assert_eq!(store.as_slice()[0].points(), &[a, b]);
    let (Primitive::Line { from: f0, .. }, Primitive::Line { from: f1, .. }) = (&before, &after) else {
        panic!("expected lines")
    };
    assert!(approx(f1.x, f0.x - 40.0));
    assert!(approx(f1.y, f0.y));
    assert_eq!(Some(*f1), vp.to_pixel(a));
}
