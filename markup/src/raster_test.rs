use image::{Rgba, RgbaImage};

use super::*;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Color = Color::rgb(255, 0, 0);

fn blank(w: u32, h: u32) -> Canvas {
    Canvas::from_image(&RgbaImage::from_pixel(w, h, WHITE))
}

fn px(canvas: &Canvas, x: u32, y: u32) -> [u8; 4] {
    canvas.image().get_pixel(x, y).0
}

// --- Bounds ---

#[test]
fn bounds_normalize_negative_size() {
    let b = Bounds::from_origin_size(Point::new(10.0, 10.0), -4.0, -6.0);
    assert_eq!(b, Bounds { x0: 6.0, y0: 4.0, x1: 10.0, y1: 10.0 });
}

#[test]
fn zero_size_bounds_are_empty() {
    assert!(Bounds::from_origin_size(Point::new(3.0, 3.0), 0.0, 5.0).is_empty());
}

// --- Rectangles ---

#[test]
fn fill_rect_pixel_aligned_is_exact() {
    let mut c = blank(10, 10);
    c.fill_rect(Bounds::from_origin_size(Point::new(2.0, 2.0), 3.0, 3.0), RED);
    assert_eq!(px(&c, 2, 2), [255, 0, 0, 255]);
    assert_eq!(px(&c, 4, 4), [255, 0, 0, 255]);
    assert_eq!(px(&c, 5, 5), WHITE.0);
    assert_eq!(px(&c, 1, 2), WHITE.0);
}

#[test]
fn fill_rect_half_pixel_blends() {
    let mut c = blank(4, 4);
    c.fill_rect(Bounds { x0: 0.5, y0: 0.0, x1: 1.0, y1: 1.0 }, RED);
    assert_eq!(px(&c, 0, 0), [255, 128, 128, 255]);
}

#[test]
fn translucent_fill_over_white() {
    let mut c = blank(4, 4);
    c.fill_rect(Bounds::from_origin_size(Point::new(0.0, 0.0), 4.0, 4.0), Color::rgb(255, 255, 0).with_alpha(0x40));
    assert_eq!(px(&c, 1, 1), [255, 255, 191, 255]);
}

#[test]
fn fill_onto_transparent_takes_source_alpha() {
    let mut c = Canvas::from_image(&RgbaImage::new(2, 2));
    c.fill_rect(Bounds::from_origin_size(Point::new(0.0, 0.0), 2.0, 2.0), RED.with_alpha(0x40));
    assert_eq!(px(&c, 0, 0), [255, 0, 0, 0x40]);
}

#[test]
fn stroke_rect_leaves_interior() {
    let mut c = blank(40, 40);
    c.stroke_rect(Bounds::from_origin_size(Point::new(10.0, 10.0), 20.0, 20.0), 4.0, RED);
    // Edge band spans 8..12 on the left side.
    assert_eq!(px(&c, 9, 20), [255, 0, 0, 255]);
    assert_eq!(px(&c, 11, 20), [255, 0, 0, 255]);
    // Interior and exterior untouched.
    assert_eq!(px(&c, 20, 20), WHITE.0);
    assert_eq!(px(&c, 5, 20), WHITE.0);
}

// --- Circles ---

#[test]
fn stroke_circle_paints_ring_only() {
    let mut c = blank(60, 60);
    c.stroke_circle(Point::new(30.0, 30.0), 20.0, 4.0, RED);
    assert_eq!(px(&c, 30, 30), WHITE.0);
    // Pixel (49, 29) has center (49.5, 29.5), about 19.5 from the center.
    assert_eq!(px(&c, 49, 29), [255, 0, 0, 255]);
    assert_eq!(px(&c, 58, 30), WHITE.0);
}

#[test]
fn circle_partly_off_canvas_is_clipped() {
    let mut c = blank(10, 10);
    c.stroke_circle(Point::new(-50.0, -50.0), 55.0, 4.0, RED);
    c.stroke_circle(Point::new(500.0, 500.0), 5.0, 4.0, RED);
    assert_eq!(c.image().dimensions(), (10, 10));
}

// --- Lines and triangles ---

#[test]
fn horizontal_line_covers_its_band() {
    let mut c = blank(20, 20);
    c.stroke_line(Point::new(2.0, 10.0), Point::new(18.0, 10.0), 4.0, RED);
    assert_eq!(px(&c, 10, 9), [255, 0, 0, 255]);
    assert_eq!(px(&c, 10, 10), [255, 0, 0, 255]);
    assert_eq!(px(&c, 10, 14), WHITE.0);
    // Butt caps: nothing before the start point.
    assert_eq!(px(&c, 0, 10), WHITE.0);
}

#[test]
fn zero_length_line_is_noop() {
    let mut c = blank(10, 10);
    let before = c.image().clone();
    c.stroke_line(Point::new(5.0, 5.0), Point::new(5.0, 5.0), 4.0, RED);
    assert_eq!(c.image(), &before);
}

#[test]
fn triangle_covers_interior_either_winding() {
    for corners in [
        [Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(0.0, 20.0)],
        [Point::new(0.0, 0.0), Point::new(0.0, 20.0), Point::new(20.0, 0.0)],
    ] {
        let mut c = blank(20, 20);
        c.fill_triangle(corners, RED);
        assert_eq!(px(&c, 3, 3), [255, 0, 0, 255]);
        assert_eq!(px(&c, 17, 17), WHITE.0);
    }
}

#[test]
fn degenerate_triangle_is_noop() {
    let mut c = blank(10, 10);
    let before = c.image().clone();
    c.fill_triangle([Point::new(1.0, 1.0), Point::new(5.0, 5.0), Point::new(9.0, 9.0)], RED);
    assert_eq!(c.image(), &before);
}

// --- Masks ---

#[test]
fn mask_dilate_grows_outward() {
    let mut m = Mask::new(5, 5, 1, 1);
    m.accumulate(0, 0, 1.0);
    let d = m.dilate(1.5);
    assert_eq!((d.left(), d.top()), (3, 3));
    assert_eq!((d.width(), d.height()), (5, 5));
    assert!((d.get(2, 2) - 1.0).abs() < f32::EPSILON);
    assert!(d.get(3, 2) > 0.9);
    assert!(d.get(0, 0) < f32::EPSILON);
}

#[test]
fn fill_mask_clips_to_canvas() {
    let mut m = Mask::new(-1, -1, 3, 3);
    for y in 0..3 {
        for x in 0..3 {
            m.accumulate(x, y, 1.0);
        }
    }
    let mut c = blank(4, 4);
    c.fill_mask(&m, RED);
    assert_eq!(px(&c, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&c, 1, 1), [255, 0, 0, 255]);
    assert_eq!(px(&c, 2, 2), WHITE.0);
}

#[test]
fn blank_mask_reports_blank() {
    assert!(Mask::new(0, 0, 3, 3).is_blank());
}
