use eframe::egui::{Color32, Pos2, Rect, Vec2, vec2};

use crate::facility::Division;

use super::viewport::ZoomTransform;

pub(super) const BOUNDARY_STROKE: Color32 = Color32::from_rgb(128, 128, 128);
pub(super) const BOUNDARY_STROKE_WIDTH: f32 = 0.2;

pub(super) fn division_color(division: Division) -> Color32 {
    match division {
        Division::DivisionOffice => Color32::from_rgb(0, 128, 0),
        Division::SupplyChainCenter => Color32::from_rgb(0, 0, 255),
        Division::SharedServiceCenter => Color32::from_rgb(255, 0, 0),
        Division::Hospital => Color32::BLACK,
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn bounds_visible(rect: Rect, min: Pos2, max: Pos2) -> bool {
    !(max.x < rect.left() || min.x > rect.right() || max.y < rect.top() || min.y > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, transform: ZoomTransform, world: Vec2) -> Pos2 {
    rect.min + transform.apply(world)
}

pub(super) fn screen_to_local(rect: Rect, screen: Pos2) -> Vec2 {
    screen - rect.min
}

pub(super) fn to_vec2(point: [f32; 2]) -> Vec2 {
    vec2(point[0], point[1])
}
