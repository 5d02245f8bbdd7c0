use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, pos2, vec2,
};

use super::super::edges::EdgeKind;
use super::super::{ViewModel, WriteOp};
use super::CARD_SIZE;

const CANVAS_FILL: Color32 = Color32::from_rgb(21, 24, 30);
const GRID_LINE: Color32 = Color32::from_rgba_premultiplied(16, 18, 21, 70);
const CARD_FILL: Color32 = Color32::from_rgb(44, 52, 64);
const CARD_FILL_HOVERED: Color32 = Color32::from_rgb(56, 66, 80);
const CARD_BORDER: Color32 = Color32::from_rgb(18, 20, 24);
const SELECTED_ACCENT: Color32 = Color32::from_rgb(245, 206, 93);
const CONNECT_ACCENT: Color32 = Color32::from_rgb(241, 146, 94);
const CHILD_EDGE: Color32 = Color32::from_rgb(108, 118, 132);
const SPOUSE_EDGE: Color32 = Color32::from_rgb(186, 140, 178);

fn draw_background(painter: &Painter, rect: Rect, pan: eframe::egui::Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, CANVAS_FILL);

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [pos2(x, rect.top()), pos2(x, rect.bottom())],
            Stroke::new(1.0, GRID_LINE),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [pos2(rect.left(), y), pos2(rect.right(), y)],
            Stroke::new(1.0, GRID_LINE),
        );
        y += step;
    }
}

fn elbow(painter: &Painter, start: Pos2, end: Pos2, stroke: Stroke) {
    let mid_y = (start.y + end.y) * 0.5;
    painter.line_segment([start, pos2(start.x, mid_y)], stroke);
    painter.line_segment([pos2(start.x, mid_y), pos2(end.x, mid_y)], stroke);
    painter.line_segment([pos2(end.x, mid_y), end], stroke);
}

impl ViewModel {
    pub(in crate::app) fn draw_tree(&mut self, ui: &mut Ui, ops: &mut Vec<WriteOp>) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.camera.pan, self.camera.zoom);

        self.handle_zoom(ui, rect, &response);
        self.handle_pointer(ui, rect, &response, ops);

        let dt = ui
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        if let Some(delta) = self.inertia.step(dt) {
            self.camera.pan += delta;
        }
        if response.dragged() || self.inertia.is_coasting() {
            ui.ctx().request_repaint();
        }

        if self.tree.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No members yet. Click anywhere to add the first one.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
        }

        let zoom = self.camera.zoom;
        let edge_stroke_width = (1.4 * zoom.sqrt()).clamp(0.8, 2.6);

        for edge in &self.edges {
            let (Some(&from), Some(&to)) = (
                self.card_index.get(&edge.from),
                self.card_index.get(&edge.to),
            ) else {
                continue;
            };
            let from_pos = self.cards[from].world_pos;
            let to_pos = self.cards[to].world_pos;

            let touches_selection = self
                .selected
                .as_deref()
                .is_some_and(|id| id == edge.from || id == edge.to);

            match edge.kind {
                EdgeKind::ParentChild => {
                    let start = self
                        .camera
                        .world_to_screen(rect, from_pos + vec2(0.0, CARD_SIZE.y * 0.5));
                    let end = self
                        .camera
                        .world_to_screen(rect, to_pos - vec2(0.0, CARD_SIZE.y * 0.5));
                    if !edge_on_screen(rect, start, end) {
                        continue;
                    }
                    let color = if touches_selection {
                        SELECTED_ACCENT
                    } else {
                        CHILD_EDGE
                    };
                    elbow(&painter, start, end, Stroke::new(edge_stroke_width, color));
                }
                EdgeKind::Spouse => {
                    let (left, right) = if from_pos.x <= to_pos.x {
                        (from_pos, to_pos)
                    } else {
                        (to_pos, from_pos)
                    };
                    let start = self
                        .camera
                        .world_to_screen(rect, left + vec2(CARD_SIZE.x * 0.5, 0.0));
                    let end = self
                        .camera
                        .world_to_screen(rect, right - vec2(CARD_SIZE.x * 0.5, 0.0));
                    if !edge_on_screen(rect, start, end) {
                        continue;
                    }
                    let color = if touches_selection {
                        SELECTED_ACCENT
                    } else {
                        SPOUSE_EDGE
                    };
                    painter.extend(egui::Shape::dashed_line(
                        &[start, end],
                        Stroke::new(edge_stroke_width, color),
                        8.0,
                        5.0,
                    ));
                }
            }
        }

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|_| response.hovered())
            .and_then(|pointer| self.hit_test(rect, pointer));

        let name_font = FontId::proportional((13.0 * zoom).clamp(9.0, 22.0));
        let relation_font = FontId::proportional((10.5 * zoom).clamp(7.5, 18.0));

        for (index, card) in self.cards.iter().enumerate() {
            let screen_rect = self.card_screen_rect(rect, card);
            if !rect.intersects(screen_rect) {
                continue;
            }

            let is_selected = self.selected.as_deref() == Some(card.id.as_str());
            let is_connect_source = self.connect.source() == Some(card.id.as_str());
            let is_hovered = hovered == Some(index);

            let fill = if is_hovered {
                CARD_FILL_HOVERED
            } else {
                CARD_FILL
            };
            painter.rect_filled(screen_rect, 6.0, fill);

            let (border, border_width) = if is_connect_source {
                (CONNECT_ACCENT, 2.2)
            } else if is_selected {
                (SELECTED_ACCENT, 2.0)
            } else {
                (CARD_BORDER, 1.0)
            };
            painter.rect_stroke(
                screen_rect,
                6.0,
                Stroke::new(border_width, border),
                StrokeKind::Inside,
            );

            if let Some(member) = self.tree.get(&card.id) {
                painter.text(
                    screen_rect.center() - vec2(0.0, screen_rect.height() * 0.16),
                    Align2::CENTER_CENTER,
                    &member.name,
                    name_font.clone(),
                    Color32::from_gray(235),
                );

                let relation = if member.relation.is_empty() {
                    member.relation_kind.label()
                } else {
                    member.relation.as_str()
                };
                painter.text(
                    screen_rect.center() + vec2(0.0, screen_rect.height() * 0.22),
                    Align2::CENTER_CENTER,
                    relation,
                    relation_font.clone(),
                    Color32::from_gray(165),
                );
            }
        }

        if self.member_drag.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if self.connect.is_awaiting() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Crosshair);
        } else if hovered.is_some() {
            let icon = match self.layout_mode {
                crate::layout::LayoutMode::Freestyle => egui::CursorIcon::Grab,
                crate::layout::LayoutMode::Auto => egui::CursorIcon::PointingHand,
            };
            ui.output_mut(|output| output.cursor_icon = icon);
        }

        if let Some(kind) = self.connect.pending_kind() {
            let source_name = self
                .connect
                .source()
                .and_then(|id| self.tree.get(id))
                .map(|member| member.name.as_str())
                .unwrap_or("?");
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "Connect {}: click the target card, or the source/canvas to cancel ({source_name})",
                    kind.verb()
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}

fn edge_on_screen(rect: Rect, start: Pos2, end: Pos2) -> bool {
    let min_x = start.x.min(end.x) - 4.0;
    let max_x = start.x.max(end.x) + 4.0;
    let min_y = start.y.min(end.y) - 4.0;
    let max_y = start.y.max(end.y) + 4.0;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}
