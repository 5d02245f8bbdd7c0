use eframe::egui::{Pos2, Rect, Response, Ui, Vec2, vec2};

use crate::family::Position;
use crate::layout::LayoutMode;

use super::super::camera::Camera;
use super::super::{Card, MemberDrag, ViewModel, WriteOp};
use super::CARD_SIZE;

/// World position of a dragged card: invert the view transform at the
/// pointer (minus the grab offset captured on press) and clamp to the
/// non-negative quadrant, which is what gets persisted.
pub(in crate::app) fn drag_world_position(
    camera: &Camera,
    rect: Rect,
    pointer: Pos2,
    grab_offset: Vec2,
) -> Vec2 {
    let world = camera.screen_to_world(rect, pointer - grab_offset);
    vec2(world.x.max(0.0), world.y.max(0.0))
}

impl ViewModel {
    pub(in crate::app) fn card_screen_rect(&self, rect: Rect, card: &Card) -> Rect {
        Rect::from_center_size(
            self.camera.world_to_screen(rect, card.world_pos),
            CARD_SIZE * self.camera.zoom,
        )
    }

    /// Topmost card under the pointer, if any.
    pub(in crate::app) fn hit_test(&self, rect: Rect, pointer: Pos2) -> Option<usize> {
        self.cards
            .iter()
            .enumerate()
            .rev()
            .find(|(_, card)| self.card_screen_rect(rect, card).contains(pointer))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        self.camera.zoom_at(rect, pointer, scroll);
    }

    pub(in crate::app) fn handle_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &Response,
        ops: &mut Vec<WriteOp>,
    ) {
        let dt = ui
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);

        if response.drag_started() {
            self.inertia.cancel();
            if let Some(pointer) = response.interact_pointer_pos() {
                match self.hit_test(rect, pointer) {
                    // Cards move only in Freestyle; under Auto layout a drag
                    // anywhere pans the canvas.
                    Some(index) if self.layout_mode == LayoutMode::Freestyle => {
                        let card = &self.cards[index];
                        let grab_offset = pointer - self.card_screen_rect(rect, card).center();
                        self.member_drag = Some(MemberDrag {
                            id: card.id.clone(),
                            grab_offset,
                        });
                    }
                    _ => self.panning = true,
                }
            }
        }

        if response.dragged() {
            if let Some(drag) = &self.member_drag {
                if let Some(pointer) = response.interact_pointer_pos() {
                    let world =
                        drag_world_position(&self.camera, rect, pointer, drag.grab_offset);
                    let id = drag.id.clone();
                    if let Some(&index) = self.card_index.get(&id) {
                        self.cards[index].world_pos = world;
                    }
                }
            } else if self.panning {
                let delta = response.drag_delta();
                self.camera.pan += delta;
                self.inertia.sample(delta, dt);
            }
        }

        if response.drag_stopped() {
            if let Some(drag) = self.member_drag.take() {
                if let Some(&index) = self.card_index.get(&drag.id) {
                    let world = self.cards[index].world_pos;
                    ops.push(self.persist_position_op(
                        &drag.id,
                        Position {
                            x: world.x,
                            y: world.y,
                        },
                    ));
                }
            } else if self.panning {
                self.panning = false;
                self.inertia.release();
            }
        }

        // A plain click; drag releases never reach this branch.
        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let hit = self
                .hit_test(rect, pointer)
                .map(|index| self.cards[index].id.clone());

            if self.connect.is_awaiting() {
                match hit {
                    Some(id) => {
                        if let Some(request) = self.connect.member_clicked(&id)
                            && let Some(op) = self.link_op(&request)
                        {
                            ops.push(op);
                        }
                    }
                    None => self.connect.cancel(),
                }
            } else {
                match hit {
                    Some(id) => self.selected = Some(id),
                    None => {
                        let world = self.camera.screen_to_world(rect, pointer);
                        self.open_add_form_at(Position {
                            x: world.x.max(0.0),
                            y: world.y.max(0.0),
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn drag_delta_maps_to_the_expected_persisted_position() {
        let camera = Camera::default();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(1280.0, 800.0));

        let start_screen = camera.world_to_screen(rect, vec2(100.0, 100.0));
        let released = start_screen + vec2(50.0, -20.0);

        let world = drag_world_position(&camera, rect, released, Vec2::ZERO);
        assert_eq!(world, vec2(150.0, 80.0));
    }

    #[test]
    fn dragged_positions_clamp_to_the_non_negative_quadrant() {
        let camera = Camera::default();
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(1280.0, 800.0));

        let start_screen = camera.world_to_screen(rect, vec2(10.0, 10.0));
        let released = start_screen + vec2(-500.0, -500.0);

        let world = drag_world_position(&camera, rect, released, Vec2::ZERO);
        assert_eq!(world, vec2(0.0, 0.0));
    }

    #[test]
    fn grab_offset_and_zoom_are_honored() {
        let mut camera = Camera::default();
        camera.zoom = 2.0;
        camera.pan = vec2(-60.0, 35.0);
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(1280.0, 800.0));
        let grab_offset = vec2(12.0, -7.0);

        let card_world = vec2(240.0, 180.0);
        let pointer = camera.world_to_screen(rect, card_world) + grab_offset;

        let world = drag_world_position(&camera, rect, pointer, grab_offset);
        assert!((world - card_world).length() < 1e-3);
    }
}
