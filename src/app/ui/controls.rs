use eframe::egui::{self, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::layout::LayoutMode;

use super::super::ViewModel;
use super::forms::MemberForm;

fn matches_query(matcher: &SkimMatcherV2, name: &str, query: &str) -> bool {
    matcher
        .fuzzy_match(name, query)
        .or_else(|| matcher.fuzzy_match(&name.to_ascii_lowercase(), &query.to_ascii_lowercase()))
        .is_some()
}

impl ViewModel {
    pub(in crate::app) fn draw_member_panel(&mut self, ui: &mut Ui) {
        ui.heading("Members");
        ui.separator();

        ui.label("Search");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Fuzzy-filter the member list by name.");

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Layout");
            let mut changed = ui
                .selectable_value(&mut self.layout_mode, LayoutMode::Auto, "Auto")
                .on_hover_text("Deterministic grid, one row per generation.")
                .changed();
            changed |= ui
                .selectable_value(&mut self.layout_mode, LayoutMode::Freestyle, "Freestyle")
                .on_hover_text("Drag cards anywhere; dropped positions are saved.")
                .changed();
            if changed {
                self.switch_layout_mode();
            }
        });

        ui.add_space(6.0);
        if ui
            .button("Add member")
            .on_hover_text("Clicking empty canvas also opens this, pre-placed.")
            .clicked()
            && self.form.is_none()
        {
            self.form = Some(MemberForm::for_add(None));
        }

        ui.separator();

        let matcher = SkimMatcherV2::default();
        let query = self.search.trim().to_owned();
        let mut clicked = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            for member in self.tree.members() {
                if !query.is_empty() && !matches_query(&matcher, &member.name, &query) {
                    continue;
                }

                let relation = if member.relation.is_empty() {
                    member.relation_kind.label()
                } else {
                    member.relation.as_str()
                };
                let is_selected = self.selected.as_deref() == Some(member.id.as_str());
                if ui
                    .selectable_label(is_selected, format!("{} ({relation})", member.name))
                    .clicked()
                {
                    clicked = Some(member.id.clone());
                }
            }
        });

        if let Some(id) = clicked {
            self.select_and_focus(&id);
        }
    }
}
