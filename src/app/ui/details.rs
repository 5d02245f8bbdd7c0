use eframe::egui::{RichText, Ui};

use super::super::connect::LinkKind;
use super::super::{ViewModel, WriteOp};
use super::forms::MemberForm;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui, ops: &mut Vec<WriteOp>) {
        ui.heading("Details");
        ui.separator();

        let Some(id) = self.selected.clone() else {
            ui.label("Select a member to see details.");
            return;
        };
        let Some(member) = self.tree.get(&id).cloned() else {
            self.selected = None;
            return;
        };

        ui.label(RichText::new(&member.name).strong().size(16.0));
        let relation = if member.relation.is_empty() {
            member.relation_kind.label().to_owned()
        } else {
            member.relation.clone()
        };
        ui.label(format!("Relation: {relation}"));
        ui.label(format!("Generation: {}", member.generation_rank()));
        if !member.email.is_empty() {
            ui.label(format!("Email: {}", member.email));
        }
        if let Some(phone) = &member.phone {
            ui.label(format!("Phone: {phone}"));
        }
        if let Some(role) = member.role {
            ui.label(format!("Role: {}", role.as_str()));
        }

        ui.add_space(4.0);
        if let Some(parent) = member.parent_id.as_deref().and_then(|pid| self.tree.get(pid)) {
            ui.label(format!("Parent: {}", parent.name));
        }
        if let Some(spouse) = member.spouse_id.as_deref().and_then(|sid| self.tree.get(sid)) {
            ui.label(format!("Spouse: {}", spouse.name));
        }
        if !member.children.is_empty() {
            let names = member
                .children
                .iter()
                .filter_map(|child_id| self.tree.get(child_id))
                .map(|child| child.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if !names.is_empty() {
                ui.label(format!("Children: {names}"));
            }
        }

        ui.separator();

        if self.connect.source() == Some(id.as_str()) {
            ui.label("Click another card to finish the link.");
            if ui.button("Cancel connect").clicked() {
                self.connect.cancel();
            }
        } else {
            ui.horizontal(|ui| {
                if ui
                    .button("Connect child")
                    .on_hover_text("Then click the card that becomes this member's child.")
                    .clicked()
                {
                    self.connect.begin(&id, LinkKind::Child);
                }
                if ui
                    .button("Connect spouse")
                    .on_hover_text("Then click the card that becomes this member's spouse.")
                    .clicked()
                {
                    self.connect.begin(&id, LinkKind::Spouse);
                }
            });
        }

        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Edit").clicked() && self.form.is_none() {
                self.form = Some(MemberForm::for_edit(&member));
            }

            if self.confirm_delete.as_deref() == Some(id.as_str()) {
                if ui.button("Confirm delete").clicked() {
                    ops.push(self.delete_op(&id));
                    self.confirm_delete = None;
                }
                if ui.button("Keep").clicked() {
                    self.confirm_delete = None;
                }
            } else if ui.button("Delete").clicked() {
                self.confirm_delete = Some(id.clone());
            }
        });
    }
}
