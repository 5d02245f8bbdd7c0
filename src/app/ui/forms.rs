use eframe::egui::{self, Color32, Context};

use crate::family::{FamilyMember, Position, RelationKind};

use super::super::{MemberDraft, ViewModel, WriteOp};

/// Add/edit dialog state. Relationship links and positions are not edited
/// here; `position` only carries the click-to-add seed for new members.
pub(in crate::app) struct MemberForm {
    editing: Option<String>,
    first_name: String,
    last_name: String,
    relation_kind: RelationKind,
    email: String,
    phone: String,
    photo_url: String,
    position: Option<Position>,
    error: Option<String>,
}

impl MemberForm {
    pub(in crate::app) fn for_add(position: Option<Position>) -> Self {
        Self {
            editing: None,
            first_name: String::new(),
            last_name: String::new(),
            relation_kind: RelationKind::Other,
            email: String::new(),
            phone: String::new(),
            photo_url: String::new(),
            position,
            error: None,
        }
    }

    pub(in crate::app) fn for_edit(member: &FamilyMember) -> Self {
        Self {
            editing: Some(member.id.clone()),
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            relation_kind: member.relation_kind,
            email: member.email.clone(),
            phone: member.phone.clone().unwrap_or_default(),
            photo_url: member.photo_url.clone().unwrap_or_default(),
            position: None,
            error: None,
        }
    }

    fn validate(&self) -> Result<MemberDraft, String> {
        if self.first_name.trim().is_empty() && self.last_name.trim().is_empty() {
            return Err("A first or last name is required.".to_owned());
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err("A valid email address is required.".to_owned());
        }

        let phone = self.phone.trim();
        let photo_url = self.photo_url.trim();
        Ok(MemberDraft {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            relation_kind: self.relation_kind,
            email: email.to_owned(),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
            photo_url: (!photo_url.is_empty()).then(|| photo_url.to_owned()),
            position: self.position,
        })
    }
}

impl ViewModel {
    /// Click-to-add entry point: the empty-canvas click's world coordinates
    /// pre-place the new member.
    pub(in crate::app) fn open_add_form_at(&mut self, position: Position) {
        if self.form.is_none() {
            self.form = Some(MemberForm::for_add(Some(position)));
        }
    }

    pub(in crate::app) fn draw_member_form(&mut self, ctx: &Context, ops: &mut Vec<WriteOp>) {
        let Some(form) = &mut self.form else {
            return;
        };

        let title = if form.editing.is_some() {
            "Edit member"
        } else {
            "Add member"
        };
        let mut submit = false;
        let mut cancel = false;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("member_form").num_columns(2).show(ui, |ui| {
                    ui.label("First name");
                    ui.text_edit_singleline(&mut form.first_name);
                    ui.end_row();

                    ui.label("Last name");
                    ui.text_edit_singleline(&mut form.last_name);
                    ui.end_row();

                    ui.label("Relation");
                    egui::ComboBox::from_id_salt("relation_kind")
                        .selected_text(form.relation_kind.label())
                        .show_ui(ui, |ui| {
                            for kind in RelationKind::ALL {
                                ui.selectable_value(&mut form.relation_kind, kind, kind.label());
                            }
                        });
                    ui.end_row();

                    ui.label("Email");
                    ui.text_edit_singleline(&mut form.email);
                    ui.end_row();

                    ui.label("Phone");
                    ui.text_edit_singleline(&mut form.phone);
                    ui.end_row();

                    ui.label("Photo URL");
                    ui.text_edit_singleline(&mut form.photo_url);
                    ui.end_row();
                });

                if let Some(position) = form.position {
                    ui.label(format!(
                        "Placed at ({:.0}, {:.0})",
                        position.x, position.y
                    ));
                }
                if let Some(error) = &form.error {
                    ui.colored_label(Color32::LIGHT_RED, error);
                }

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        let mut submitted = None;
        if submit {
            match form.validate() {
                Ok(draft) => submitted = Some((form.editing.clone(), draft)),
                Err(error) => form.error = Some(error),
            }
        }

        if cancel {
            self.form = None;
        } else if let Some((editing, draft)) = submitted {
            self.form = None;
            let op = match editing {
                Some(id) => self.update_op(&id, draft),
                None => Some(self.insert_op(draft)),
            };
            if let Some(op) = op {
                ops.push(op);
            }
        }
    }
}
