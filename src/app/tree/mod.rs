mod build;
mod interaction;
mod view;

use eframe::egui::{Vec2, vec2};

pub(in crate::app) const CARD_SIZE: Vec2 = vec2(170.0, 64.0);
