use crate::asset_pool::ImageAsset;
use crate::device_display::interface::DeviceDisplay;
use eframe::egui;
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Default)]
struct OverlayBuffer {
    visible: Option<(usize, ImageAsset)>,
}

/// The eframe side of [`DeviceDisplayGui`]. Must run on the main thread.
pub struct OverlayWindow {
    buffer: Arc<Mutex<OverlayBuffer>>,
    texture: Option<(usize, egui::TextureHandle)>,
}

impl OverlayWindow {
    fn texture_for(
        &mut self,
        ctx: &egui::Context,
        index: usize,
        asset: &ImageAsset,
    ) -> egui::TextureId {
        match &self.texture {
            Some((cached, handle)) if *cached == index => handle.id(),
            _ => {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [asset.image.width() as usize, asset.image.height() as usize],
                    asset.image.as_raw(),
                );
                let handle = ctx.load_texture(
                    format!("overlay_{}", index),
                    image,
                    egui::TextureOptions::LINEAR,
                );
                let id = handle.id();
                self.texture = Some((index, handle));
                id
            }
        }
    }
}

impl eframe::App for OverlayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visible = self
            .buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .visible
            .clone();

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            ui.painter()
                .rect_filled(rect, 0.0, egui::Color32::from_rgb(20, 20, 20));

            match &visible {
                Some((index, asset)) => {
                    let texture_id = self.texture_for(ctx, *index, asset);
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter()
                        .image(texture_id, rect, uv, egui::Color32::WHITE);
                }
                None => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(rect.height() / 2.0 - 10.0);
                        ui.label(
                            egui::RichText::new("Watching...")
                                .monospace()
                                .color(egui::Color32::LIGHT_GRAY)
                                .size(20.0),
                        );
                    });
                }
            }
        });

        ctx.request_repaint_after(Duration::from_millis(50));
    }
}

pub struct DeviceDisplayGui {
    buffer: Arc<Mutex<OverlayBuffer>>,
    visible: Option<usize>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(OverlayBuffer::default())),
            visible: None,
        }
    }

    pub fn window(&self) -> OverlayWindow {
        OverlayWindow {
            buffer: Arc::clone(&self.buffer),
            texture: None,
        }
    }
}

/// Blocks until the window is closed.
pub fn run_window(window: OverlayWindow) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 640.0])
            .with_title("Vision Alarm"),
        ..Default::default()
    };

    eframe::run_native(
        "Vision Alarm",
        options,
        Box::new(|_cc| Box::new(window)),
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}

impl DeviceDisplay for DeviceDisplayGui {
    fn show_image(
        &mut self,
        index: usize,
        image: &ImageAsset,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer.lock().map_err(|e| e.to_string())?.visible = Some((index, image.clone()));
        self.visible = Some(index);
        Ok(())
    }

    fn hide_image(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.buffer.lock().map_err(|e| e.to_string())?.visible = None;
        self.visible = None;
        Ok(())
    }

    fn visible_image(&self) -> Option<usize> {
        self.visible
    }
}

#[cfg(test)]
mod display_gui_test {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_buffer_tracks_overlay() {
        let mut display = DeviceDisplayGui::new();
        let window = display.window();
        let asset = ImageAsset {
            name: "image2.jpg".to_string(),
            image: RgbaImage::new(2, 2),
        };

        display.show_image(2, &asset).unwrap();
        assert_eq!(display.visible_image(), Some(2));
        assert_eq!(
            window.buffer.lock().unwrap().visible.as_ref().map(|(i, _)| *i),
            Some(2)
        );

        display.hide_image().unwrap();
        assert_eq!(display.visible_image(), None);
        assert!(window.buffer.lock().unwrap().visible.is_none());
    }
}
