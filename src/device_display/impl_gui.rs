use crate::device_display::interface::{DeviceDisplay, DisplaySurface};
use crate::device_input::interface::Command;
use eframe::egui;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Surfaces = Arc<Mutex<BTreeMap<DisplaySurface, String>>>;

/// Window with one button per class, the no-action toggle and the three
/// text surfaces.
pub struct ClassifierWindow {
    surfaces: Surfaces,
    context: Arc<Mutex<Option<egui::Context>>>,
    class_labels: Vec<String>,
    commands: Sender<Command>,
}

impl ClassifierWindow {
    fn send(&self, command: Command) {
        let _ = self.commands.send(command);
    }
}

impl eframe::App for ClassifierWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut context) = self.context.lock() {
            if context.is_none() {
                *context = Some(ctx.clone());
            }
        }

        let surfaces = match self.surfaces.lock() {
            Ok(surfaces) => surfaces.clone(),
            Err(_) => BTreeMap::new(),
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Add examples");
            ui.horizontal(|ui| {
                for (class_index, label) in self.class_labels.iter().enumerate() {
                    if ui.button(format!("Class {}", label)).clicked() {
                        self.send(Command::AddExample(class_index));
                    }
                }
            });
            if ui.button("Start/stop no-action images").clicked() {
                self.send(Command::ToggleNoActionSampling);
            }

            for surface in DisplaySurface::ALL {
                ui.separator();
                let text = surfaces.get(&surface).map(String::as_str).unwrap_or("");
                ui.label(egui::RichText::new(text).monospace().size(16.0));
            }
        });

        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

pub struct DeviceDisplayGui {
    surfaces: Surfaces,
    context: Arc<Mutex<Option<egui::Context>>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self {
            surfaces: Arc::new(Mutex::new(BTreeMap::new())),
            context: Arc::new(Mutex::new(None)),
        }
    }

    /// The window sharing this display's surfaces. Button presses go to `commands`.
    pub fn window(&self, class_labels: Vec<String>, commands: Sender<Command>) -> ClassifierWindow {
        ClassifierWindow {
            surfaces: Arc::clone(&self.surfaces),
            context: Arc::clone(&self.context),
            class_labels,
            commands,
        }
    }
}

/// Blocks until the window is closed. Must run on the main thread.
pub fn run_window(window: ClassifierWindow) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native("knn-cam", options, Box::new(|_cc| Box::new(window)))
        .map_err(|e| e.to_string())?;

    Ok(())
}

impl DeviceDisplay for DeviceDisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn write(&mut self, surface: DisplaySurface, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.surfaces
            .lock()
            .map_err(|e| e.to_string())?
            .insert(surface, text.to_string());

        if let Some(context) = self.context.lock().map_err(|e| e.to_string())?.as_ref() {
            context.request_repaint();
        }
        Ok(())
    }
}
