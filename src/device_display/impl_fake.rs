use crate::device_display::interface::{DeviceDisplay, DisplaySurface};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Remembers the last text and the number of writes per surface.
#[derive(Clone, Default)]
pub struct DeviceDisplayFake {
    surfaces: Arc<Mutex<HashMap<DisplaySurface, (String, usize)>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, surface: DisplaySurface) -> Option<String> {
        self.surfaces
            .lock()
            .unwrap()
            .get(&surface)
            .map(|(text, _)| text.clone())
    }

    pub fn write_count(&self, surface: DisplaySurface) -> usize {
        self.surfaces
            .lock()
            .unwrap()
            .get(&surface)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn write(&mut self, surface: DisplaySurface, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut surfaces = self.surfaces.lock().map_err(|e| e.to_string())?;
        let entry = surfaces.entry(surface).or_insert((String::new(), 0));
        entry.0 = text.to_string();
        entry.1 += 1;
        Ok(())
    }
}
