use crate::device_display::interface::{DeviceDisplay, DisplaySurface};
use std::collections::BTreeMap;
use std::error::Error;
use std::io::Write;

const WIDTH: usize = 48;

/// Redraws all surfaces on stdout whenever one of them changes.
pub struct DeviceDisplayConsole {
    surfaces: BTreeMap<DisplaySurface, String>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self {
            surfaces: BTreeMap::new(),
        }
    }

    fn render_display(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "┌{}┐", "─".repeat(WIDTH))?;
        for (index, surface) in DisplaySurface::ALL.iter().enumerate() {
            if index > 0 {
                writeln!(stdout, "├{}┤", "─".repeat(WIDTH))?;
            }
            let text = self.surfaces.get(surface).map(String::as_str).unwrap_or("");
            for line in text.lines() {
                let line: String = line.chars().take(WIDTH).collect();
                writeln!(stdout, "│{:<width$}│", line, width = WIDTH)?;
            }
        }
        writeln!(stdout, "└{}┘", "─".repeat(WIDTH))?;
        stdout.flush()?;
        Ok(())
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Controls: a/b/c/d + Enter add an example, n toggles no-action sampling, q quits")?;
        Ok(())
    }

    fn write(&mut self, surface: DisplaySurface, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.surfaces.get(&surface).map(String::as_str) == Some(text) {
            return Ok(());
        }
        self.surfaces.insert(surface, text.to_string());
        self.render_display()
    }
}
