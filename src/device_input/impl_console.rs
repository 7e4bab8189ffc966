use crate::device_input::interface::{Command, DeviceInput};
use crate::library::logger::interface::Logger;
use std::io::BufRead;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Reads one command per line from stdin.
pub struct DeviceInputConsole {
    class_count: usize,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceInputConsole {
    pub fn new(class_count: usize, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            class_count,
            logger: logger.with_namespace("input").with_namespace("console"),
        }
    }
}

/// `a`, `b`, ... add an example for class 0, 1, ...; `n` toggles no-action
/// sampling; `q` quits.
pub fn parse_command(line: &str, class_count: usize) -> Option<Command> {
    let mut chars = line.trim().chars();
    let key = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }

    match key {
        'n' => Some(Command::ToggleNoActionSampling),
        'q' => Some(Command::Quit),
        'a'..='z' => {
            let class_index = key as usize - 'a' as usize;
            (class_index < class_count).then_some(Command::AddExample(class_index))
        }
        _ => None,
    }
}

impl DeviceInput for DeviceInputConsole {
    fn events(&self) -> Receiver<Command> {
        let (tx, rx) = channel();
        let class_count = self.class_count;
        let logger = self.logger.clone();

        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match parse_command(&line, class_count) {
                    Some(command) => {
                        if tx.send(command).is_err() {
                            return;
                        }
                    }
                    None => {
                        let _ = logger.warn(&format!("Unknown command: {:?}", line));
                    }
                }
            }
            // stdin closed
            let _ = tx.send(Command::Quit);
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class_keys() {
        assert_eq!(parse_command("a", 4), Some(Command::AddExample(0)));
        assert_eq!(parse_command(" D \n", 4), Some(Command::AddExample(3)));
        assert_eq!(parse_command("e", 4), None);
    }

    #[test]
    fn test_parse_control_keys() {
        assert_eq!(parse_command("n", 4), Some(Command::ToggleNoActionSampling));
        assert_eq!(parse_command("q", 4), Some(Command::Quit));
        assert_eq!(parse_command("", 4), None);
        assert_eq!(parse_command("ab", 4), None);
        assert_eq!(parse_command("1", 4), None);
    }
}
