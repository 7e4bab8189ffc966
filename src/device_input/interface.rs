use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AddExample(usize),
    ToggleNoActionSampling,
    Quit,
}

pub trait DeviceInput {
    /// Commands in the order the user issued them. Meant to be called once.
    fn events(&self) -> Receiver<Command>;
}
