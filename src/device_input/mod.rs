pub mod impl_channel;
pub mod impl_console;
pub mod interface;
