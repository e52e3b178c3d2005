use piekit::control::ControlCommand;

/// Messages from the background runtime to the GTK main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Present,
    ConfigReload,
}

impl From<ControlCommand> for AppEvent {
    fn from(command: ControlCommand) -> Self {
        match command {
            ControlCommand::Present => AppEvent::Present,
            ControlCommand::Reload => AppEvent::ConfigReload,
        }
    }
}
