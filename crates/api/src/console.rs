/// Destination for the manager's progress lines ("map clicked",
/// "3 shapes loaded", ...).
#[derive(Default)]
pub enum Console {
    /// Forward lines to the `log` facade at info level.
    #[default]
    Log,
    /// Drop every line.
    Silent,
    /// Hand each line to a caller supplied function.
    Handler(Box<dyn FnMut(&str)>),
}

impl Console {
    pub fn handler(f: impl FnMut(&str) + 'static) -> Self {
        Self::Handler(Box::new(f))
    }

    pub fn print(&mut self, line: &str) {
        match self {
            Self::Log => log::info!("{}", line),
            Self::Silent => {}
            Self::Handler(f) => f(line),
        }
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Log => f.write_str("Console::Log"),
            Self::Silent => f.write_str("Console::Silent"),
            Self::Handler(_) => f.write_str("Console::Handler"),
        }
    }
}
