//! UI state - presentation state separate from domain data

/// Top-level screens, cycled with Tab/BackTab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Generate,
    Gallery,
    Settings,
}

impl Screen {
    pub fn all() -> [Screen; 3] {
        [Screen::Generate, Screen::Gallery, Screen::Settings]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Generate => "Generate",
            Screen::Gallery => "Gallery",
            Screen::Settings => "Settings",
        }
    }

    pub fn next(&self) -> Screen {
        let all = Self::all();
        let idx = all.iter().position(|s| s == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn previous(&self) -> Screen {
        let all = Self::all();
        let idx = all.iter().position(|s| s == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}
