use owo_colors::Style;
use std::sync::OnceLock;
use crate::entry::LocalizedString;

static ACTIVE: OnceLock<Theme> = OnceLock::new();

/// How each kind of localization output is drawn
#[derive(Debug, Clone)]
pub struct Theme {
    /// Resource names in headings
    pub resource: Style,
    /// Locale labels, "invariant" included
    pub locale: Style,
    /// Values that resolved to a translation
    pub translated: Style,
    /// Keys shown in place of a missing translation
    pub untranslated: Style,
    pub failure: Style,
    pub faint: Style,
}

impl Theme {
    /// Colors only when stdout is a terminal and `NO_COLOR` is unset or empty
    pub fn for_terminal() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if !no_color && console::Term::stdout().is_term() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            resource: Style::new().bright_cyan().bold(),
            locale: Style::new().blue(),
            translated: Style::new().green(),
            untranslated: Style::new().yellow().italic(),
            failure: Style::new().red().bold(),
            faint: Style::new().dimmed(),
        }
    }

    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            resource: none,
            locale: none,
            translated: none,
            untranslated: none,
            failure: none,
            faint: none,
        }
    }

    /// Style of a resolved string, by whether a translation was found
    pub fn for_string(&self, string: &LocalizedString) -> Style {
        if string.found { self.translated } else { self.untranslated }
    }
}

pub fn theme() -> &'static Theme {
    ACTIVE.get_or_init(Theme::for_terminal)
}
