/// Display name shown in the page header.
pub const DEFAULT_DISPLAY_NAME: &str = "admin";

const USER_SLOT: &str = "{{ user }}";

/// The static pages served next to the chat endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Index,
    Settings,
    DefaultInstructions,
    Rules,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Index,
        Page::Settings,
        Page::DefaultInstructions,
        Page::Rules,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Index => "/",
            Page::Settings => "/settings",
            Page::DefaultInstructions => "/default-instructions",
            Page::Rules => "/rules",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            Page::Index => include_str!("../templates/index.html"),
            Page::Settings => include_str!("../templates/settings.html"),
            Page::DefaultInstructions => include_str!("../templates/default_instructions.html"),
            Page::Rules => include_str!("../templates/rules.html"),
        }
    }

    /// Renders the page with `user` as the display name.
    pub fn render(&self, user: &str) -> String {
        self.template().replace(USER_SLOT, &escape_html(user))
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
