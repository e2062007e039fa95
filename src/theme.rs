use crate::markup::Tag;

/// Semantic roles that can be given a color
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Role {
    /// Month names in titles
    Title,
    /// Secondary title color, used for 4-digit years
    Year,
    /// Today's date; rendered as a background color
    Today,
    Saturday,
    Sunday,
    Holiday,
}

impl Role {
    pub(crate) fn from_key(key: &str) -> Option<Role> {
        match key {
            "title" => Some(Role::Title),
            "year" => Some(Role::Year),
            "today" => Some(Role::Today),
            "saturday" => Some(Role::Saturday),
            "sunday" => Some(Role::Sunday),
            "holiday" => Some(Role::Holiday),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ColorConfig {
    title: String,
    year: String,
    today: String,
    saturday: String,
    sunday: String,
    holiday: String,
}

impl ColorConfig {
    /// Apply `(role, color)` overrides.  Keys that do not name a role and
    /// empty colors are ignored.
    pub(crate) fn with_overrides<I, K, V>(mut self, overrides: I) -> ColorConfig
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, color) in overrides {
            let (key, color) = (key.as_ref(), color.as_ref().trim());
            match Role::from_key(key) {
                Some(role) if !color.is_empty() => *self.slot_mut(role) = color.to_owned(),
                Some(_) => log::debug!("Ignoring empty color for {key:?}"),
                None => log::debug!("Ignoring unknown color role {key:?}"),
            }
        }
        self
    }

    pub(crate) fn color(&self, role: Role) -> &str {
        match role {
            Role::Title => &self.title,
            Role::Year => &self.year,
            Role::Today => &self.today,
            Role::Saturday => &self.saturday,
            Role::Sunday => &self.sunday,
            Role::Holiday => &self.holiday,
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut String {
        match role {
            Role::Title => &mut self.title,
            Role::Year => &mut self.year,
            Role::Today => &mut self.today,
            Role::Saturday => &mut self.saturday,
            Role::Sunday => &mut self.sunday,
            Role::Holiday => &mut self.holiday,
        }
    }

    /// The markup tag used for `role`.  Today is highlighted with a
    /// background color, everything else with a foreground color.
    pub(crate) fn tag(&self, role: Role) -> Tag {
        let color = self.color(role);
        if role == Role::Today {
            Tag::background(color)
        } else {
            Tag::foreground(color)
        }
    }
}

impl Default for ColorConfig {
    fn default() -> ColorConfig {
        ColorConfig {
            title: String::from("green"),
            year: String::from("yellow"),
            today: String::from("green"),
            saturday: String::from("cyan"),
            sunday: String::from("magenta"),
            holiday: String::from("red"),
        }
    }
}
