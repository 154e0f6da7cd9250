use std::fmt;

use serde::{Deserialize, Serialize};

/// The banks covered by the bundled datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bank {
    Commercial,
    Hnb,
    Sampath,
    Seylan,
    PanAsia,
    Ntb,
}

/// Alias → bank, matched as a case-insensitive substring of turn text.
const ALIASES: &[(&str, Bank)] = &[
    ("commercial", Bank::Commercial),
    ("hnb", Bank::Hnb),
    ("sampath", Bank::Sampath),
    ("seylan", Bank::Seylan),
    ("pan asia", Bank::PanAsia),
    ("ntb", Bank::Ntb),
];

const ALL: &[Bank] = &[
    Bank::Commercial,
    Bank::Hnb,
    Bank::Sampath,
    Bank::Seylan,
    Bank::PanAsia,
    Bank::Ntb,
];

impl Bank {
    pub fn all() -> &'static [Bank] {
        ALL
    }

    /// The name the datasets use to mark this bank's rows and columns.
    pub fn display_name(&self) -> &'static str {
        match self {
            Bank::Commercial => "Commercial",
            Bank::Hnb => "HNB",
            Bank::Sampath => "Sampath",
            Bank::Seylan => "Seylan",
            Bank::PanAsia => "Pan Asia",
            Bank::Ntb => "NTB",
        }
    }

    /// First known alias mentioned in the text, if any.
    pub fn find_in(text: &str) -> Option<Bank> {
        let lower = text.to_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| lower.contains(alias))
            .map(|(_, bank)| *bank)
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
