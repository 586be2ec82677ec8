use serde::{Deserialize, Serialize};

/// What a `load` call should produce, mirroring the numeric description
/// flags accepted on the CLI and in notebooks:
///
/// | flag | meaning                                   |
/// |------|-------------------------------------------|
/// |  `0` | the data itself                           |
/// |  `1` | print the variable definitions            |
/// |  `2` | return the variable definitions as a table|
/// | `-1` | print the estimate start years            |
/// | `-2` | return the estimate start years as a table|
///
/// Print variants write to stdout and yield no table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Data,
    ShowDefinitions,
    Definitions,
    ShowEstimates,
    Estimates,
}

impl Mode {
    /// Raw flag mapping, with no capability check. Unknown flags yield `None`.
    pub fn from_flag(flag: i8) -> Option<Mode> {
        match flag {
            0 => Some(Mode::Data),
            1 => Some(Mode::ShowDefinitions),
            2 => Some(Mode::Definitions),
            -1 => Some(Mode::ShowEstimates),
            -2 => Some(Mode::Estimates),
            _ => None,
        }
    }

    pub fn flag(self) -> i8 {
        match self {
            Mode::Data => 0,
            Mode::ShowDefinitions => 1,
            Mode::Definitions => 2,
            Mode::ShowEstimates => -1,
            Mode::Estimates => -2,
        }
    }

    /// Print variants display and return nothing.
    pub fn is_print(self) -> bool {
        matches!(self, Mode::ShowDefinitions | Mode::ShowEstimates)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Data
    }
}

/// Which description layers a dataset ships.
///
/// Every dataset answers flags `0` and `1`; a definitions table (`2`)
/// and estimate metadata (`-1`/`-2`) exist only where the source
/// publishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Flag `2` is answerable.
    pub definitions_table: bool,
    /// Flags `-1` and `-2` are answerable.
    pub estimates: bool,
}

impl Capabilities {
    pub const BASIC: Capabilities = Capabilities {
        definitions_table: false,
        estimates: false,
    };

    pub const WITH_DEFINITIONS: Capabilities = Capabilities {
        definitions_table: true,
        estimates: false,
    };

    pub const FULL: Capabilities = Capabilities {
        definitions_table: true,
        estimates: true,
    };

    /// True when `mode` is answerable under these capabilities.
    pub fn allows(self, mode: Mode) -> bool {
        match mode {
            Mode::Data | Mode::ShowDefinitions => true,
            Mode::Definitions => self.definitions_table,
            Mode::ShowEstimates | Mode::Estimates => self.estimates,
        }
    }
}
