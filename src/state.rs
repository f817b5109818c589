use std::fmt::Display;

use crate::ui::birefringence::BirefringenceLab;
use crate::ui::capture::PendingCapture;
use crate::ui::data_processing::DataLab;
use crate::ui::double_slit::DoubleSlitLab;
use crate::ui::michelson::{IndexLab, MichelsonDemoLab, SpeedLab, WavelengthLab};
use crate::ui::photoelectric::PhotoelectricLab;
use crate::ui::planck::PlanckLab;

// ---------------------------------------------------------------------------
// Experiments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Experiment {
    Photoelectric,
    DoubleSlit,
    Birefringence,
    MichelsonDemo,
    Planck,
    MichelsonWavelength,
    SpeedOfLight,
    RefractiveIndex,
    DataProcessing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Demonstration,
    Simulation,
    Data,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Demonstration, Group::Simulation, Group::Data];

    pub fn title(self) -> &'static str {
        match self {
            Group::Demonstration => "Demonstration experiments",
            Group::Simulation => "Simulation experiments",
            Group::Data => "Data processing",
        }
    }
}

impl Experiment {
    pub const ALL: [Experiment; 9] = [
        Experiment::Photoelectric,
        Experiment::DoubleSlit,
        Experiment::Birefringence,
        Experiment::MichelsonDemo,
        Experiment::Planck,
        Experiment::MichelsonWavelength,
        Experiment::SpeedOfLight,
        Experiment::RefractiveIndex,
        Experiment::DataProcessing,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Experiment::Photoelectric => "Photoelectric effect",
            Experiment::DoubleSlit => "Single-photon double slit",
            Experiment::Birefringence => "Crystal birefringence",
            Experiment::MichelsonDemo => "Michelson interference",
            Experiment::Planck => "Planck's constant",
            Experiment::MichelsonWavelength => "Michelson: laser wavelength",
            Experiment::SpeedOfLight => "Michelson: speed of light",
            Experiment::RefractiveIndex => "Michelson: refractive index",
            Experiment::DataProcessing => "Data processing",
        }
    }

    pub fn group(self) -> Group {
        match self {
            Experiment::Photoelectric
            | Experiment::DoubleSlit
            | Experiment::Birefringence
            | Experiment::MichelsonDemo => Group::Demonstration,
            Experiment::Planck
            | Experiment::MichelsonWavelength
            | Experiment::SpeedOfLight
            | Experiment::RefractiveIndex => Group::Simulation,
            Experiment::DataProcessing => Group::Data,
        }
    }

    pub fn in_group(group: Group) -> impl Iterator<Item = Experiment> {
        Self::ALL.into_iter().filter(move |e| e.group() == group)
    }

    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

/// The one-line message under each experiment window's buttons.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StatusLine {
    #[default]
    Empty,
    Info(String),
    Error(String),
}

impl StatusLine {
    pub fn info(&mut self, msg: impl Into<String>) {
        *self = StatusLine::Info(msg.into());
    }

    /// Record and log a failure.
    pub fn error(&mut self, err: impl Display) {
        log::warn!("{err}");
        *self = StatusLine::Error(format!("Error: {err}"));
    }

    pub fn clear(&mut self) {
        *self = StatusLine::Empty;
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    open: [bool; Experiment::ALL.len()],

    pub photoelectric: PhotoelectricLab,
    pub double_slit: DoubleSlitLab,
    pub birefringence: BirefringenceLab,
    pub michelson_demo: MichelsonDemoLab,
    pub planck: PlanckLab,
    pub wavelength: WavelengthLab,
    pub speed_of_light: SpeedLab,
    pub refractive_index: IndexLab,
    pub data: DataLab,

    /// A chart screenshot in flight.
    pub capture: Option<PendingCapture>,

    /// Status message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn is_open(&self, experiment: Experiment) -> bool {
        self.open[experiment.index()]
    }

    pub fn open(&mut self, experiment: Experiment) {
        log::info!("Opening {}", experiment.title());
        self.open[experiment.index()] = true;
    }

    pub fn open_flag(&mut self, experiment: Experiment) -> &mut bool {
        &mut self.open[experiment.index()]
    }

    pub fn open_count(&self) -> usize {
        self.open.iter().filter(|&&o| o).count()
    }

    /// Status line of an experiment window.
    pub fn status_of(&mut self, experiment: Experiment) -> &mut StatusLine {
        match experiment {
            Experiment::Photoelectric => &mut self.photoelectric.status,
            Experiment::DoubleSlit => &mut self.double_slit.status,
            Experiment::Birefringence => &mut self.birefringence.status,
            Experiment::MichelsonDemo => &mut self.michelson_demo.status,
            Experiment::Planck => &mut self.planck.status,
            Experiment::MichelsonWavelength => &mut self.wavelength.status,
            Experiment::SpeedOfLight => &mut self.speed_of_light.status,
            Experiment::RefractiveIndex => &mut self.refractive_index.status,
            Experiment::DataProcessing => &mut self.data.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_experiment_has_a_group() {
        let total: usize = Group::ALL
            .iter()
            .map(|&g| Experiment::in_group(g).count())
            .sum();
        assert_eq!(total, Experiment::ALL.len());
        assert_eq!(Experiment::in_group(Group::Data).count(), 1);
    }

    #[test]
    fn windows_open_independently() {
        let mut state = AppState::default();
        state.open(Experiment::Planck);
        state.open(Experiment::DoubleSlit);
        *state.open_flag(Experiment::Planck) = false;
        assert!(!state.is_open(Experiment::Planck));
        assert!(state.is_open(Experiment::DoubleSlit));
        assert_eq!(state.open_count(), 1);
    }

    #[test]
    fn status_line_records_errors() {
        let mut state = AppState::default();
        state.status_of(Experiment::SpeedOfLight).error("bad input");
        assert_eq!(
            state.speed_of_light.status,
            StatusLine::Error("Error: bad input".into())
        );
        state.status_of(Experiment::SpeedOfLight).clear();
        assert_eq!(state.speed_of_light.status, StatusLine::Empty);
    }
}
