use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::adjustment::Adjustment;
use crate::error::{ExportError, LoadError};
use crate::export::{write_export, ExportData};
use crate::parameters::Parameters;
use crate::presentation::{Presenter, View};
use crate::roster::Roster;
use crate::statistics::{failing_students, Statistics};

/// The state of one interactive session: the current roster, the current slider
/// positions and the scores they produced.
pub struct Session {
    parameters: Parameters,
    roster: Option<Roster>,
    source: Option<String>,
    adjustment: Adjustment,
    adjusted: Vec<f64>,
}

impl Session {
    pub fn new(parameters: Parameters) -> Self {
        Session {
            parameters,
            roster: None,
            source: None,
            adjustment: Adjustment::default(),
            adjusted: Vec::new(),
        }
    }

    /// Replaces the roster and resets the sliders. On error the previous
    /// roster, sliders and scores stay as they were.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<&Roster, LoadError> {
        let path = path.as_ref();

        let roster = Roster::from_path(path).map_err(|error| {
            warn!("failed to load {}: {}", path.display(), error);
            error
        })?;
        let source = path
            .file_name()
            .map(|file_name| file_name.to_string_lossy().into_owned());

        Ok(self.replace_roster(roster, source))
    }

    pub fn replace_roster(&mut self, roster: Roster, source: Option<String>) -> &Roster {
        self.adjustment = Adjustment::default();
        self.adjusted = self.adjustment.apply(roster.scores());
        self.source = source;
        self.roster.insert(roster)
    }

    /// Takes new slider positions and recomputes from the original scores.
    /// Returns the adjusted scores, empty without a roster.
    pub fn recompute(&mut self, adjustment: Adjustment) -> &[f64] {
        self.adjustment = adjustment.clamped();

        if let Some(roster) = &self.roster {
            self.adjusted = self.adjustment.apply(roster.scores());
            debug!("recomputed {} scores", self.adjusted.len());
        }

        &self.adjusted
    }

    /// Parameters changed, recompute, render. Nothing is rendered before a roster is loaded.
    pub fn update<P: Presenter>(&mut self, adjustment: Adjustment, presenter: &mut P) -> io::Result<()> {
        self.recompute(adjustment);

        match self.view() {
            Some(view) => presenter.render(&view),
            None => Ok(()),
        }
    }

    pub fn view(&self) -> Option<View> {
        let roster = self.roster.as_ref()?;

        Some(View {
            source: self.source.clone(),
            adjustment: self.adjustment,
            statistics: Statistics::compute(&self.adjusted),
            failing: failing_students(roster.names(), &self.adjusted),
        })
    }

    /// Writes the current state. A failed export leaves the session untouched so it can be retried.
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PathBuf>, ExportError> {
        let path = path.as_ref();
        let roster = self.roster.as_ref().ok_or(ExportError::NothingToExport)?;

        let data = ExportData {
            roster,
            adjusted: &self.adjusted,
            adjustment: self.adjustment,
            sheets: &self.parameters.export,
        };

        write_export(path, &data).map_err(|error| {
            warn!("failed to export to {}: {}", path.display(), error);
            error
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn adjustment(&self) -> Adjustment {
        self.adjustment
    }

    pub fn adjusted(&self) -> &[f64] {
        &self.adjusted
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::Session;
    use crate::adjustment::Adjustment;
    use crate::error::{ExportError, LoadError};
    use crate::parameters::Parameters;
    use crate::presentation::{Presenter, View};
    use crate::roster::Roster;

    #[derive(Default)]
    struct RecordingPresenter {
        views: Vec<View>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&mut self, view: &View) -> io::Result<()> {
            self.views.push(view.clone());
            Ok(())
        }
    }

    fn session_with_roster() -> Session {
        let roster =
            Roster::from_csv_reader("name,score\nada,40\nben,55\ncarla,62\ndan,90\n".as_bytes())
                .unwrap();
        let mut session = Session::new(Parameters::default());
        session.replace_roster(roster, Some("class.csv".to_owned()));
        session
    }

    #[test]
    fn nothing_is_rendered_without_roster() {
        let mut session = Session::new(Parameters::default());
        let mut presenter = RecordingPresenter::default();

        session.update(Adjustment::new(5, 0, 0), &mut presenter).unwrap();

        assert!(presenter.views.is_empty());
        assert!(session.adjusted().is_empty());
    }

    #[test]
    fn every_update_renders_once() {
        let mut session = session_with_roster();
        let mut presenter = RecordingPresenter::default();

        session.update(Adjustment::new(5, 0, 0), &mut presenter).unwrap();
        session.update(Adjustment::new(0, 0, 0), &mut presenter).unwrap();

        assert_eq!(presenter.views.len(), 2);
        assert_eq!(presenter.views[0].failing.len(), 1);
        assert_eq!(presenter.views[1].failing.len(), 2);
    }

    #[test]
    fn recompute_starts_from_original_scores() {
        let mut session = session_with_roster();

        session.recompute(Adjustment::new(10, 0, 0));
        session.recompute(Adjustment::new(10, 0, 0));

        assert_eq!(session.adjusted(), [50.0, 65.0, 72.0, 100.0]);

        session.recompute(Adjustment::default());

        assert_eq!(session.adjusted(), [40.0, 55.0, 62.0, 90.0]);
    }

    #[test]
    fn loading_resets_the_sliders() {
        let mut session = session_with_roster();
        session.recompute(Adjustment::new(10, 2, 3));

        let roster = Roster::from_csv_reader("name,score\neve,70\n".as_bytes()).unwrap();
        session.replace_roster(roster, None);

        assert_eq!(session.adjustment(), Adjustment::default());
        assert_eq!(session.adjusted(), [70.0]);
    }

    #[test]
    fn failed_load_keeps_previous_state() {
        let mut session = session_with_roster();
        session.recompute(Adjustment::new(-3, 0, 0));

        let result = session.load("does/not/exist.csv");

        assert!(matches!(result, Err(LoadError::Io(_))));
        assert_eq!(session.roster().map(|roster| roster.len()), Some(4));
        assert_eq!(session.adjustment(), Adjustment::new(-3, 0, 0));
        assert_eq!(session.adjusted(), [37.0, 52.0, 59.0, 87.0]);
    }

    #[test]
    fn export_requires_roster() {
        let session = Session::new(Parameters::default());

        assert!(matches!(
            session.export("out.xlsx"),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn empty_roster_has_no_statistics() {
        let mut session = Session::new(Parameters::default());
        let roster = Roster::from_csv_reader("name,score\n".as_bytes()).unwrap();
        session.replace_roster(roster, None);

        let view = session.view().unwrap();

        assert!(view.statistics.is_none());
        assert!(matches!(
            session.export("out.xlsx"),
            Err(ExportError::EmptyRoster)
        ));
    }
}
