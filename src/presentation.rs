use std::io::{self, Write};

use serde::Serialize;

use crate::adjustment::Adjustment;
use crate::statistics::{FailingStudent, Statistics};

const BAR_WIDTH: usize = 40;
// the pass line sits between the "50-60" and "60-70" bins
const PASS_LINE_BIN: usize = 6;

/// Everything the presentation layer shows after one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub source: Option<String>,
    pub adjustment: Adjustment,
    /// `None` when the roster is empty.
    pub statistics: Option<Statistics>,
    pub failing: Vec<FailingStudent>,
}

pub trait Presenter {
    fn render(&mut self, view: &View) -> io::Result<()>;
}

/// Renders views as plain text panels: parameters, statistics, histogram,
/// pass/fail split and the failing students.
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        TextPresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_parameters(&mut self, view: &View) -> io::Result<()> {
        if let Some(source) = &view.source {
            writeln!(self.out, "loaded: {}", source)?;
        }
        writeln!(
            self.out,
            "shift: {}  spread: {:.1}  pass rate: {}",
            view.adjustment.shift,
            view.adjustment.spread_delta(),
            view.adjustment.pass_rate_adjust
        )
    }

    fn render_statistics(&mut self, statistics: &Statistics) -> io::Result<()> {
        writeln!(self.out, "students:  {}", statistics.count)?;
        writeln!(self.out, "mean:      {:.1}", statistics.mean)?;
        writeln!(self.out, "minimum:   {:.1}", statistics.minimum)?;
        writeln!(self.out, "maximum:   {:.1}", statistics.maximum)?;
        writeln!(self.out, "std dev:   {:.1}", statistics.std_dev)?;
        writeln!(self.out, "passed:    {}", statistics.pass_count)?;
        writeln!(self.out, "failed:    {}", statistics.fail_count)?;
        writeln!(self.out, "pass rate: {:.1}%", statistics.pass_rate)
    }

    fn render_histogram(&mut self, statistics: &Statistics) -> io::Result<()> {
        let histogram = &statistics.histogram;
        let max_count = histogram.max_count();

        writeln!(self.out, "distribution:")?;
        for (bin, (label, count)) in histogram.bins().enumerate() {
            if bin == PASS_LINE_BIN {
                writeln!(self.out, "{:>8} {}", "", "- pass line -")?;
            }
            let bar = if max_count == 0 {
                0
            } else {
                count * BAR_WIDTH / max_count
            };
            if count > 0 {
                writeln!(self.out, "{:>8} |{} {}", label, "#".repeat(bar), count)?;
            } else {
                writeln!(self.out, "{:>8} |", label)?;
            }
        }

        Ok(())
    }

    fn render_pass_fail(&mut self, statistics: &Statistics) -> io::Result<()> {
        writeln!(
            self.out,
            "pass (>=60): {:.1}%  fail (<60): {:.1}%",
            statistics.pass_rate,
            100.0 - statistics.pass_rate
        )
    }

    fn render_failing(&mut self, failing: &[FailingStudent]) -> io::Result<()> {
        writeln!(self.out, "failing students:")?;
        for student in failing {
            writeln!(self.out, "  {}: {:.1}", student.name, student.score)?;
        }
        Ok(())
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn render(&mut self, view: &View) -> io::Result<()> {
        self.render_parameters(view)?;

        match &view.statistics {
            Some(statistics) => {
                self.render_statistics(statistics)?;
                self.render_histogram(statistics)?;
                self.render_pass_fail(statistics)?;
                self.render_failing(&view.failing)?;
            }
            None => writeln!(self.out, "no statistics available")?,
        }

        self.out.flush()
    }
}

/// Writes every view as a single line of JSON.
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        JsonPresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn render(&mut self, view: &View) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, view)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
