use std::io::{self, Write};

use serde::Serialize;

use crate::analysis::TeamReport;
use crate::error::AnalysisError;
use crate::history::PeriodRecord;
use crate::squad_ranker::SquadRow;
use crate::transfer_recommender::{CandidateRow, TransferThresholds};

/// Presentation collaborator for finished analyses.
pub trait ReportRenderer {
    fn render_report(&mut self, report: &TeamReport) -> io::Result<()>;
    fn render_error(&mut self, err: &AnalysisError) -> io::Result<()>;
}

/// Plain-text tables without an index column.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn squad_table(&mut self, title: &str, rows: &[SquadRow]) -> io::Result<()> {
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{:<20} {:>6} {:>7}", "Player", "Form", "Cost")?;
        if rows.is_empty() {
            writeln!(self.out, "(none)")?;
        }
        for row in rows {
            writeln!(
                self.out,
                "{:<20} {:>6.1} {:>7}",
                row.name,
                row.form,
                format_cost(u64::from(row.cost))
            )?;
        }
        writeln!(self.out)
    }

    fn candidate_table(&mut self, title: &str, rows: &[CandidateRow]) -> io::Result<()> {
        writeln!(self.out, "{title}")?;
        writeln!(
            self.out,
            "{:<20} {:>6} {:>7} {:>8}",
            "Player", "Form", "Cost", "Owned%"
        )?;
        if rows.is_empty() {
            writeln!(self.out, "(none)")?;
        }
        for row in rows {
            writeln!(
                self.out,
                "{:<20} {:>6.1} {:>7} {:>8.1}",
                row.name,
                row.form,
                format_cost(u64::from(row.cost)),
                row.ownership
            )?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> ReportRenderer for TextRenderer<W> {
    fn render_report(&mut self, report: &TeamReport) -> io::Result<()> {
        writeln!(self.out, "Team Performance for Team ID: {}", report.team_id)?;
        writeln!(self.out, "Current Gameweek: {}", report.current_period)?;
        writeln!(self.out)?;

        writeln!(self.out, "Points Trend (Last {} Gameweeks)", report.trend.len())?;
        let max = report.trend.iter().map(|r| r.points).max().unwrap_or(0).max(1);
        for rec in &report.trend {
            let width = (rec.points.max(0) as usize * 30) / max as usize;
            writeln!(
                self.out,
                "GW{:<3} {:>4} {}",
                rec.period,
                rec.points,
                "#".repeat(width)
            )?;
        }
        writeln!(self.out)?;

        self.squad_table("Best Performing Players", &report.best.rows())?;
        self.squad_table("Worst Performing Players", &report.worst.rows())?;

        let t = report.recommendation.thresholds;
        let title = format!(
            "Recommended Transfers (Differentials) - budget {}, form > {:.2}, owned < {:.1}%",
            format_cost(t.budget),
            t.form_floor,
            t.ownership_ceiling
        );
        self.candidate_table(&title, &report.recommendation.rows())?;
        self.out.flush()
    }

    fn render_error(&mut self, err: &AnalysisError) -> io::Result<()> {
        writeln!(self.out, "Error: {err}")?;
        self.out.flush()
    }
}

/// One JSON document per report, for scripting.
pub struct JsonRenderer<W: Write> {
    out: W,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    team_id: u32,
    current_period: u32,
    trend: &'a [PeriodRecord],
    best: Vec<SquadRow>,
    worst: Vec<SquadRow>,
    thresholds: TransferThresholds,
    recommended: Vec<CandidateRow>,
}

#[derive(Serialize)]
struct JsonError {
    error: String,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_json(&mut self, value: &impl Serialize) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, value)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> ReportRenderer for JsonRenderer<W> {
    fn render_report(&mut self, report: &TeamReport) -> io::Result<()> {
        let doc = JsonReport {
            team_id: report.team_id,
            current_period: report.current_period,
            trend: &report.trend,
            best: report.best.rows(),
            worst: report.worst.rows(),
            thresholds: report.recommendation.thresholds,
            recommended: report.recommendation.rows(),
        };
        self.write_json(&doc)
    }

    fn render_error(&mut self, err: &AnalysisError) -> io::Result<()> {
        self.write_json(&JsonError {
            error: err.to_string(),
        })
    }
}

/// `62` → `£6.2m`.
pub fn format_cost(tenths: u64) -> String {
    format!("£{}.{}m", tenths / 10, tenths % 10)
}
