//! Curation CSV export

use crate::error::ExportError;
use pub2agents_domain::Agent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Header row of the curation sheet
pub const CSV_HEADER: [&str; 4] = ["agent_link", "agent_name", "homepage", "publication_link"];

/// Marker row separating fresh agents from newly published preprints
pub const PREPRINT_MARKER: &str = "NEWLY PUBLISHED PREPRINTS";

/// Year and month of a pub2tools run, used to name output files
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: u16,
    pub month: u8,
}

impl YearMonth {
    pub fn new(year: u16, month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// `2024_03`
    pub fn file_suffix(&self) -> String {
        format!("{}_{:02}", self.year, self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Parses `YYYY-MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got '{}'", s))?;
        let year = year.parse().map_err(|_| format!("invalid year in '{}'", s))?;
        let month = month.parse().map_err(|_| format!("invalid month in '{}'", s))?;
        YearMonth::new(year, month).ok_or_else(|| format!("month out of range in '{}'", s))
    }
}

/// How many fresh agents go into one curation sheet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurateLimit {
    All,
    Count(usize),
}

impl CurateLimit {
    fn apply(self, len: usize) -> usize {
        match self {
            CurateLimit::All => len,
            CurateLimit::Count(n) => n.min(len),
        }
    }
}

impl FromStr for CurateLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(CurateLimit::All);
        }
        s.parse()
            .map(CurateLimit::Count)
            .map_err(|_| format!("expected a number or 'all', got '{}'", s))
    }
}

/// Outcome of writing a curation sheet
#[derive(Debug)]
pub struct CurationExport {
    pub path: PathBuf,
    /// Agents written, fresh ones first
    pub exported: Vec<Agent>,
    /// Published agents beyond the limit, left for a later sheet
    pub leftover: Vec<Agent>,
}

/// Write `<dir>/pub2agents_<year>_<month>.csv`.
///
/// The sheet lists the first `limit` published agents, then a marker row,
/// then the preprints from earlier runs that have since been published.
pub fn write_curation_csv(
    published: Vec<Agent>,
    preprint_carryovers: Vec<Agent>,
    limit: CurateLimit,
    date: YearMonth,
    dir: &Path,
) -> Result<CurationExport, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("pub2agents_{}.csv", date.file_suffix()));

    let mut published = published;
    let leftover = published.split_off(limit.apply(published.len()));

    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(&path)?;
    writer.write_record(CSV_HEADER)?;
    for agent in &published {
        writer.write_record(row(agent))?;
    }
    writer.write_record([PREPRINT_MARKER])?;
    for agent in &preprint_carryovers {
        writer.write_record(row(agent))?;
    }
    writer.flush()?;

    info!(
        path = %path.display(),
        fresh = published.len(),
        carried_over = preprint_carryovers.len(),
        leftover = leftover.len(),
        "Wrote curation sheet"
    );

    let mut exported = published;
    exported.extend(preprint_carryovers);
    Ok(CurationExport {
        path,
        exported,
        leftover,
    })
}

fn row(agent: &Agent) -> [&str; 4] {
    [
        agent.agent_link.as_deref().unwrap_or_default(),
        agent.name.as_str(),
        agent.homepage.as_deref().unwrap_or_default(),
        agent.publication_link.as_deref().unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str) -> Agent {
        let mut agent = Agent::new(name);
        agent.agent_link = Some(format!("https://bio-agents-dev.sdu.dk/{}", name));
        agent.homepage = Some(format!("https://{}.org", name));
        agent.publication_link = Some(format!("https://doi.org/10.1/{}", name));
        agent
    }

    #[test]
    fn test_year_month_parse() {
        let date: YearMonth = "2024-3".parse().unwrap();
        assert_eq!(date.file_suffix(), "2024_03");
        assert_eq!(date.to_string(), "2024-03");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("202403".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_curate_limit_parse() {
        assert_eq!("all".parse::<CurateLimit>().unwrap(), CurateLimit::All);
        assert_eq!("25".parse::<CurateLimit>().unwrap(), CurateLimit::Count(25));
        assert!("some".parse::<CurateLimit>().is_err());
    }

    #[test]
    fn test_write_curation_csv() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_curation_csv(
            vec![agent("a"), agent("b"), agent("c")],
            vec![agent("p")],
            CurateLimit::Count(2),
            YearMonth::new(2024, 5).unwrap(),
            dir.path(),
        )
        .unwrap();

        assert!(export.path.ends_with("pub2agents_2024_05.csv"));
        let names: Vec<_> = export.exported.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "p"]);
        assert_eq!(export.leftover.len(), 1);
        assert_eq!(export.leftover[0].name, "c");

        let content = std::fs::read_to_string(&export.path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "agent_link,agent_name,homepage,publication_link");
        assert_eq!(
            lines[1],
            "https://bio-agents-dev.sdu.dk/a,a,https://a.org,https://doi.org/10.1/a"
        );
        assert_eq!(lines[3], PREPRINT_MARKER);
        assert!(lines[4].contains(",p,"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_limit_all_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let export = write_curation_csv(
            vec![agent("a"), agent("b")],
            vec![],
            CurateLimit::All,
            YearMonth::new(2023, 12).unwrap(),
            dir.path(),
        )
        .unwrap();
        assert_eq!(export.exported.len(), 2);
        assert!(export.leftover.is_empty());
    }
}
