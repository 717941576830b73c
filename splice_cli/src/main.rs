//! # Splice CLI Application
//!
//! Command-line front end over `.sgp` project files.
//!
//! ```text
//! splice_cli new <file> <pier station>...
//! splice_cli show <file>
//! splice_cli add-support <file> <station> [tower|strongback]
//! splice_cli split <file> pier|ts <id>
//! splice_cli join <file> pier|ts <id>
//! ```
//!
//! Results are printed to stdout as JSON. Errors are printed to stderr as the
//! structured `GirderError` JSON with a non-zero exit status.

mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;
use splice_core::bridge::TemporarySupportKind;
use splice_core::closure::ClosureSupport;
use splice_core::errors::{GirderError, GirderResult};
use splice_core::file_io::{load_project, save_project};
use splice_core::girder::SplicedGirder;
use splice_core::ids::{PierId, SpanIndex, TemporarySupportId};
use splice_core::project::{FramingEdit, SplicedProject};
use splice_core::segment::SegmentEnd;
use tracing::info;
use uuid::Uuid;

const USAGE: &str = "usage:
  splice_cli new <file> <pier station>...
  splice_cli show <file>
  splice_cli add-support <file> <station> [tower|strongback]
  splice_cli split <file> pier|ts <id>
  splice_cli join <file> pier|ts <id>";

#[derive(Debug)]
enum Command {
    New { path: PathBuf, stations_ft: Vec<f64> },
    Show { path: PathBuf },
    AddSupport { path: PathBuf, station_ft: f64, kind: TemporarySupportKind },
    Edit { path: PathBuf, edit: FramingEdit },
}

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match run(command) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let json = serde_json::to_string_pretty(&e).unwrap_or_else(|_| e.to_string());
            eprintln!("{}", json);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Argument parsing
// ============================================================================

fn parse_args(args: &[String]) -> GirderResult<Command> {
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| GirderError::invalid_input("command", "", "No command given"))?;
    let path = rest
        .first()
        .map(PathBuf::from)
        .ok_or_else(|| GirderError::invalid_input("file", "", "No project file given"))?;
    let operands = &rest[1..];

    match name.as_str() {
        "new" => {
            let stations_ft = operands
                .iter()
                .map(|s| parse_number("station", s))
                .collect::<GirderResult<Vec<f64>>>()?;
            if stations_ft.len() < 2 {
                return Err(GirderError::invalid_input(
                    "stations",
                    operands.join(" "),
                    "A girder needs at least two piers",
                ));
            }
            Ok(Command::New { path, stations_ft })
        }
        "show" => Ok(Command::Show { path }),
        "add-support" => {
            let station = operands
                .first()
                .ok_or_else(|| GirderError::invalid_input("station", "", "No station given"))?;
            let kind = match operands.get(1).map(String::as_str) {
                None | Some("tower") => TemporarySupportKind::ErectionTower,
                Some("strongback") => TemporarySupportKind::StrongBack,
                Some(other) => {
                    return Err(GirderError::invalid_input("kind", other, "Expected 'tower' or 'strongback'"));
                }
            };
            Ok(Command::AddSupport {
                path,
                station_ft: parse_number("station", station)?,
                kind,
            })
        }
        "split" | "join" => {
            let support = parse_support(operands)?;
            let edit = if name == "split" {
                FramingEdit::SplitAt(support)
            } else {
                FramingEdit::JoinAt(support)
            };
            Ok(Command::Edit { path, edit })
        }
        other => Err(GirderError::invalid_input("command", other, "Unknown command")),
    }
}

fn parse_number(field: &str, text: &str) -> GirderResult<f64> {
    text.parse::<f64>()
        .map_err(|_| GirderError::invalid_input(field, text, "Expected a number"))
}

fn parse_support(operands: &[String]) -> GirderResult<ClosureSupport> {
    let (kind, id) = match operands {
        [kind, id, ..] => (kind.as_str(), id.as_str()),
        _ => return Err(GirderError::invalid_input("support", operands.join(" "), "Expected 'pier <id>' or 'ts <id>'")),
    };
    let id: u64 = id
        .parse()
        .map_err(|_| GirderError::invalid_input("support id", id, "Expected an integer"))?;
    match kind {
        "pier" => Ok(ClosureSupport::Pier(PierId(id))),
        "ts" => Ok(ClosureSupport::TemporarySupport(TemporarySupportId(id))),
        other => Err(GirderError::invalid_input("support kind", other, "Expected 'pier' or 'ts'")),
    }
}

// ============================================================================
// Commands
// ============================================================================

fn run(command: Command) -> GirderResult<String> {
    match command {
        Command::New { path, stations_ft } => {
            let mut project = SplicedProject::default();
            let mut piers = Vec::with_capacity(stations_ft.len());
            for station in stations_ft {
                piers.push(project.bridge.add_pier(station)?);
            }
            let first = project.bridge.piers().first().map(|p| p.id);
            let last = project.bridge.piers().last().map(|p| p.id);
            if let (Some(first), Some(last)) = (first, last) {
                project.add_girder(first, last);
            }
            save_project(&project, &path)?;
            info!(path = %path.display(), piers = piers.len(), "project created");
            to_json(&summarize(&project))
        }
        Command::Show { path } => {
            let project = load_project(&path)?;
            to_json(&summarize(&project))
        }
        Command::AddSupport {
            path,
            station_ft,
            kind,
        } => {
            let mut project = load_project(&path)?;
            let id = project.bridge.add_temporary_support(station_ft, kind)?;
            project.touch();
            save_project(&project, &path)?;
            to_json(&serde_json::json!({ "temporary_support": id, "station_ft": station_ft }))
        }
        Command::Edit { path, edit } => edit_project(&path, edit),
    }
}

fn edit_project(path: &Path, edit: FramingEdit) -> GirderResult<String> {
    let mut project = load_project(path)?;
    let report = project.apply_framing_edit(edit)?;
    if !report.edited.is_empty() {
        save_project(&project, path)?;
    }
    to_json(&report)
}

fn to_json<T: Serialize>(value: &T) -> GirderResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| GirderError::SerializationError { reason: e.to_string() })
}

// ============================================================================
// Summaries
// ============================================================================

#[derive(Debug, Serialize)]
struct GirderSummary {
    id: Uuid,
    length_ft: Option<f64>,
    segments: Vec<SegmentSummary>,
    closures: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SegmentSummary {
    id: u64,
    variation: &'static str,
    length_ft: Option<f64>,
    start_height_ft: Option<f64>,
    end_height_ft: Option<f64>,
    span_start: Option<SpanIndex>,
    span_end: Option<SpanIndex>,
    start_support: Option<String>,
    end_support: Option<String>,
}

fn summarize(project: &SplicedProject) -> Vec<GirderSummary> {
    project
        .girder_ids()
        .into_iter()
        .filter_map(|id| project.get_girder(&id).map(|g| summarize_girder(id, g, project)))
        .collect()
}

fn summarize_girder(id: Uuid, girder: &SplicedGirder, project: &SplicedProject) -> GirderSummary {
    let segments = girder
        .segments()
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let length_ft = girder.segment_length(i, &project.bridge);
            let ends = length_ft.and_then(|l| segment.profile.end_depths(l).ok());
            SegmentSummary {
                id: segment.id.0,
                variation: segment.profile.variation.name(),
                length_ft,
                start_height_ft: ends.map(|(start, _)| start.height_ft),
                end_height_ft: ends.map(|(_, end)| end.height_ft),
                span_start: segment.span_start,
                span_end: segment.span_end,
                start_support: girder.segment_support(i, SegmentEnd::Start).map(|s| s.to_string()),
                end_support: girder.segment_support(i, SegmentEnd::End).map(|s| s.to_string()),
            }
        })
        .collect();

    GirderSummary {
        id,
        length_ft: girder.length(&project.bridge),
        segments,
        closures: girder.closures().iter().map(|c| c.support.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_new() {
        match parse_args(&args(&["new", "bridge.sgp", "0", "150", "300"])).unwrap() {
            Command::New { path, stations_ft } => {
                assert_eq!(path, PathBuf::from("bridge.sgp"));
                assert_eq!(stations_ft, vec![0.0, 150.0, 300.0]);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(parse_args(&args(&["new", "bridge.sgp", "0"])).is_err());
    }

    #[test]
    fn test_parse_edits() {
        match parse_args(&args(&["split", "bridge.sgp", "ts", "3"])).unwrap() {
            Command::Edit { edit, .. } => {
                assert_eq!(edit, FramingEdit::split_at_temporary_support(TemporarySupportId(3)))
            }
            other => panic!("unexpected command {:?}", other),
        }
        match parse_args(&args(&["join", "bridge.sgp", "pier", "1"])).unwrap() {
            Command::Edit { edit, .. } => assert_eq!(edit, FramingEdit::join_at_pier(PierId(1))),
            other => panic!("unexpected command {:?}", other),
        }
        assert!(parse_args(&args(&["split", "bridge.sgp", "abutment", "1"])).is_err());
        assert!(parse_args(&args(&["split", "bridge.sgp", "pier"])).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        let err = parse_args(&args(&["explode", "bridge.sgp"])).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn test_summary_reports_segments() {
        let mut project = SplicedProject::default();
        for station in [0.0, 100.0, 200.0] {
            project.bridge.add_pier(station).unwrap();
        }
        project.add_girder(PierId(0), PierId(2));
        project
            .apply_framing_edit(FramingEdit::split_at_pier(PierId(1)))
            .unwrap();

        let summary = summarize(&project);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].length_ft, Some(200.0));
        assert_eq!(summary[0].closures, vec!["Pier 1".to_string()]);
        let lengths: Vec<_> = summary[0].segments.iter().map(|s| s.length_ft).collect();
        assert_eq!(lengths, vec![Some(100.0), Some(100.0)]);
        assert_eq!(summary[0].segments[1].start_support.as_deref(), Some("Pier 1"));
    }
}
