//! Plan command implementation
//!
//! Dry run: parses a length and markers and prints the proposed sections.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use chordloom_spec::Section;

use super::json_output::{print_json, JsonError, PlanOutput};
use crate::controls::{format_mss, parse_duration, parse_markers, Marker};
use crate::planner::propose_sections;

/// Run the plan command
///
/// # Arguments
/// * `length` - Song length (`60`, `60s`, `1m30s`, `1:30`)
/// * `markers` - Repeated `time:label` markers
/// * `json_output` - Whether to print JSON instead of tables
///
/// # Returns
/// Exit code: 0 success, 1 invalid input
pub fn run(length: &str, markers: &[String], json_output: bool) -> Result<ExitCode> {
    let planned = parse_duration(length).and_then(|total| {
        let markers = parse_markers(markers)?;
        Ok((total, markers))
    });

    if json_output {
        let output = match planned {
            Ok((total, markers)) => PlanOutput {
                success: true,
                errors: Vec::new(),
                length_sec: Some(total),
                sections: propose_sections(total),
                markers,
            },
            Err(e) => PlanOutput {
                success: false,
                errors: vec![JsonError::from_anyhow(&e.into())],
                length_sec: None,
                sections: Vec::new(),
                markers: Vec::new(),
            },
        };
        print_json(&output)?;
        return Ok(if output.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    let (total, markers) = planned?;
    print_sections(&propose_sections(total));
    if !markers.is_empty() {
        print_markers(&markers);
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints a section table.
pub(crate) fn print_sections(sections: &[Section]) {
    println!("{}", "Planned Sections".cyan().bold());
    println!("  {:<14} {:>6} {:>6}", "Section".dimmed(), "Start".dimmed(), "End".dimmed());
    for s in sections {
        println!(
            "  {:<14} {:>6} {:>6}",
            s.name,
            format_mss(s.start_sec as u32),
            format_mss(s.end_sec as u32)
        );
    }
}

fn print_markers(markers: &[Marker]) {
    println!("\n{}", "Markers".cyan().bold());
    for m in markers {
        println!("  {}  {}", format_mss(m.time_sec), m.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_ok() {
        let code = run("1:30", &["30:motif".to_string()], true).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_plan_bad_length_json() {
        let code = run("soon", &[], true).unwrap();
        assert_eq!(code, ExitCode::from(1));
    }

    #[test]
    fn test_plan_bad_length_human_is_error() {
        assert!(run("soon", &[], false).is_err());
    }
}
