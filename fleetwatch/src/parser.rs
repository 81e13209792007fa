//! Parser for the fixed-layout host-status report.
//!
//! The operator's health command prints `uptime`, a `top` CPU line, `free`
//! and `df` output back to back. Fields are picked by line position and
//! whitespace token, so the layout is a contract with that command:
//!
//! ```text
//! [1]  uptime string (verbatim)
//! [3]  "%Cpu(s):  12.5 us,  1.0 sy, ..."   -> first token after ':'
//! [6]  "Mem:  total  used  free ..."        -> used / total * 100
//! [10] "/dev/sda1  50G  22G  28G  45% /"    -> fifth token
//! ```

use thiserror::Error;

use crate::types::HostStatusSample;

const MIN_LINES: usize = 12;
const UPTIME_LINE: usize = 1;
const CPU_LINE: usize = 3;
const MEM_LINE: usize = 6;
const DISK_LINE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected output format")]
    UnexpectedFormat,
    #[error("unexpected CPU usage format")]
    CpuFormat,
    #[error("unexpected CPU usage fields")]
    CpuFields,
    #[error("unexpected memory usage fields")]
    MemoryFields,
    #[error("unexpected disk usage fields")]
    DiskFields,
    #[error("invalid {section} value \"{token}\"")]
    InvalidNumber { section: &'static str, token: String },
}

pub fn parse_host_status(output: &str) -> Result<HostStatusSample, ParseError> {
    let lines: Vec<&str> = output.split('\n').collect();
    if lines.len() < MIN_LINES {
        return Err(ParseError::UnexpectedFormat);
    }

    let uptime = lines[UPTIME_LINE].to_string();
    let cpu_pct = parse_cpu(lines[CPU_LINE])?;
    let mem_pct = parse_memory(lines[MEM_LINE])?;
    let disk_pct = parse_disk(lines[DISK_LINE])?;

    Ok(HostStatusSample {
        cpu_pct,
        mem_pct,
        disk_pct,
        uptime,
    })
}

fn parse_cpu(line: &str) -> Result<f64, ParseError> {
    let (_, rest) = line.split_once(':').ok_or(ParseError::CpuFormat)?;
    let fields: Vec<&str> = rest.split_whitespace().collect();
    if fields.len() < 8 {
        return Err(ParseError::CpuFields);
    }
    parse_number("CPU", strip_percent(fields[0]))
}

fn parse_memory(line: &str) -> Result<f64, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 7 {
        return Err(ParseError::MemoryFields);
    }
    let total = parse_number("memory", fields[1])?;
    let used = parse_number("memory", fields[2])?;
    if total <= 0.0 {
        return Err(ParseError::InvalidNumber {
            section: "memory",
            token: fields[1].to_string(),
        });
    }
    Ok(used / total * 100.0)
}

fn parse_disk(line: &str) -> Result<f64, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(ParseError::DiskFields);
    }
    parse_number("disk", strip_percent(fields[4]))
}

fn strip_percent(token: &str) -> &str {
    token.trim_matches(|c: char| c == '%' || c == ',')
}

fn parse_number(section: &'static str, token: &str) -> Result<f64, ParseError> {
    token.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        section,
        token: token.to_string(),
    })
}
