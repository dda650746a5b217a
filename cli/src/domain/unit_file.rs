//! systemd unit generation. Pure functions without I/O.
//!
//! Each function accepts descriptor data and returns a `String` containing
//! the unit content. The caller is responsible for writing to disk.

#![allow(clippy::format_push_string)]

use crate::domain::error::DescriptorError;
use crate::domain::project::{ProjectDescriptor, ProjectKind};

/// Fields of a generated service unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceUnit {
    pub description: String,
    pub working_directory: String,
    pub exec_start: String,
    /// `None` for job services, which are pulled in by their timer.
    pub wanted_by: Option<String>,
    pub oneshot: bool,
}

impl ServiceUnit {
    /// Build the service unit for a descriptor whose remote paths are known.
    ///
    /// # Errors
    ///
    /// Returns `DescriptorError::PathsNotDiscovered` if path discovery has not run.
    pub fn from_descriptor(d: &ProjectDescriptor) -> Result<Self, DescriptorError> {
        let (_, shell) = d.discovered_paths()?;
        let working_directory = d.remote_project_dir();
        let oneshot = d.kind == ProjectKind::Job;
        Ok(Self {
            description: description_for(d),
            exec_start: format!("{shell} -c '{}'", d.remote_entry_point()),
            working_directory,
            wanted_by: (!oneshot).then(|| d.privilege_mode().wanted_by().to_string()),
            oneshot,
        })
    }

    /// Render as unit-file text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("[Unit]\n");
        out.push_str(&format!("Description={}\n", self.description));
        out.push('\n');
        out.push_str("[Service]\n");
        if self.oneshot {
            out.push_str("Type=oneshot\n");
        } else {
            out.push_str("Type=simple\n");
            out.push_str("Restart=always\n");
            out.push_str("RestartSec=1\n");
        }
        out.push_str(&format!("WorkingDirectory={}\n", self.working_directory));
        out.push_str(&format!("ExecStart={}\n", self.exec_start));
        if let Some(target) = &self.wanted_by {
            out.push('\n');
            out.push_str("[Install]\n");
            out.push_str(&format!("WantedBy={target}\n"));
        }
        out
    }

    /// Recover the recognised fields from unit-file text.
    ///
    /// Only `Description`, `WorkingDirectory`, `ExecStart`, `Type` and
    /// `WantedBy` are read; other keys and section headers are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut unit = Self::default();
        for (key, value) in unit_entries(text) {
            match key {
                "Description" => unit.description = value.to_string(),
                "WorkingDirectory" => unit.working_directory = value.to_string(),
                "ExecStart" => unit.exec_start = value.to_string(),
                "Type" => unit.oneshot = value == "oneshot",
                "WantedBy" => unit.wanted_by = Some(value.to_string()),
                _ => {}
            }
        }
        unit
    }
}

/// Fields of a generated timer unit (jobs only).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimerUnit {
    pub description: String,
    pub on_calendar: String,
    pub unit: String,
}

impl TimerUnit {
    /// Build the timer for a job descriptor; `None` for servers.
    #[must_use]
    pub fn from_descriptor(d: &ProjectDescriptor) -> Option<Self> {
        d.timer_unit()?;
        Some(Self {
            description: format!("Schedule for {}", description_for(d)),
            on_calendar: d.schedule.clone().unwrap_or_default(),
            unit: d.service_unit(),
        })
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("[Unit]\n");
        out.push_str(&format!("Description={}\n", self.description));
        out.push('\n');
        out.push_str("[Timer]\n");
        out.push_str(&format!("OnCalendar={}\n", self.on_calendar));
        out.push_str("Persistent=true\n");
        out.push_str(&format!("Unit={}\n", self.unit));
        out.push('\n');
        out.push_str("[Install]\n");
        out.push_str("WantedBy=timers.target\n");
        out
    }

    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut timer = Self::default();
        for (key, value) in unit_entries(text) {
            match key {
                "Description" => timer.description = value.to_string(),
                "OnCalendar" => timer.on_calendar = value.to_string(),
                "Unit" => timer.unit = value.to_string(),
                _ => {}
            }
        }
        timer
    }
}

/// A generated unit file ready to be written locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Installed file name, e.g. `asyd-api.service`.
    pub file_name: String,
    pub contents: String,
}

/// Generate every unit file a project installs, service first.
///
/// # Errors
///
/// Returns `DescriptorError::PathsNotDiscovered` if path discovery has not run.
pub fn generate(d: &ProjectDescriptor) -> Result<Vec<GeneratedUnit>, DescriptorError> {
    let mut units = vec![GeneratedUnit {
        file_name: d.service_unit(),
        contents: ServiceUnit::from_descriptor(d)?.render(),
    }];
    if let (Some(name), Some(timer)) = (d.timer_unit(), TimerUnit::from_descriptor(d)) {
        units.push(GeneratedUnit {
            file_name: name,
            contents: timer.render(),
        });
    }
    Ok(units)
}

fn description_for(d: &ProjectDescriptor) -> String {
    if d.description.trim().is_empty() {
        format!("asyd project {}", d.name)
    } else {
        d.description.clone()
    }
}

fn unit_entries(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.starts_with('[') && !l.starts_with('#') && !l.starts_with(';'))
        .filter_map(|l| l.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
}
