//! Line-oriented editor for Klipper and Moonraker config files
//!
//! Only section headers are interpreted. Lines outside the edited section,
//! the file's line ending (LF or CRLF) and its final newline are kept as
//! they were. Klipper appends an
//! auto-generated `#*# <---------------------- SAVE_CONFIG ---------------------->`
//! block to printer.cfg which must stay last, so new sections are inserted
//! above it.

use camino::Utf8Path;
use std::fs;
use tmca_core::{Error, Result, ServiceInstance};
use tracing::{debug, warn};

use crate::traits::{ConfigEditor, EditStatus, SectionEdit};

const SAVE_CONFIG_MARKER: &str = "#*#";

/// In-memory view of a config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    lines: Vec<String>,
    newline: &'static str,
    final_newline: bool,
}

impl ConfigDocument {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
            newline: if content.contains("\r\n") { "\r\n" } else { "\n" },
            final_newline: content.is_empty() || content.ends_with('\n'),
        }
    }

    /// Section name of a header line, `[name]` with optional trailing comment
    fn header_name(line: &str) -> Option<&str> {
        let line = line.trim_start();
        let rest = line.strip_prefix('[')?;
        let end = rest.find(']')?;
        let tail = rest[end + 1..].trim_start();
        if !(tail.is_empty() || tail.starts_with('#') || tail.starts_with(';')) {
            return None;
        }
        Some(rest[..end].trim())
    }

    fn is_boundary(line: &str) -> bool {
        Self::header_name(line).is_some() || line.starts_with(SAVE_CONFIG_MARKER)
    }

    fn find_section(&self, name: &str) -> Option<usize> {
        self.lines
            .iter()
            .take(self.save_config_start())
            .position(|l| Self::header_name(l) == Some(name))
    }

    /// Index of the first SAVE_CONFIG line, or the line count
    fn save_config_start(&self) -> usize {
        self.lines
            .iter()
            .position(|l| l.starts_with(SAVE_CONFIG_MARKER))
            .unwrap_or(self.lines.len())
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.find_section(name).is_some()
    }

    /// Add `[name]` with `options`; returns false if the section already exists
    pub fn add_section(&mut self, name: &str, options: &[(String, String)]) -> bool {
        if self.has_section(name) {
            return false;
        }

        let mut insert_at = self.save_config_start();
        while insert_at > 0 && self.lines[insert_at - 1].trim().is_empty() {
            insert_at -= 1;
        }

        let mut block = Vec::with_capacity(options.len() + 3);
        if insert_at > 0 {
            block.push(String::new());
        }
        block.push(format!("[{}]", name));
        block.extend(options.iter().map(|(k, v)| format!("{}: {}", k, v)));
        if self
            .lines
            .get(insert_at)
            .is_some_and(|l| !l.trim().is_empty())
        {
            block.push(String::new());
        }

        self.lines.splice(insert_at..insert_at, block);
        true
    }

    /// Remove `[name]` and its body; returns false if the section was absent
    pub fn remove_section(&mut self, name: &str) -> bool {
        let Some(start) = self.find_section(name) else {
            return false;
        };

        let end = self.lines[start + 1..]
            .iter()
            .position(|l| Self::is_boundary(l))
            .map(|offset| start + 1 + offset)
            .unwrap_or(self.lines.len());
        let was_last = end == self.lines.len();

        self.lines.drain(start..end);

        // collapse the blank run left at the seam
        while start > 0
            && start < self.lines.len()
            && self.lines[start - 1].trim().is_empty()
            && self.lines[start].trim().is_empty()
        {
            self.lines.remove(start);
        }
        // the separator above a trailing section would otherwise dangle
        if was_last {
            while self.lines.last().is_some_and(|l| l.trim().is_empty()) {
                self.lines.pop();
            }
        }
        true
    }

    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join(self.newline);
        if self.final_newline {
            out.push_str(self.newline);
        }
        out
    }
}

/// [`ConfigEditor`] rewriting each instance's primary config file in place
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionConfigEditor;

impl SectionConfigEditor {
    pub fn new() -> Self {
        Self
    }

    fn edit<F>(&self, section: &str, path: &Utf8Path, apply: F) -> Result<SectionEdit>
    where
        F: FnOnce(&mut ConfigDocument) -> bool,
    {
        if !path.is_file() {
            warn!("Config file {} not found, skipping [{}]", path, section);
            return Ok(SectionEdit {
                path: path.to_path_buf(),
                status: EditStatus::MissingFile,
            });
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::section_edit(section, path.as_str(), e.to_string()))?;
        let mut doc = ConfigDocument::parse(&content);

        let status = if apply(&mut doc) {
            fs::write(path, doc.render())
                .map_err(|e| Error::section_edit(section, path.as_str(), e.to_string()))?;
            debug!("Updated [{}] in {}", section, path);
            EditStatus::Changed
        } else {
            EditStatus::Unchanged
        };

        Ok(SectionEdit {
            path: path.to_path_buf(),
            status,
        })
    }
}

impl ConfigEditor for SectionConfigEditor {
    fn add_section(
        &self,
        section: &str,
        instances: &[ServiceInstance],
        options: &[(String, String)],
    ) -> Result<Vec<SectionEdit>> {
        instances
            .iter()
            .map(|i| self.edit(section, &i.cfg_file(), |doc| doc.add_section(section, options)))
            .collect()
    }

    fn remove_section(
        &self,
        section: &str,
        instances: &[ServiceInstance],
    ) -> Result<Vec<SectionEdit>> {
        instances
            .iter()
            .map(|i| self.edit(section, &i.cfg_file(), |doc| doc.remove_section(section)))
            .collect()
    }

    fn has_section(&self, section: &str, instance: &ServiceInstance) -> Result<bool> {
        let path = instance.cfg_file();
        if !path.is_file() {
            return Ok(false);
        }
        let content = fs::read_to_string(&path)?;
        Ok(ConfigDocument::parse(&content).has_section(section))
    }
}
