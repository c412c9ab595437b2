//! Mock implementations for testing
//!
//! A single in-memory host implements every collaborator trait. All clones
//! share state, so a test keeps one handle for inspection while the
//! controller owns the boxed copies.

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tmca_core::{Error, Result, ServiceInstance, ServiceKind};
use tmca_host::{
    BackupService, ConfigDocument, ConfigEditor, DialogKind, EditStatus, Filesystem, Host,
    Interaction, MessageLevel, SectionEdit, ServiceRegistry, SourceFetcher,
};

/// One node of the in-memory filesystem
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Dir,
    File(String),
    Link(Utf8PathBuf),
}

/// Collaborator operations that can be made to fail
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Discover,
    Stop,
    Start,
    Restart,
    Symlink,
    Remove,
    CopyFile,
    Clone,
    Pull,
    AddSection,
    RemoveSection,
    BackupFile,
    BackupDirectory,
}

/// Record of one collaborator invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Discover(ServiceKind),
    Stop(Vec<String>),
    Start(Vec<String>),
    Restart(Vec<String>),
    Symlink { target: Utf8PathBuf, link: Utf8PathBuf },
    Remove(Utf8PathBuf),
    CopyFile { src: Utf8PathBuf, dest: Utf8PathBuf },
    Clone { url: String, dest: Utf8PathBuf, force: bool },
    Pull(Utf8PathBuf),
    AddSection { section: String, files: Vec<Utf8PathBuf> },
    RemoveSection { section: String, files: Vec<Utf8PathBuf> },
    BackupFile(Utf8PathBuf),
    BackupDirectory(Utf8PathBuf),
    Confirm(String),
    Dialog(DialogKind, Vec<String>),
    Notify(MessageLevel, String),
    Progress(String),
    ProgressDone,
}

impl Call {
    /// True for calls that change the host (files, configs or services)
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Stop(_)
                | Call::Start(_)
                | Call::Restart(_)
                | Call::Symlink { .. }
                | Call::Remove(_)
                | Call::CopyFile { .. }
                | Call::Clone { .. }
                | Call::Pull(_)
                | Call::AddSection { .. }
                | Call::RemoveSection { .. }
                | Call::BackupFile(_)
                | Call::BackupDirectory(_)
        )
    }

    pub fn is_service_control(&self) -> bool {
        matches!(self, Call::Stop(_) | Call::Start(_) | Call::Restart(_))
    }

    pub fn is_prompt(&self) -> bool {
        matches!(self, Call::Confirm(_))
    }
}

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<Utf8PathBuf, Entry>,
    klipper: Vec<ServiceInstance>,
    moonraker: Vec<ServiceInstance>,
    /// Artifacts a fresh clone contains, relative to the clone destination
    repo_files: Vec<(String, String)>,
    /// (question fragment, answer); unmatched questions take their default
    answers: Vec<(String, bool)>,
    /// (operation, path fragment); an empty fragment matches everything
    failures: Vec<(Op, String)>,
    calls: Vec<Call>,
    backups: usize,
}

/// Shared in-memory host
#[derive(Clone, Debug, Default)]
pub struct MockHost {
    state: Arc<Mutex<State>>,
}

fn units(instances: &[ServiceInstance]) -> Vec<String> {
    instances.iter().map(|i| i.unit_name()).collect()
}

fn injected(op: Op, subject: &str) -> Error {
    Error::command_failed(
        format!("{:?} {}", op, subject),
        "exit status: 1",
        "injected failure",
    )
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Box one clone per collaborator
    pub fn host(&self) -> Host {
        Host {
            services: Box::new(self.clone()),
            fs: Box::new(self.clone()),
            fetcher: Box::new(self.clone()),
            editor: Box::new(self.clone()),
            backup: Box::new(self.clone()),
            ui: Box::new(self.clone()),
        }
    }

    // Setup

    pub fn add_dir(&self, path: impl Into<Utf8PathBuf>) {
        self.lock().entries.insert(path.into(), Entry::Dir);
    }

    pub fn add_file(&self, path: impl Into<Utf8PathBuf>, content: &str) {
        self.lock()
            .entries
            .insert(path.into(), Entry::File(content.to_string()));
    }

    pub fn add_link(&self, link: impl Into<Utf8PathBuf>, target: impl Into<Utf8PathBuf>) {
        self.lock()
            .entries
            .insert(link.into(), Entry::Link(target.into()));
    }

    pub fn add_instance(&self, instance: ServiceInstance) {
        let mut state = self.lock();
        match instance.kind {
            ServiceKind::Klipper => state.klipper.push(instance),
            ServiceKind::Moonraker => state.moonraker.push(instance),
        }
    }

    pub fn add_repo_file(&self, relative: &str, content: &str) {
        self.lock()
            .repo_files
            .push((relative.to_string(), content.to_string()));
    }

    /// Answer every question containing `fragment` with `answer`
    pub fn answer(&self, fragment: &str, answer: bool) {
        self.lock().answers.push((fragment.to_string(), answer));
    }

    /// Make `op` fail whenever its subject contains `fragment`
    pub fn fail(&self, op: Op, fragment: &str) {
        self.lock().failures.push((op, fragment.to_string()));
    }

    fn check(&self, op: Op, subject: &str) -> Result<()> {
        let failing = self
            .lock()
            .failures
            .iter()
            .any(|(o, f)| *o == op && subject.contains(f.as_str()));
        if failing {
            Err(injected(op, subject))
        } else {
            Ok(())
        }
    }

    fn record(&self, call: Call) {
        self.lock().calls.push(call);
    }

    // Inspection

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Confirm(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Notify(level, message) => Some((level, message)),
                _ => None,
            })
            .collect()
    }

    pub fn dialogs(&self) -> Vec<(DialogKind, Vec<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Dialog(kind, lines) => Some((kind, lines)),
                _ => None,
            })
            .collect()
    }

    pub fn entry(&self, path: impl AsRef<Utf8Path>) -> Option<Entry> {
        self.lock().entries.get(path.as_ref()).cloned()
    }

    pub fn has(&self, path: impl AsRef<Utf8Path>) -> bool {
        self.entry(path).is_some()
    }

    pub fn read(&self, path: impl AsRef<Utf8Path>) -> Option<String> {
        match self.entry(path) {
            Some(Entry::File(content)) => Some(content),
            _ => None,
        }
    }

    /// All symlinks and their targets, sorted by link path
    pub fn links(&self) -> Vec<(Utf8PathBuf, Utf8PathBuf)> {
        self.lock()
            .entries
            .iter()
            .filter_map(|(path, entry)| match entry {
                Entry::Link(target) => Some((path.clone(), target.clone())),
                _ => None,
            })
            .collect()
    }

    fn edit_sections<F>(&self, instances: &[ServiceInstance], apply: F) -> Vec<SectionEdit>
    where
        F: Fn(&mut ConfigDocument) -> bool,
    {
        let mut state = self.lock();
        instances
            .iter()
            .map(|instance| {
                let path = instance.cfg_file();
                let status = match state.entries.get_mut(&path) {
                    Some(Entry::File(content)) => {
                        let mut doc = ConfigDocument::parse(content);
                        if apply(&mut doc) {
                            *content = doc.render();
                            EditStatus::Changed
                        } else {
                            EditStatus::Unchanged
                        }
                    }
                    _ => EditStatus::MissingFile,
                };
                SectionEdit { path, status }
            })
            .collect()
    }
}

impl ServiceRegistry for MockHost {
    fn discover(&self, kind: ServiceKind) -> Result<Vec<ServiceInstance>> {
        self.record(Call::Discover(kind));
        self.check(Op::Discover, kind.unit_prefix())?;
        let state = self.lock();
        Ok(match kind {
            ServiceKind::Klipper => state.klipper.clone(),
            ServiceKind::Moonraker => state.moonraker.clone(),
        })
    }

    fn stop_all(&self, instances: &[ServiceInstance]) -> Result<()> {
        self.record(Call::Stop(units(instances)));
        self.check(Op::Stop, &units(instances).join(" "))
    }

    fn start_all(&self, instances: &[ServiceInstance]) -> Result<()> {
        self.record(Call::Start(units(instances)));
        self.check(Op::Start, &units(instances).join(" "))
    }

    fn restart_all(&self, instances: &[ServiceInstance]) -> Result<()> {
        self.record(Call::Restart(units(instances)));
        self.check(Op::Restart, &units(instances).join(" "))
    }
}

impl Filesystem for MockHost {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.has(path)
    }

    fn symlink(&self, target: &Utf8Path, link: &Utf8Path) -> Result<()> {
        self.record(Call::Symlink {
            target: target.to_path_buf(),
            link: link.to_path_buf(),
        });
        self.check(Op::Symlink, link.as_str())?;
        self.add_link(link, target);
        Ok(())
    }

    fn remove(&self, path: &Utf8Path) -> Result<()> {
        self.record(Call::Remove(path.to_path_buf()));
        self.check(Op::Remove, path.as_str())?;
        self.lock()
            .entries
            .retain(|p, _| !(p == path || p.starts_with(path)));
        Ok(())
    }

    fn copy_file(&self, src: &Utf8Path, dest: &Utf8Path) -> Result<()> {
        self.record(Call::CopyFile {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
        });
        self.check(Op::CopyFile, dest.as_str())?;
        let content = self
            .read(src)
            .ok_or_else(|| Error::Io(std::io::Error::from(std::io::ErrorKind::NotFound)))?;
        self.add_file(dest, &content);
        Ok(())
    }
}

impl SourceFetcher for MockHost {
    fn clone_repo(&self, url: &str, dest: &Utf8Path, force: bool) -> Result<()> {
        self.record(Call::Clone {
            url: url.to_string(),
            dest: dest.to_path_buf(),
            force,
        });
        self.check(Op::Clone, dest.as_str())?;

        let mut state = self.lock();
        if state.entries.contains_key(dest) {
            if !force {
                return Err(Error::path_exists(dest.as_str()));
            }
            state
                .entries
                .retain(|p, _| !(p == dest || p.starts_with(dest)));
        }
        state.entries.insert(dest.to_path_buf(), Entry::Dir);
        let files = state.repo_files.clone();
        for (relative, content) in files {
            state.entries.insert(dest.join(relative), Entry::File(content));
        }
        Ok(())
    }

    fn pull(&self, dest: &Utf8Path) -> Result<()> {
        self.record(Call::Pull(dest.to_path_buf()));
        self.check(Op::Pull, dest.as_str())
    }
}

impl ConfigEditor for MockHost {
    fn add_section(
        &self,
        section: &str,
        instances: &[ServiceInstance],
        options: &[(String, String)],
    ) -> Result<Vec<SectionEdit>> {
        self.record(Call::AddSection {
            section: section.to_string(),
            files: instances.iter().map(|i| i.cfg_file()).collect(),
        });
        self.check(Op::AddSection, section)?;
        Ok(self.edit_sections(instances, |doc| doc.add_section(section, options)))
    }

    fn remove_section(
        &self,
        section: &str,
        instances: &[ServiceInstance],
    ) -> Result<Vec<SectionEdit>> {
        self.record(Call::RemoveSection {
            section: section.to_string(),
            files: instances.iter().map(|i| i.cfg_file()).collect(),
        });
        self.check(Op::RemoveSection, section)?;
        Ok(self.edit_sections(instances, |doc| doc.remove_section(section)))
    }

    fn has_section(&self, section: &str, instance: &ServiceInstance) -> Result<bool> {
        Ok(self
            .read(instance.cfg_file())
            .is_some_and(|content| ConfigDocument::parse(&content).has_section(section)))
    }
}

impl BackupService for MockHost {
    fn backup_file(&self, src: &Utf8Path, dest_dir: &str, dest_name: &str) -> Result<Utf8PathBuf> {
        self.record(Call::BackupFile(src.to_path_buf()));
        self.check(Op::BackupFile, src.as_str())?;
        let mut state = self.lock();
        state.backups += 1;
        Ok(Utf8PathBuf::from(format!(
            "/backups/{}/{}.{}",
            dest_dir, dest_name, state.backups
        )))
    }

    fn backup_directory(&self, src: &Utf8Path, name: &str) -> Result<Utf8PathBuf> {
        self.record(Call::BackupDirectory(src.to_path_buf()));
        self.check(Op::BackupDirectory, src.as_str())?;
        let mut state = self.lock();
        state.backups += 1;
        Ok(Utf8PathBuf::from(format!(
            "/backups/{}/{}.{}",
            name, name, state.backups
        )))
    }
}

impl Interaction for MockHost {
    fn confirm(&self, question: &str, default: bool, _allow_back: bool) -> Result<bool> {
        self.record(Call::Confirm(question.to_string()));
        let state = self.lock();
        Ok(state
            .answers
            .iter()
            .find(|(fragment, _)| question.contains(fragment.as_str()))
            .map(|(_, answer)| *answer)
            .unwrap_or(default))
    }

    fn dialog(&self, kind: DialogKind, lines: &[String]) {
        self.record(Call::Dialog(kind, lines.to_vec()));
    }

    fn notify(&self, level: MessageLevel, message: &str) {
        self.record(Call::Notify(level, message.to_string()));
    }

    fn with_progress(&self, message: &str, task: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        self.record(Call::Progress(message.to_string()));
        let result = task();
        self.record(Call::ProgressDone);
        result
    }
}
