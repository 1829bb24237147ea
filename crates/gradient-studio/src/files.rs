use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use gradient_core::config::{CONFIG_DESCRIPTION, CONFIG_EXTENSION, SUGGESTED_CONFIG_NAME};
use gradient_core::export::SUGGESTED_EXPORT_NAME;
use gradient_core::{read_config, write_config, ExportFormat, Stop, StopCollection};

/// One entry of a dialog's type filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub description: &'static str,
    pub extensions: &'static [&'static str],
}

/// What a save dialog should look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub title: &'static str,
    pub suggested_name: &'static str,
    pub filters: Vec<FileFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub title: &'static str,
    pub filters: Vec<FileFilter>,
}

/// Source of user-chosen paths. `None` means the user cancelled.
pub trait FilePicker {
    fn pick_save_destination(&mut self, request: &SaveRequest) -> Option<PathBuf>;
    fn pick_load_source(&mut self, request: &LoadRequest) -> Option<PathBuf>;
}

/// Native dialogs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogPicker;

impl FilePicker for DialogPicker {
    fn pick_save_destination(&mut self, request: &SaveRequest) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .set_title(request.title)
            .set_file_name(request.suggested_name);
        for filter in &request.filters {
            dialog = dialog.add_filter(filter.description, filter.extensions);
        }
        dialog.save_file()
    }

    fn pick_load_source(&mut self, request: &LoadRequest) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title(request.title);
        for filter in &request.filters {
            dialog = dialog.add_filter(filter.description, filter.extensions);
        }
        dialog.pick_file()
    }
}

/// A chosen export destination. The format follows the chosen extension.
pub struct ExportDestination {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub sink: ExportSink,
}

/// Writer that creates its file on the first write.
///
/// An export that fails before encoding, or is superseded, never touches
/// the existing file at `path`.
pub struct ExportSink {
    path: PathBuf,
    file: Option<BufWriter<File>>,
}

impl ExportSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    fn file(&mut self) -> io::Result<&mut BufWriter<File>> {
        let file = match self.file.take() {
            Some(file) => file,
            None => BufWriter::new(File::create(&self.path)?),
        };
        Ok(self.file.insert(file))
    }
}

impl Write for ExportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.file {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn config_filters() -> Vec<FileFilter> {
    const EXTENSIONS: &[&str] = &[CONFIG_EXTENSION];
    vec![FileFilter {
        description: CONFIG_DESCRIPTION,
        extensions: EXTENSIONS,
    }]
}

fn export_filters() -> Vec<FileFilter> {
    ExportFormat::ALL
        .iter()
        .map(|f| FileFilter {
            description: f.description(),
            extensions: f.extensions(),
        })
        .collect()
}

/// Persistence adapter: configuration save/load and export destinations.
///
/// Every operation reports `Ok(None)` when the user cancels the dialog.
pub struct FileManager<P: FilePicker> {
    picker: P,
}

impl<P: FilePicker> FileManager<P> {
    pub fn new(picker: P) -> Self {
        Self { picker }
    }

    pub fn picker_mut(&mut self) -> &mut P {
        &mut self.picker
    }

    /// Serializes `stops` to a user-chosen `.json` file.
    pub fn save_config(&mut self, stops: &StopCollection) -> Result<Option<PathBuf>> {
        let request = SaveRequest {
            title: "Save gradient configuration",
            suggested_name: SUGGESTED_CONFIG_NAME,
            filters: config_filters(),
        };
        let Some(path) = self.picker.pick_save_destination(&request) else {
            return Ok(None);
        };

        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_config(BufWriter::new(file), stops)
            .with_context(|| format!("failed to write {}", path.display()))?;

        log::info!("saved {} stops to {}", stops.len(), path.display());
        Ok(Some(path))
    }

    /// Reads and validates a user-chosen configuration.
    ///
    /// The caller replaces its collection only on `Ok(Some(_))`; a malformed
    /// file leaves the editor untouched.
    pub fn load_config(&mut self) -> Result<Option<Vec<Stop>>> {
        let request = LoadRequest {
            title: "Load gradient configuration",
            filters: config_filters(),
        };
        let Some(path) = self.picker.pick_load_source(&request) else {
            return Ok(None);
        };

        let file =
            File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
        let stops = read_config(BufReader::new(file))
            .with_context(|| format!("failed to parse {}", path.display()))?;

        log::info!("loaded {} stops from {}", stops.len(), path.display());
        Ok(Some(stops))
    }

    /// Asks for an export destination. The file is created when the encoder
    /// first writes to the sink.
    pub fn open_export(&mut self) -> Result<Option<ExportDestination>> {
        let request = SaveRequest {
            title: "Export gradient",
            suggested_name: SUGGESTED_EXPORT_NAME,
            filters: export_filters(),
        };
        let Some(path) = self.picker.pick_save_destination(&request) else {
            return Ok(None);
        };

        Ok(Some(ExportDestination {
            format: ExportFormat::from_path(&path),
            sink: ExportSink::new(path.clone()),
            path,
        }))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::path::Path;

    use gradient_core::{Rgb, StopId};

    use super::*;

    /// Picker that answers from a queue and records what was asked.
    #[derive(Default)]
    pub(crate) struct ScriptedPicker {
        pub answers: VecDeque<Option<PathBuf>>,
        pub save_requests: Vec<SaveRequest>,
        pub load_requests: Vec<LoadRequest>,
    }

    impl ScriptedPicker {
        pub(crate) fn answering(answers: impl IntoIterator<Item = Option<PathBuf>>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                ..Default::default()
            }
        }
    }

    impl FilePicker for ScriptedPicker {
        fn pick_save_destination(&mut self, request: &SaveRequest) -> Option<PathBuf> {
            self.save_requests.push(request.clone());
            self.answers.pop_front().flatten()
        }

        fn pick_load_source(&mut self, request: &LoadRequest) -> Option<PathBuf> {
            self.load_requests.push(request.clone());
            self.answers.pop_front().flatten()
        }
    }

    pub(crate) fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gradient-studio-{}-{name}", std::process::id()))
    }

    // ── config ────────────────────────────────────────────────────────────

    #[test]
    fn save_then_load_restores_the_stops() {
        let path = temp_path("roundtrip.json");
        let mut files = FileManager::new(ScriptedPicker::answering([
            Some(path.clone()),
            Some(path.clone()),
        ]));

        let mut stops = StopCollection::with_defaults();
        stops.add(30.0, Rgb::new(0.5, 0.25, 0.125));

        assert_eq!(files.save_config(&stops).unwrap(), Some(path.clone()));
        let mut loaded = files.load_config().unwrap().unwrap();
        loaded.sort_by_key(|s| s.id);
        assert_eq!(loaded, stops.iter().copied().collect::<Vec<_>>());

        let req = &files.picker_mut().save_requests[0];
        assert_eq!(req.suggested_name, SUGGESTED_CONFIG_NAME);
        assert_eq!(req.filters[0].extensions, &["json"]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn cancelled_dialogs_do_nothing() {
        let mut files = FileManager::new(ScriptedPicker::answering([None, None, None]));
        let stops = StopCollection::with_defaults();

        assert!(files.save_config(&stops).unwrap().is_none());
        assert!(files.load_config().unwrap().is_none());
        assert!(files.open_export().unwrap().is_none());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let path = temp_path("malformed.json");
        std::fs::write(&path, "{ not a stop list").unwrap();

        let mut files = FileManager::new(ScriptedPicker::answering([Some(path.clone())]));
        assert!(files.load_config().is_err());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn duplicate_ids_are_rejected_on_load() {
        let path = temp_path("duplicate.json");
        let stop = Stop::new(StopId(1), 0.0, Rgb::BLUE);
        let json = serde_json_pair(&stop);
        std::fs::write(&path, json).unwrap();

        let mut files = FileManager::new(ScriptedPicker::answering([Some(path.clone())]));
        let err = files.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("duplicate"));

        std::fs::remove_file(path).ok();
    }

    fn serde_json_pair(stop: &Stop) -> String {
        let one = gradient_core::to_json(&[*stop].into_iter().collect()).unwrap();
        let record = one.trim_start_matches('[').trim_end_matches(']');
        format!("[{record},{record}]")
    }

    // ── export ────────────────────────────────────────────────────────────

    #[test]
    fn export_format_follows_chosen_extension() {
        let path = temp_path("export.JPG");
        let mut files = FileManager::new(ScriptedPicker::answering([Some(path.clone())]));

        let dest = files.open_export().unwrap().unwrap();
        assert_eq!(dest.format, ExportFormat::Jpeg);
        assert_eq!(dest.path, path);
        assert!(!Path::new(&path).exists());

        let req = &files.picker_mut().save_requests[0];
        assert_eq!(req.suggested_name, SUGGESTED_EXPORT_NAME);
        assert_eq!(req.filters.len(), ExportFormat::ALL.len());

        drop(dest);
        assert!(!Path::new(&path).exists());
    }

    #[test]
    fn unused_export_sink_leaves_existing_file_alone() {
        let path = temp_path("export-kept.png");
        std::fs::write(&path, b"previous").unwrap();

        let mut files = FileManager::new(ScriptedPicker::answering([Some(path.clone())]));
        let dest = files.open_export().unwrap().unwrap();
        drop(dest);

        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn export_sink_creates_file_on_first_write() {
        let path = temp_path("export-written.bmp");
        let mut sink = ExportSink::new(path.clone());
        sink.flush().unwrap();
        assert!(!Path::new(&path).exists());

        sink.write_all(b"BM").unwrap();
        sink.write_all(b"..").unwrap();
        sink.flush().unwrap();
        drop(sink);

        assert_eq!(std::fs::read(&path).unwrap(), b"BM..");
        std::fs::remove_file(path).ok();
    }
}
