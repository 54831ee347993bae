//! Writing finished workbooks to storage
//!
//! Every entry point writes to the path exactly as given. Callers that
//! relied on the old multi-sheet behaviour of appending `.xlsx` can apply
//! [`with_xlsx_extension`] themselves or set
//! [`WorkbookWriter::legacy_suffix`].

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::container::{serialize, SerializeOptions};
use crate::error::{Result, SheetError};
use crate::types::Sheet;
use crate::workbook::{CollisionPolicy, Workbook};

/// Persist container bytes at `path`
///
/// The bytes go to a temporary file next to the target, which is renamed
/// over the target only once fully written. On failure the temporary file
/// is removed and the target is left untouched.
pub fn write_to_path<P: AsRef<Path>>(bytes: &[u8], path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let storage_err = |source: std::io::Error| SheetError::StorageWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(storage_err)?;
    tmp.write_all(bytes).map_err(storage_err)?;
    tmp.as_file().sync_all().map_err(storage_err)?;
    set_default_permissions(&tmp, path).map_err(storage_err)?;
    tmp.persist(path).map_err(|err| storage_err(err.error))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote workbook");
    Ok(path.to_path_buf())
}

/// Temporary files are created owner-only; give the result the permissions
/// of the file it replaces, or the usual 0644
#[cfg(unix)]
fn set_default_permissions(tmp: &NamedTempFile, target: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match std::fs::metadata(target) {
        Ok(meta) => meta.permissions(),
        Err(_) => std::fs::Permissions::from_mode(0o644),
    };
    tmp.as_file().set_permissions(permissions)
}

#[cfg(not(unix))]
fn set_default_permissions(_tmp: &NamedTempFile, _target: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Append `.xlsx` to a path ("out/report" -> "out/report.xlsx")
///
/// The suffix is appended, never substituted: "report.v2" becomes
/// "report.v2.xlsx".
pub fn with_xlsx_extension<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut name = OsString::from(path.as_ref().as_os_str());
    name.push(".xlsx");
    PathBuf::from(name)
}

/// Build, serialize and write a single-sheet workbook
pub fn write_sheet<P: AsRef<Path>>(
    sheet: Sheet,
    path: P,
    options: &SerializeOptions,
) -> Result<PathBuf> {
    let workbook = Workbook::assemble_single(sheet)?;
    write_to_path(&serialize(&workbook, options)?, path)
}

/// Build, serialize and write a multi-sheet workbook
pub fn write_sheets<P: AsRef<Path>>(
    sheets: Vec<Sheet>,
    path: P,
    policy: CollisionPolicy,
    options: &SerializeOptions,
) -> Result<PathBuf> {
    let workbook = Workbook::assemble_multiple(sheets, policy)?;
    write_to_path(&serialize(&workbook, options)?, path)
}

/// Builder-style front end over the workbook pipeline
///
/// # Examples
///
/// ```no_run
/// use sheetpack::writer::WorkbookWriter;
/// use sheetpack::types::{CellValue, Sheet};
///
/// let sheet = Sheet::new("People", ["Name", "Age"])
///     .with_rows(vec![vec![Some(CellValue::from("Alice")), Some(CellValue::from(30i64))]]);
///
/// let path = WorkbookWriter::new("people.xlsx").sheet(sheet).save()?;
/// # Ok::<(), sheetpack::SheetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WorkbookWriter {
    path: PathBuf,
    sheets: Vec<Sheet>,
    options: SerializeOptions,
    policy: CollisionPolicy,
    legacy_suffix: bool,
}

impl WorkbookWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        WorkbookWriter {
            path: path.as_ref().to_path_buf(),
            sheets: Vec::new(),
            options: SerializeOptions::default(),
            policy: CollisionPolicy::default(),
            legacy_suffix: false,
        }
    }

    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Append `.xlsx` to the target path when saving
    pub fn legacy_suffix(mut self, enabled: bool) -> Self {
        self.legacy_suffix = enabled;
        self
    }

    /// Add a sheet; sheets appear in the order they are added
    pub fn sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Path the workbook will be written to
    pub fn target(&self) -> PathBuf {
        if self.legacy_suffix {
            with_xlsx_extension(&self.path)
        } else {
            self.path.clone()
        }
    }

    pub fn build(self) -> Result<Workbook> {
        Workbook::assemble_multiple(self.sheets, self.policy)
    }

    pub fn save(self) -> Result<PathBuf> {
        let target = self.target();
        let options = self.options.clone();
        let workbook = self.build()?;
        write_to_path(&serialize(&workbook, &options)?, target)
    }
}
