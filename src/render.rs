//! Render table rows through a text template and write the result.
//!
//! Templates receive a single `rows` binding: the header row followed by one
//! row per benchmark. A cell is either a string or a list of per-library
//! strings; the template decides how lists are joined.

use std::io::Write;
use std::path::{Path, PathBuf};

use minijinja::{context, AutoEscape, Environment, UndefinedBehavior};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::rows::Row;
use crate::OutputFormat;

pub const HTML_TEMPLATE: &str = include_str!("../templates/table.html.j2");
pub const LATEX_TEMPLATE: &str = include_str!("../templates/table.tex.j2");

/// Index of the "Total overheads" entry once libraries are priority-ordered.
const SUMMARY_INDEX: usize = 3;

const TEMPLATE_NAME: &str = "table";

pub fn template_source(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Html => HTML_TEMPLATE,
        OutputFormat::Latex => LATEX_TEMPLATE,
    }
}

/// Backslash-escape LaTeX special characters.
pub fn tex_escape(value: String) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '&' | '%' | '$' | '#' | '_' | '{' | '}' | '~' | '^' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// The single value a print table shows for a per-library list.
fn summary(values: Vec<String>) -> String {
    values
        .get(SUMMARY_INDEX)
        .or_else(|| values.last())
        .cloned()
        .unwrap_or_default()
}

#[derive(Debug)]
pub struct TableTemplate<'source> {
    env: Environment<'source>,
}

impl<'source> TableTemplate<'source> {
    pub fn new(source: &'source str) -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_filter("tex_escape", tex_escape);
        env.add_filter("summary", summary);
        env.add_template(TEMPLATE_NAME, source)?;
        Ok(Self { env })
    }

    pub fn render(&self, rows: &[Row]) -> Result<String> {
        let tmpl = self.env.get_template(TEMPLATE_NAME)?;
        Ok(tmpl.render(context! { rows => rows })?)
    }

    /// Render and atomically replace `path`. Nothing is written if rendering
    /// fails.
    pub fn write(&self, path: &Path, rows: &[Row]) -> Result<()> {
        let content = self.render(rows)?;
        write_atomic(path, &content)
    }
}

impl TableTemplate<'static> {
    pub fn for_format(format: OutputFormat) -> Result<Self> {
        Self::new(template_source(format))
    }
}

/// Content written to a temporary sibling of its destination.
///
/// Dropping it without [`StagedFile::commit`] removes the temporary file and
/// leaves the destination untouched.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    dest: PathBuf,
}

impl StagedFile {
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Rename the temporary file over the destination.
    pub fn commit(self) -> Result<()> {
        let StagedFile { temp, dest } = self;
        temp.persist(&dest)
            .map_err(|e| ReportError::io(&dest, e.error))?;
        debug!(path = %dest.display(), "replaced output file");
        Ok(())
    }
}

pub fn stage(path: &Path, content: &str) -> Result<StagedFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| ReportError::io(&dir, e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".benchlog-report")
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(|e| ReportError::io(&dir, e))?;
    temp.write_all(content.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| ReportError::io(temp.path(), e))?;

    Ok(StagedFile {
        temp,
        dest: path.to_path_buf(),
    })
}

/// Write `content` to `path` so that readers see either the old file or the
/// complete new one.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    stage(path, content)?.commit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::Cell;
    use tempfile::tempdir;

    fn list(values: &[&str]) -> Cell {
        Cell::List(values.iter().map(|v| v.to_string()).collect())
    }

    fn scalar(value: &str) -> Cell {
        Cell::Scalar(value.to_string())
    }

    fn rows() -> Vec<Row> {
        vec![
            vec![scalar("Name"), scalar("Library"), scalar("Wall time [s]")],
            vec![
                scalar("kmeans"),
                list(&["pthread", "Threading&nbsp;lib.", "OS&nbsp;support", "Total&nbsp;overheads"]),
                list(&["1.00", "2.00", "3.00", "4.00"]),
            ],
        ]
    }

    #[test]
    fn test_html_joins_lists_with_line_breaks() {
        let html = TableTemplate::for_format(OutputFormat::Html)
            .unwrap()
            .render(&rows())
            .unwrap();
        assert!(html.contains("<th>Wall time [s]</th>"));
        assert!(html.contains("<td>kmeans</td>"));
        assert!(html.contains("<td>1.00<br>2.00<br>3.00<br>4.00</td>"));
        assert!(html.contains("Total&nbsp;overheads"));
    }

    #[test]
    fn test_latex_shows_summary_entry_escaped() {
        let rows = vec![
            vec![scalar("Application"), scalar("Log size [MB]")],
            vec![scalar("word_c"), list(&["1", "2", "3", "40"])],
            vec![scalar("fft"), list(&["7"])],
        ];
        let tex = TableTemplate::for_format(OutputFormat::Latex)
            .unwrap()
            .render(&rows)
            .unwrap();
        assert!(tex.contains("word\\_c& 40 \\\\"));
        assert!(tex.contains("fft& 7 \\\\"));
        assert!(!tex.contains("Application&"));
    }

    #[test]
    fn test_render_errors_are_wrapped() {
        let err = TableTemplate::new("{% for row in rows %}").unwrap_err();
        assert!(matches!(err, ReportError::TemplateRender(_)));
        assert!(err.to_string().starts_with("failed to render template"));

        let err = TableTemplate::new("{{ missing.field }}")
            .unwrap()
            .render(&rows())
            .unwrap_err();
        assert!(matches!(err, ReportError::TemplateRender(_)));
    }

    #[test]
    fn test_tex_escape() {
        assert_eq!(tex_escape("a_b & 50%".to_string()), "a\\_b \\& 50\\%");
        assert_eq!(tex_escape("{x}".to_string()), "\\{x\\}");
    }

    #[test]
    fn test_write_atomic_creates_parent_and_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("table.html");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");

        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_abandoned_stage_leaves_destination_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.tex");
        std::fs::write(&path, "previous").unwrap();

        let staged = stage(&path, "replacement").unwrap();
        let temp_path = staged.temp_path().to_path_buf();
        assert_eq!(std::fs::read_to_string(&temp_path).unwrap(), "replacement");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");

        // Simulates a crash between writing the temporary file and the rename.
        drop(staged);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
        assert!(!temp_path.exists());

        let fresh = dir.path().join("never.tex");
        drop(stage(&fresh, "partial").unwrap());
        assert!(!fresh.exists());
    }

    #[test]
    fn test_failed_render_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.html");
        let template = TableTemplate::new("{{ nope }}").unwrap();
        assert!(template.write(&path, &rows()).is_err());
        assert!(!path.exists());
    }
}
