//! Mustache rendering of the report index.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{INDEX_FILE_NAME, OutputTarget, TOP_FILE_NAME};
use crate::error::{Error, Result};
use crate::report::ReportContext;

const BUILTIN_INDEX: &str = include_str!("../templates/report_index_template.html");
const BUILTIN_TOP: &str = include_str!("../templates/report_index_top_template.html");

/// A compiled template together with the name used in errors.
pub struct Template {
    name: String,
    inner: mustache::Template,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Template {
    /// Compile a template from source text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if the source is not valid Mustache.
    pub fn from_source(name: &str, source: &str) -> Result<Self> {
        let inner = mustache::compile_str(source).map_err(|e| Error::Template {
            name: name.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: name.to_owned(),
            inner,
        })
    }

    /// Read and compile a template file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileAccess`] if the file cannot be read, or
    /// [`Error::Template`] if it does not compile.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| Error::file_access(path, e))?;
        Self::from_source(&path.display().to_string(), &source)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Substitute `ctx` into the template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if rendering fails.
    pub fn render(&self, ctx: &ReportContext) -> Result<String> {
        let to_error = |reason: String| Error::Template {
            name: self.name.clone(),
            reason,
        };
        let mut out: Vec<u8> = Vec::new();
        self.inner
            .render_data(&mut out, &ctx.to_data())
            .map_err(|e| to_error(e.to_string()))?;
        String::from_utf8(out).map_err(|e| to_error(e.to_string()))
    }
}

/// The full index page and the condensed top fragment.
#[derive(Debug)]
pub struct ReportTemplates {
    pub index: Template,
    pub top: Template,
}

impl ReportTemplates {
    /// The templates shipped with this crate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] if a built-in template does not compile.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            index: Template::from_source("builtin:index", BUILTIN_INDEX)?,
            top: Template::from_source("builtin:top", BUILTIN_TOP)?,
        })
    }

    /// Load each template from its path, falling back to the built-in one.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Template::from_path`] and [`ReportTemplates::builtin`].
    pub fn load(index: Option<&Path>, top: Option<&Path>) -> Result<Self> {
        let index = match index {
            Some(path) => Template::from_path(path)?,
            None => Template::from_source("builtin:index", BUILTIN_INDEX)?,
        };
        let top = match top {
            Some(path) => Template::from_path(path)?,
            None => Template::from_source("builtin:top", BUILTIN_TOP)?,
        };
        Ok(Self { index, top })
    }
}

/// Render the report and write it to `target`, overwriting existing files.
///
/// Returns the paths written, index first.
///
/// # Errors
///
/// Returns [`Error::Template`] if rendering fails and [`Error::FileAccess`]
/// if a file cannot be written. A failed write may leave a partial file.
pub fn write_report(
    templates: &ReportTemplates,
    ctx: &ReportContext,
    target: &OutputTarget,
) -> Result<Vec<PathBuf>> {
    let jobs: Vec<(&Template, PathBuf)> = match target {
        OutputTarget::Directory(dir) => vec![
            (&templates.index, dir.join(INDEX_FILE_NAME)),
            (&templates.top, dir.join(TOP_FILE_NAME)),
        ],
        OutputTarget::File(path) => vec![(&templates.index, path.clone())],
    };

    let mut written = Vec::with_capacity(jobs.len());
    for (template, path) in jobs {
        let mut text = template.render(ctx)?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        std::fs::write(&path, text).map_err(|e| Error::file_access(&path, e))?;
        info!(template = template.name(), file = %path.display(), "wrote report");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TableSchema, ToolInfo};
    use crate::table::parse_table;
    use chrono::{TimeZone, Utc};

    fn context(table: &str, tool: &ToolInfo) -> ReportContext {
        let rows = parse_table(table, TableSchema::WithTaskStatus).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        ReportContext::new(rows, tool, &at)
    }

    #[test]
    fn test_render_placeholders() {
        let template = Template::from_source(
            "inline",
            "{{tool_name}}|{{project_table_row_count}}|{{total.tests}}|{{status_frequency.failed}}\
             {{#project_table}};{{project_name_esc}}={{status_str}}{{/project_table}}",
        )
        .unwrap();
        let tool = ToolInfo::new(Some("collector".to_owned()), None, None);
        let ctx = context(
            "app:core SUCCESSFUL null passed 2 0 0 0\nlib FAILED null failed 1 1 0 0\n",
            &tool,
        );
        assert_eq!(
            template.render(&ctx).unwrap(),
            "collector|2|4|1;app__core=passed;lib=failed"
        );
    }

    #[test]
    fn test_render_absent_values_as_empty() {
        let template =
            Template::from_source("inline", "[{{tool_version}}]{{#project_table}}[{{tests}}]{{/project_table}}")
                .unwrap();
        let ctx = context("a SUCCESSFUL null passed\n", &ToolInfo::default());
        assert_eq!(template.render(&ctx).unwrap(), "[][]");
    }

    #[test]
    fn test_render_escapes_html() {
        let template = Template::from_source("inline", "{{tool_name}}").unwrap();
        let tool = ToolInfo::new(Some("<b>".to_owned()), None, None);
        let ctx = context("", &tool);
        assert_eq!(template.render(&ctx).unwrap(), "&lt;b&gt;");
    }

    #[test]
    fn test_invalid_template_is_reported() {
        let err = Template::from_source("broken", "{{#open}}never closed").unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_builtin_templates_render_empty_report() {
        let templates = ReportTemplates::builtin().unwrap();
        let ctx = context("", &ToolInfo::default());
        let index = templates.index.render(&ctx).unwrap();
        assert!(index.contains("<html"));
        assert!(index.contains("</html>"));
        templates.top.render(&ctx).unwrap();
    }

    #[test]
    fn test_write_report_to_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join(INDEX_FILE_NAME), "stale").unwrap();
        let templates = ReportTemplates {
            index: Template::from_source("index", "index {{project_table_row_count}}").unwrap(),
            top: Template::from_source("top", "top\n").unwrap(),
        };
        let ctx = context("a SUCCESSFUL null passed 1 0 0 0\n", &ToolInfo::default());

        let written =
            write_report(&templates, &ctx, &OutputTarget::Directory(tmp.path().to_path_buf()))
                .unwrap();

        assert_eq!(written.len(), 2);
        let index = std::fs::read_to_string(tmp.path().join(INDEX_FILE_NAME)).unwrap();
        let top = std::fs::read_to_string(tmp.path().join(TOP_FILE_NAME)).unwrap();
        assert_eq!(index, "index 1\n");
        assert_eq!(top, "top\n");
    }

    #[test]
    fn test_write_report_to_single_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("report.html");
        let templates = ReportTemplates {
            index: Template::from_source("index", "only index").unwrap(),
            top: Template::from_source("top", "unused").unwrap(),
        };
        let ctx = context("", &ToolInfo::default());

        let written = write_report(&templates, &ctx, &OutputTarget::File(out.clone())).unwrap();

        assert_eq!(written, vec![out.clone()]);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "only index\n");
        assert!(!tmp.path().join(TOP_FILE_NAME).exists());
    }

    #[test]
    fn test_write_report_into_missing_directory_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = OutputTarget::Directory(tmp.path().join("missing"));
        let templates = ReportTemplates::builtin().unwrap();
        let ctx = context("", &ToolInfo::default());
        let err = write_report(&templates, &ctx, &target).unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
    }
}
