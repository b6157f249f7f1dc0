use crate::config::ReportConfig;
use crate::entry::Entry;
use crate::icons::IconProvider;
use crate::info::Info;
use crate::layout::{Finished, LayoutEngine};
use crate::sink::{DocumentSink, PdfSink, RecordingSink};
use crate::ReportError;
use std::path::Path;
use tracing::info;

/// Lay `entries` out onto `sink` with the geometry and style from `config`,
/// then finalize the sink to `output`
pub fn render<S: DocumentSink>(
    sink: S,
    config: &ReportConfig,
    icons: &dyn IconProvider,
    entries: &[Entry],
    output: &Path,
) -> Result<Finished<S>, ReportError> {
    let mut engine = LayoutEngine::new(sink, config.geometry(), config.style(), icons);
    engine.extend(entries);
    engine.finish(output)
}

/// Write `entries` to a PDF at `output`, returning the number of pages
pub fn generate(
    config: &ReportConfig,
    icons: &dyn IconProvider,
    entries: &[Entry],
    output: &Path,
) -> Result<usize, ReportError> {
    let mut document_info = Info::new();
    document_info.title(&config.title);

    let sink = PdfSink::new(
        config.geometry().page_size(),
        document_info,
        config.fonts.regular.as_deref(),
        config.fonts.bold.as_deref(),
    );
    let finished = render(sink, config, icons, entries, output)?;
    info!(
        path = %output.display(),
        entries = entries.len(),
        pages = finished.pages,
        "report generated"
    );
    Ok(finished.pages)
}

/// Lay the report out without writing anything
pub fn dry_run(
    config: &ReportConfig,
    icons: &dyn IconProvider,
    entries: &[Entry],
    output: &Path,
) -> Result<Finished<RecordingSink>, ReportError> {
    render(RecordingSink::new(), config, icons, entries, output)
}
